use crate::NodeId;
use crate::Tree;

/// Position of a visit relative to the node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visit {
	/// Before descending into the children of a node.
	Begin,
	/// A node without children.
	Leaf,
	/// After the last child of a node, before moving on.
	End,
}

/// Link access shared by the read-only and mutating walks.
trait Links {
	fn first_child(&self, id: NodeId) -> Option<NodeId>;
	fn next(&self, id: NodeId) -> Option<NodeId>;
	fn parent(&self, id: NodeId) -> Option<NodeId>;
}

impl Links for Tree {
	fn first_child(&self, id: NodeId) -> Option<NodeId> {
		self[id].first_child
	}

	fn next(&self, id: NodeId) -> Option<NodeId> {
		self[id].next
	}

	fn parent(&self, id: NodeId) -> Option<NodeId> {
		self[id].parent
	}
}

impl Links for &Tree {
	fn first_child(&self, id: NodeId) -> Option<NodeId> {
		(**self).first_child(id)
	}

	fn next(&self, id: NodeId) -> Option<NodeId> {
		(**self).next(id)
	}

	fn parent(&self, id: NodeId) -> Option<NodeId> {
		(**self).parent(id)
	}
}

/// Walk the sibling chain starting at `head` and everything below it.
///
/// The depth counter stands in for a call stack and parent links lead back
/// up, so the depth of the tree never grows the host stack. Links are read
/// after each visit, which lets a `Begin` visit rearrange the children it is
/// about to descend into.
fn walk<T, F>(tree: &mut T, head: Option<NodeId>, mut visit: F)
where
	T: Links,
	F: FnMut(&mut T, NodeId, Visit),
{
	let mut level = 1usize;
	let mut current = head;

	while let Some(id) = current {
		if tree.first_child(id).is_some() {
			visit(tree, id, Visit::Begin);
			if let Some(child) = tree.first_child(id) {
				level += 1;
				current = Some(child);
				continue;
			}
		} else {
			visit(tree, id, Visit::Leaf);
		}

		let mut node = id;
		current = loop {
			if let Some(next) = tree.next(node) {
				break Some(next);
			}

			level -= 1;
			let Some(parent) = tree.parent(node) else {
				return;
			};
			if level == 0 {
				return;
			}
			visit(tree, parent, Visit::End);
			node = parent;
		};
	}
}

/// Visit the chain starting at `head` in document order: `Begin` and `End`
/// around nodes with children, `Leaf` for the others.
pub fn traverse<F>(tree: &Tree, head: Option<NodeId>, mut visit: F)
where
	F: FnMut(&Tree, NodeId, Visit),
{
	let mut view = tree;
	walk(&mut view, head, |tree, id, position| visit(*tree, id, position));
}

/// Like [`traverse`], with mutable access to the tree from the visitor.
pub fn traverse_mut<F>(tree: &mut Tree, head: Option<NodeId>, visit: F)
where
	F: FnMut(&mut Tree, NodeId, Visit),
{
	walk(tree, head, visit);
}

/// Reverse the sibling chain starting at `head` in place and return its new
/// head.
pub fn reverse_siblings(tree: &mut Tree, head: Option<NodeId>) -> Option<NodeId> {
	let mut previous = None;
	let mut current = head;

	while let Some(id) = current {
		let node = tree.node_mut(id);
		current = node.next;
		node.next = previous;
		previous = Some(id);
	}

	previous
}

/// Reverse the chain starting at `head` and, below it, every chain of
/// children. Returns the new head.
pub fn reverse_whole_tree(tree: &mut Tree, head: Option<NodeId>) -> Option<NodeId> {
	let head = reverse_siblings(tree, head);
	traverse_mut(tree, head, |tree, id, position| {
		if position == Visit::Begin {
			let children = tree.node_mut(id).first_child;
			let reversed = reverse_siblings(tree, children);
			tree.node_mut(id).first_child = reversed;
		}
	});

	head
}
