use std::ops::Index;

use crate::TagtreeError;
use crate::TagtreeResult;
use crate::walker::Visit;
use crate::walker::traverse;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
	pub fn index(self) -> usize {
		self.0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// The anonymous node holding the top level constructs.
	Root,
	/// Template text, copied as emitted.
	Literal,
	/// `{{{name}}}` or `{{&name}}`.
	ValueRef,
	/// `{{name}}`.
	EscapedValueRef,
	/// `{{#name}}`.
	SectionTrue,
	/// `{{^name}}`.
	SectionFalse,
}

impl NodeKind {
	pub fn is_section(self) -> bool {
		matches!(self, Self::SectionTrue | Self::SectionFalse)
	}

	/// Marker used in tree dumps.
	fn marker(self) -> &'static str {
		match self {
			Self::Root => "",
			Self::Literal => "=",
			Self::ValueRef => "K",
			Self::EscapedValueRef => "E",
			Self::SectionTrue => "#",
			Self::SectionFalse => "^",
		}
	}
}

/// One recorded template construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	pub kind: NodeKind,
	/// Literal content or tag name.
	pub text: Vec<u8>,
	/// For literals, whether the scanner asked for the text to be escaped.
	pub escape: bool,
	pub(crate) parent: Option<NodeId>,
	pub(crate) first_child: Option<NodeId>,
	pub(crate) next: Option<NodeId>,
}

impl Node {
	pub fn text_lossy(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.text)
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn first_child(&self) -> Option<NodeId> {
		self.first_child
	}

	pub fn next(&self) -> Option<NodeId> {
		self.next
	}
}

/// Arena of nodes linked through parent, first child and next sibling.
///
/// Nodes own their text. Links are indices, so a parent link never owns
/// anything and can never dangle.
#[derive(Debug, Clone)]
pub struct Tree {
	nodes: Vec<Node>,
}

impl Default for Tree {
	fn default() -> Self {
		Self::new()
	}
}

impl Tree {
	pub fn new() -> Self {
		Self {
			nodes: vec![Node {
				kind: NodeKind::Root,
				text: Vec::new(),
				escape: false,
				parent: None,
				first_child: None,
				next: None,
			}],
		}
	}

	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	pub fn get(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.0)
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	/// Number of nodes, the root included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns true when nothing was recorded under the root.
	pub fn is_empty(&self) -> bool {
		self.nodes[0].first_child.is_none()
	}

	/// Insert a node in front of the children of `parent`.
	///
	/// Allocation failures are reported as [`TagtreeError::System`] and leave
	/// the tree unchanged.
	pub fn prepend_child(
		&mut self,
		parent: NodeId,
		kind: NodeKind,
		text: &[u8],
		escape: bool,
	) -> TagtreeResult<NodeId> {
		let mut owned = Vec::new();
		owned
			.try_reserve_exact(text.len())
			.and_then(|()| self.nodes.try_reserve(1))
			.map_err(|e| TagtreeError::System(e.to_string()))?;
		owned.extend_from_slice(text);

		let id = NodeId(self.nodes.len());
		let next = self.nodes[parent.0].first_child;
		self.nodes.push(Node {
			kind,
			text: owned,
			escape,
			parent: Some(parent),
			first_child: None,
			next,
		});
		self.nodes[parent.0].first_child = Some(id);
		Ok(id)
	}

	/// The children of `id`, following the sibling links.
	pub fn children(&self, id: NodeId) -> Children<'_> {
		Children {
			tree: self,
			current: self.nodes[id.0].first_child,
		}
	}

	/// List the tree one visit per line: `BEGIN `/`END ` around nodes with
	/// children, indented by depth, with the kind marker and the text.
	pub fn dump(&self) -> String {
		let mut output = String::new();
		let mut level = 0usize;

		traverse(self, self[self.root()].first_child, |tree, id, visit| {
			let node = &tree[id];
			if visit == Visit::End {
				level -= 1;
			}

			output.push_str(&" ".repeat(level));
			match visit {
				Visit::Begin => output.push_str("BEGIN "),
				Visit::End => output.push_str("END "),
				Visit::Leaf => {}
			}
			output.push_str(node.kind.marker());
			output.push(' ');
			if node.kind == NodeKind::Literal {
				for ch in node.text_lossy().chars() {
					match ch {
						'\n' => output.push_str("\\n"),
						'\t' => output.push_str("\\t"),
						'\r' => output.push_str("\\r"),
						'\u{0B}' => output.push_str("\\v"),
						'\u{0C}' => output.push_str("\\f"),
						ch => output.push(ch),
					}
				}
			} else {
				output.push_str(&node.text_lossy());
			}
			output.push('\n');

			if visit == Visit::Begin {
				level += 1;
			}
		});

		output
	}
}

impl Index<NodeId> for Tree {
	type Output = Node;

	fn index(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}
}

pub struct Children<'a> {
	tree: &'a Tree,
	current: Option<NodeId>,
}

impl Iterator for Children<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<NodeId> {
		let id = self.current?;
		self.current = self.tree[id].next;
		Some(id)
	}
}
