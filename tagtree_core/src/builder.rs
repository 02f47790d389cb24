use crate::EnterOutcome;
use crate::NodeId;
use crate::NodeKind;
use crate::PartialLoader;
use crate::RenderSink;
use crate::StringResult;
use crate::TagtreeError;
use crate::TagtreeResult;
use crate::Tree;
use crate::walker::reverse_whole_tree;

/// A sink recording the structure of a template instead of rendering it.
///
/// Names are recorded as written, nothing is looked up. Each new node is
/// put in front of its siblings; [`TreeBuilder::finish`] restores document
/// order in a single pass over the tree.
pub struct TreeBuilder {
	tree: Tree,
	parent: NodeId,
	partials: PartialLoader,
}

impl Default for TreeBuilder {
	fn default() -> Self {
		Self::new(PartialLoader::default())
	}
}

impl TreeBuilder {
	pub fn new(partials: PartialLoader) -> Self {
		let tree = Tree::new();
		let parent = tree.root();
		Self {
			tree,
			parent,
			partials,
		}
	}

	/// Nesting depth of the current insertion point.
	pub fn depth(&self) -> usize {
		let mut depth = 0;
		let mut current = self.tree[self.parent].parent();
		while let Some(id) = current {
			depth += 1;
			current = self.tree[id].parent();
		}
		depth
	}

	/// Put the recorded tree in document order and hand it over.
	pub fn finish(mut self) -> Tree {
		let root = self.tree.root();
		reverse_whole_tree(&mut self.tree, Some(root));
		self.tree
	}

	fn record(&mut self, kind: NodeKind, text: &[u8], escape: bool) -> TagtreeResult<NodeId> {
		self.tree.prepend_child(self.parent, kind, text, escape)
	}
}

impl RenderSink for TreeBuilder {
	fn put(&mut self, name: &str, escape: bool) -> TagtreeResult<()> {
		let kind = if escape {
			NodeKind::EscapedValueRef
		} else {
			NodeKind::ValueRef
		};
		self.record(kind, name.as_bytes(), false)?;
		Ok(())
	}

	fn enter(&mut self, name: &str, expected: bool) -> TagtreeResult<EnterOutcome> {
		let kind = if expected {
			NodeKind::SectionTrue
		} else {
			NodeKind::SectionFalse
		};
		self.parent = self.record(kind, name.as_bytes(), false)?;

		Ok(if expected {
			EnterOutcome::Render
		} else {
			EnterOutcome::Inverted
		})
	}

	fn next(&mut self) -> TagtreeResult<bool> {
		Ok(false)
	}

	fn leave(&mut self) -> TagtreeResult<()> {
		let node = &self.tree[self.parent];
		match node.parent() {
			Some(parent) if node.kind.is_section() => {
				self.parent = parent;
				Ok(())
			}
			_ => Err(TagtreeError::Closing(String::new())),
		}
	}

	fn partial(&mut self, name: &str) -> TagtreeResult<StringResult<'static>> {
		Ok(self.partials.load(name))
	}

	fn emit(&mut self, buffer: &[u8], escape: bool) -> TagtreeResult<()> {
		self.record(NodeKind::Literal, buffer, escape)?;
		Ok(())
	}
}
