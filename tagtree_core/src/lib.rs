//! `tagtree_core` is the data-binding half of a mustache style template
//! engine. A scanner reads template text and reports what it finds to a
//! [`RenderSink`]; this crate provides the sinks and everything they stand
//! on.
//!
//! ## Pipeline
//!
//! ```text
//! Scanner events (text, value, enter, leave, partial)
//!   → RenderSink
//!       → Renderer: resolve tag paths against a DataSource, emit escaped output
//!       → TreeBuilder: record the template structure into a Tree
//!   → walker (iterative traversal, sibling reversal) over the recorded Tree
//! ```
//!
//! ## Modules
//!
//! - [`path`] resolves tag names (`a.b.c`, `/a/b`, `a.b=5`, `map.*`) against
//!   a [`DataSource`].
//! - [`emitter`] writes output with optional HTML escaping.
//! - [`partial`] loads partial templates, falling back to empty content.
//! - [`tree`] and [`walker`] record and traverse the template structure
//!   without recursion.
//! - [`driver`] replays an [`Event`] script through any sink.
//! - [`config`] loads `tagtree.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use tagtree_core::Event;
//! use tagtree_core::Options;
//! use tagtree_core::extract;
//!
//! let events = vec![
//! 	Event::Text {
//! 		text: "Hello ".into(),
//! 		escape: false,
//! 	},
//! 	Event::Value {
//! 		name: "name".into(),
//! 		escape: true,
//! 	},
//! ];
//!
//! let tree = extract(&events, &Options::default()).unwrap();
//! assert_eq!(tree.dump(), "= Hello \nE name\n");
//! ```

pub use builder::*;
pub use config::*;
pub use driver::*;
pub use emitter::*;
pub use error::*;
pub use extensions::*;
pub use partial::*;
pub use path::*;
pub use renderer::*;
pub use selector::*;
pub use sink::*;
pub use source::*;
pub use string_result::*;
pub use tree::*;
pub use walker::*;

mod builder;
pub mod config;
pub mod driver;
pub mod emitter;
#[allow(unused_assignments)]
mod error;
mod extensions;
pub mod partial;
pub mod path;
mod renderer;
mod selector;
mod sink;
mod source;
mod string_result;
pub mod tree;
pub mod walker;

#[cfg(test)]
mod __fixtures;
