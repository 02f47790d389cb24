use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use tagtree_core::Extensions;

pub use json::*;

mod json;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Resolve tag paths, render templates and dump their structure.",
	long_about = "tagtree is the data-binding front end of a mustache style template engine. \
	              It replays scanner event scripts against JSON data.\n\nAn event script is a \
	              JSON array such as:\n  [{\"event\": \"text\", \"text\": \"Hello \"},\n   \
	              {\"event\": \"value\", \"name\": \"name\"}]\n\nQuick start:\n  tagtree dump \
	              events.json                  Print the template structure\n  tagtree render \
	              --data data.json events.json Render the template\n  tagtree resolve --data \
	              data.json a.b /c/d      Resolve tag names"
)]
pub struct TagtreeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Project root holding `tagtree.toml` and partials.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Replay an event script through the tree builder and print the tree.
	Dump {
		events: PathBuf,
	},
	/// Replay an event script against JSON data and print the output.
	Render {
		#[arg(long)]
		data: PathBuf,

		events: PathBuf,

		#[command(flatten)]
		settings: Settings,
	},
	/// Resolve tag names against JSON data.
	Resolve {
		#[arg(long)]
		data: PathBuf,

		#[arg(required = true)]
		names: Vec<String>,

		#[command(flatten)]
		settings: Settings,
	},
}

#[derive(Debug, Clone, Default, Args)]
pub struct Settings {
	/// Comma separated extension names replacing the configured set.
	#[arg(long, value_delimiter = ',')]
	pub extensions: Option<Vec<Extensions>>,

	/// Fail on undefined tags.
	#[arg(long, default_value_t = false)]
	pub strict: bool,
}

impl Settings {
	/// The extension set named on the command line, if any.
	pub fn extensions(&self) -> Option<Extensions> {
		self.extensions.as_ref().map(|names| {
			names
				.iter()
				.fold(Extensions::from_bits(0), |acc, flag| acc | *flag)
		})
	}
}
