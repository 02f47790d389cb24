use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::Value;
use tagtree_cli::Commands;
use tagtree_cli::JsonSource;
use tagtree_cli::Settings;
use tagtree_cli::TagtreeCli;
use tagtree_core::DataSource;
use tagtree_core::Event;
use tagtree_core::Extensions;
use tagtree_core::Options;
use tagtree_core::Selection;
use tagtree_core::Selector;
use tagtree_core::TagtreeConfig;
use tagtree_core::TagtreeError;
use tagtree_core::extract;
use tagtree_core::render;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = TagtreeCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Dump { events }) => run_dump(&args, events),
		Some(Commands::Render {
			data,
			events,
			settings,
		}) => run_render(&args, data, events, settings),
		Some(Commands::Resolve {
			data,
			names,
			settings,
		}) => run_resolve(&args, data, names, settings),
		None => {
			eprintln!("No subcommand specified. Run `tagtree --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<TagtreeError>() {
			Ok(tagtree_err) => {
				let report: miette::Report = (*tagtree_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `TAGTREE_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default = if verbose {
		"tagtree=debug,tagtree_core=debug"
	} else {
		"warn"
	};
	let filter = EnvFilter::try_from_env("TAGTREE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn resolve_root(args: &TagtreeCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Options from the project config, with the command line settings applied
/// on top.
fn resolve_options(args: &TagtreeCli, settings: &Settings) -> Result<Options, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = TagtreeConfig::load(&root)?.unwrap_or_default();
	let mut options = config.options(&root);

	if let Some(extensions) = settings.extensions() {
		options.extensions = extensions;
	}
	if config.strict || settings.strict {
		options = options.strict();
	}

	tracing::debug!(
		root = %root.display(),
		extensions = %options.extensions,
		max_depth = options.max_depth,
		"resolved options"
	);

	Ok(options)
}

fn load_events(path: &Path) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
	let content = std::fs::read_to_string(path)?;
	let events: Vec<Event> = serde_json::from_str(&content)
		.map_err(|e| format!("invalid event script {}: {e}", path.display()))?;
	tracing::debug!(path = %path.display(), count = events.len(), "loaded events");

	Ok(events)
}

fn load_data(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
	let content = std::fs::read_to_string(path)?;
	let data = serde_json::from_str(&content)
		.map_err(|e| format!("invalid data file {}: {e}", path.display()))?;

	Ok(data)
}

fn run_dump(args: &TagtreeCli, events: &Path) -> Result<(), Box<dyn std::error::Error>> {
	let options = resolve_options(args, &Settings::default())?;
	let events = load_events(events)?;
	let tree = extract(&events, &options)?;

	print!("{}", tree.dump());
	Ok(())
}

fn run_render(
	args: &TagtreeCli,
	data: &Path,
	events: &Path,
	settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = resolve_options(args, settings)?;
	let events = load_events(events)?;
	let data = load_data(data)?;

	let stdout = std::io::stdout();
	let mut output = render(&events, JsonSource::new(&data), stdout.lock(), &options)?;
	output.flush()?;

	Ok(())
}

fn run_resolve(
	args: &TagtreeCli,
	data: &Path,
	names: &[String],
	settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = resolve_options(args, settings)?;
	let data = load_data(data)?;
	let mut selector = Selector::new(JsonSource::new(&data), options.extensions);

	for name in names {
		let selection = selector.select(name)?;
		let status = match selection {
			Selection::NotFound => {
				if selector.extensions().contains(Extensions::ERROR_UNDEFINED) {
					return Err(TagtreeError::UndefinedTag(name.clone()).into());
				}
				colored!("not found", yellow)
			}
			Selection::Found => colored!("found", green),
			Selection::FoundViaObjectIteration => colored!("found (object iteration)", green),
		};

		let value = if selection.is_found() {
			selector
				.source_mut()
				.get(selection.is_object_iteration())?
				.map(|value| format!(" = {}", value.to_string_lossy()))
		} else {
			None
		};

		println!("{name}: {status}{}", value.unwrap_or_default());
	}

	Ok(())
}
