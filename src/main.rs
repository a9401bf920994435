use clap::{Parser, Subcommand};
use raw_viewer_agent::imaging::{Renderer, ThumbnailConfig, ThumbnailFailure, ThumbnailResult};
use raw_viewer_agent::{config, listing, output};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "raw-viewer-agent")]
#[command(about = "Remote agent for a RAW image viewer")]
#[command(long_about = "\
Remote agent for a RAW image viewer

Every command prints one JSON document on stdout. Progress goes to stderr
unless --quiet is given. Command-level errors print {\"error\": ...} on
stderr and exit 1; a thumbnail that could not be made is an ordinary result
with \"success\": false.

RAW files are headerless 8-bit grayscale. Dimensions come from the size:

  327680 bytes  -> 640x512
  s*s bytes     -> s x s
  anything else -> invalid

Run 'raw-viewer-agent gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Optional config.toml (thumbnail size and quality)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress progress output on stderr
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory
    List {
        #[arg(long)]
        path: PathBuf,
    },
    /// Metadata for one file or directory
    Metadata {
        #[arg(long)]
        path: PathBuf,
    },
    /// Render one thumbnail
    Thumbnail {
        #[arg(long)]
        path: PathBuf,
        /// Write the JPEG here instead of returning it as base64
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List only the image files in a directory
    Images {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        recursive: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::List { path } => print_json(&listing::list_directory(&path)?)?,
        Command::Metadata { path } => print_json(&listing::get_metadata(&path)?)?,
        Command::Images { path, recursive } => {
            print_json(&listing::list_images(&path, recursive)?)?
        }
        Command::Thumbnail {
            path,
            output: destination,
        } => {
            let agent_config = config::load_config(cli.config.as_deref())?;
            let (events, printer) = spawn_printer(cli.quiet, output::print_render_event);
            let mut renderer = Renderer::new(ThumbnailConfig::from_config(&agent_config.thumbnails));
            if let Some(tx) = events {
                renderer = renderer.with_events(tx);
            }
            let result = renderer.render(&path, destination.as_deref());
            drop(renderer);
            join_printer(printer);

            if let ThumbnailResult::Failed(failure @ ThumbnailFailure::NotFound(_)) = result {
                return Err(failure.into());
            }
            print_json(&result)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Spawn a thread that prints events as they arrive. Quiet mode gets no sink.
fn spawn_printer<E: Send + 'static>(
    quiet: bool,
    print: fn(&E),
) -> (Option<Sender<E>>, Option<JoinHandle<()>>) {
    if quiet {
        return (None, None);
    }
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            print(&event);
        }
    });
    (Some(tx), Some(printer))
}

/// Wait for a printer to drain. All senders must be dropped first.
fn join_printer(printer: Option<JoinHandle<()>>) {
    if let Some(handle) = printer {
        handle.join().ok();
    }
}
