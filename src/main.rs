//! CLI entry point for twig

use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, error};
use twig::output::stdout_supports_color;
use twig::{ConsoleSink, LocalFs, LogLevel, RenderConfig, TwigError, file_subscriber, print_tree};

/// clap only takes single-character shorts, so the two-letter `-hr`
/// spelling is rewritten before parsing.
const HUMAN_READABLE_SHORT: &str = "-hr";

#[derive(Parser, Debug)]
#[command(name = "twig")]
#[command(about = "Generate a directory tree in ASCII format")]
#[command(version)]
struct Args {
    /// The directory path to generate the tree for
    directory: PathBuf,

    /// Only show files whose name ends with this suffix
    #[arg(short = 'e', long = "extension", allow_hyphen_values = true)]
    extension: Option<String>,

    /// Limit the depth of the tree traversal (0 = root's children only)
    #[arg(short = 'd', long = "depth")]
    depth: Option<usize>,

    /// Enable colorized output
    #[arg(long = "color")]
    color: bool,

    /// Show file/directory permissions
    #[arg(long = "permissions")]
    permissions: bool,

    /// Show file sizes in a human-readable format (also -hr)
    #[arg(long = "human-readable")]
    human_readable: bool,

    /// Log file path
    #[arg(short = 'l', long = "log", default_value = "tree.log", allow_hyphen_values = true)]
    log: PathBuf,

    /// Set the logging level
    #[arg(long = "log-level", value_enum, ignore_case = true, default_value = "INFO")]
    log_level: LogLevel,
}

impl Args {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            depth_limit: self.depth,
            extension_filter: self.extension.clone(),
            color: self.color,
            show_permissions: self.permissions,
            human_readable: self.human_readable,
        }
    }
}

/// Options whose next token is their value and must be left alone.
const VALUE_OPTIONS: [&str; 7] = [
    "-e",
    "--extension",
    "-d",
    "--depth",
    "-l",
    "--log",
    "--log-level",
];

/// Rewrite a standalone `-hr` flag to `--human-readable`. Option values and
/// anything after `--` pass through untouched.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut takes_value = false;
    let mut positional_only = false;

    for arg in args {
        if positional_only || takes_value {
            takes_value = false;
            out.push(arg);
            continue;
        }
        if arg == "--" {
            positional_only = true;
        } else {
            takes_value = VALUE_OPTIONS.iter().any(|opt| arg == *opt);
        }
        if arg == HUMAN_READABLE_SHORT {
            out.push(OsString::from("--human-readable"));
        } else {
            out.push(arg);
        }
    }
    out
}

fn main() {
    let args = Args::parse_from(normalize_args(std::env::args_os()));

    let subscriber = file_subscriber(&args.log, args.log_level).unwrap_or_else(|e| {
        eprintln!("twig: {}", e);
        process::exit(1);
    });

    // The log file stays open for the run and is closed when the subscriber drops
    let code = tracing::subscriber::with_default(subscriber, || run(&args));
    process::exit(code);
}

fn run(args: &Args) -> i32 {
    debug!("Parsed CLI arguments: {args:?}");

    let config = args.render_config();
    let mut sink = ConsoleSink::new(stdout_supports_color());

    match print_tree(&LocalFs, &args.directory, &config, &mut sink) {
        Ok(()) => 0,
        // Already printed and logged by print_tree
        Err(TwigError::InvalidRoot { .. }) => 1,
        Err(e) => {
            error!("{}", e);
            eprintln!("twig: {}", e);
            1
        }
    }
}
