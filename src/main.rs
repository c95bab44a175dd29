use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

use deepquill::coerce::to_float;
use deepquill::config::Config;
use deepquill::document::node::Node;
use deepquill::file::loader::{load_file, load_from_stdin, Format};
use deepquill::file::saver::{save_file, serialize_node};
use deepquill::pretty::prettify_indent;
use deepquill::traverse::{collect_by_key, collect_by_key_flat, flatten, has_key, replace_by_key};

/// DeepQuill - deep key search and replacement for JSON/YAML documents
#[derive(Parser)]
#[command(name = "deepquill")]
#[command(version)]
#[command(about = "Find, replace and flatten values by key anywhere in a JSON/YAML document", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ~/.config/deepquill/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every value stored under KEY, at any depth
    Get {
        /// Document to read ("-" for stdin)
        file: String,
        key: String,
        /// Keep the nested search shape instead of flattening
        #[arg(long)]
        nested: bool,
    },
    /// Overwrite every value stored under KEY with VALUE
    Put {
        /// Document to update ("-" for stdin)
        file: String,
        key: String,
        /// New value, parsed as JSON; anything unparseable is taken as a plain string
        value: String,
        /// Write the result here instead of back to FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report whether the top-level mapping has KEY (not searched recursively)
    Has {
        /// Document to read ("-" for stdin)
        file: String,
        key: String,
    },
    /// Sum every numeric value stored under KEY
    Sum {
        /// Document to read ("-" for stdin)
        file: String,
        key: String,
    },
    /// Flatten a document whose root is a nested sequence
    Flatten {
        /// Document to read ("-" for stdin)
        file: String,
    },
}

/// Initialize tracing subscriber.
fn init_tracing(default_level: &str, verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => default_level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load(file: &str) -> Result<Node> {
    if file == "-" {
        load_from_stdin()
    } else {
        load_file(file).with_context(|| format!("Could not load {}", file))
    }
}

fn parse_value_arg(value: &str) -> Node {
    serde_json::from_str::<Node>(value).unwrap_or_else(|_| Node::from(value))
}

/// Sums the numeric leaves, returning the total and how many were skipped.
fn sum_leaves(leaves: &[Node]) -> (f64, usize) {
    let mut total = 0.0;
    let mut skipped = 0usize;
    for leaf in leaves {
        match to_float(leaf) {
            Ok(v) => total += v,
            Err(e) => {
                tracing::warn!(value = %leaf, error = %e, "skipping value");
                skipped += 1;
            }
        }
    }
    (total, skipped)
}

/// Where `put` writes: the explicit output, else the input file unless it is stdin.
fn put_target<'a>(file: &'a str, output: Option<&'a Path>) -> Option<&'a Path> {
    output.or_else(|| (file != "-").then_some(Path::new(file)))
}

fn print_node(node: &Node, config: &Config) {
    println!("{}", prettify_indent(node, config.indent_size));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    init_tracing(&config.log_level, cli.verbose);

    match cli.command {
        Command::Get { file, key, nested } => {
            let root = load(&file)?;
            let found = if nested || !config.flatten_results {
                collect_by_key(&root, &key)
            } else {
                collect_by_key_flat(&root, &key)
            };
            print_node(&Node::Sequence(found), &config);
        }
        Command::Put {
            file,
            key,
            value,
            output,
        } => {
            let mut root = load(&file)?;
            replace_by_key(&mut root, &key, parse_value_arg(&value));

            match put_target(&file, output.as_deref()) {
                Some(target) => save_file(target, &root, &config)
                    .with_context(|| format!("Could not save {}", target.display()))?,
                None => print!("{}", serialize_node(&root, Format::Json, config.indent_size)?),
            }
        }
        Command::Has { file, key } => {
            let root = load(&file)?;
            println!("{}", has_key(&root, &key));
        }
        Command::Sum { file, key } => {
            let root = load(&file)?;
            let (total, skipped) = sum_leaves(&collect_by_key_flat(&root, &key));
            println!("{}", total);
            if skipped > 0 {
                eprintln!("skipped {} non-numeric value(s)", skipped);
            }
        }
        Command::Flatten { file } => {
            let root = load(&file)?;
            let flat = flatten(std::slice::from_ref(&root));
            print_node(&Node::Sequence(flat), &config);
        }
    }

    Ok(())
}
