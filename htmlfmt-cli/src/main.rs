//! htmlfmt CLI - reformat HTML from stdin to stdout.
//!
//! ```text
//! htmlfmt [--fragment] [--prefix STR] [--indent STR] < in.html > out.html
//! ```
//!
//! Logging goes to stderr; `RUST_LOG` overrides the default `warn` level.

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use htmlfmt::RenderOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Reformat HTML read from stdin into indented markup on stdout.
#[derive(Parser, Debug)]
#[command(name = "htmlfmt", version, about)]
struct Cli {
    /// Parse the input as a fragment (contents of a <div>) instead of a document
    #[arg(short, long)]
    fragment: bool,

    /// Prefix written at the start of each inserted line
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Indent unit, repeated once per nesting level
    #[arg(short, long, default_value = "")]
    indent: String,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("{}", error_line(&err));
        std::process::exit(1);
    }
}

/// The one line printed to stderr on failure, with the full cause chain.
fn error_line(err: &anyhow::Error) -> String {
    format!("htmlfmt: {err:#}")
}

fn run(cli: &Cli) -> Result<()> {
    let options = RenderOptions::new()
        .with_prefix(cli.prefix.as_str())
        .with_indent(cli.indent.as_str());

    let stdin = io::stdin().lock();
    let mut out = BufWriter::new(io::stdout().lock());

    if cli.fragment {
        info!("parsing fragment");
        htmlfmt::format_fragment(stdin, &mut out, &options).context("formatting fragment")?;
    } else {
        htmlfmt::format(stdin, &mut out, &options).context("formatting document")?;
    }

    out.flush().context("flushing stdout")?;
    Ok(())
}
