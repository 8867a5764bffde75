use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use xml_diff_core::{diff_with_options, format_json, DiffOptions, XmlElement};

mod cli;
mod report;

use cli::{Cli, Command, DiffArgs, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Diff(args) => run_diff(args),
    }
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let expected = fs::read(&args.expected)
        .with_context(|| format!("failed to read {}", args.expected.display()))?;
    let actual = fs::read(&args.actual)
        .with_context(|| format!("failed to read {}", args.actual.display()))?;

    let ignore_tags = args.ignore_tag;
    let predicate = move |el: &XmlElement| !ignore_tags.iter().any(|tag| tag == &el.tag);

    let opts = DiffOptions {
        exclude_empty_nodes: args.exclude_empty,
        predicate: &predicate,
    };

    let edits = diff_with_options(&expected, &actual, &opts)
        .with_context(|| "failed to diff the given documents")?;

    if args.summary {
        println!("{}", report::render_summary(&edits));
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => println!("{}", report::render_text(&edits)),
        OutputFormat::Json => println!("{}", format_json(&edits)),
    }

    Ok(())
}
