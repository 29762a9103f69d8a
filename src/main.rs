use std::{
    collections::HashSet,
    fs,
    io::{self, Read},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use doi2bib::{
    BatchOptions, BatchState, Error, FormatOptions,
    batch::{Origin, Slot},
    extract_all,
    fetch::HttpFetcher,
    normalize, run_batch,
};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, Source};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "doi2bib=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    match &args.command {
        Command::Fetch {
            from,
            format,
            no_related,
            json,
        } => {
            let config = args.config();
            let fetcher = HttpFetcher::new(&config);
            let options = BatchOptions {
                resolve_related: !no_related,
            };
            let format: FormatOptions = (*format).into();

            let mut tally = Tally::default();
            let mut printed = 0usize;
            let mut records: Vec<Value> = Vec::new();
            let mut failures: Vec<Value> = Vec::new();

            for source in from {
                let batches = match source.batches() {
                    Ok(b) => b,
                    Err(e) => {
                        eprintln!("{} {}: {e}", "✗".red(), source_name(source));
                        tally.failed += 1;
                        continue;
                    }
                };
                for raw in batches {
                    let spinner = spinner(&raw)?;
                    let outcome = run_batch(&raw, &fetcher, &fetcher, &config, &options);
                    spinner.finish_and_clear();

                    match outcome {
                        Ok(state) => {
                            report_failures(&state, &mut failures);
                            tally.ok += state.results().len();
                            tally.failed += state.failures().len();
                            for entry in state.render(&format) {
                                if *json {
                                    records.push(json!({
                                        "identifier": entry.identifier.as_str(),
                                        "slot": slot_name(entry.slot),
                                        "origin": origin_name(entry.origin),
                                        "bibtex": entry.text,
                                    }));
                                } else {
                                    if printed > 0 {
                                        println!();
                                    }
                                    println!("{}", entry.text);
                                    printed += 1;
                                }
                            }
                        }
                        Err(e) => {
                            eprintln!("{} {e}", "✗".red());
                            failures.push(json!({ "input": raw, "error": e.to_string() }));
                            tally.failed += failed_in(&raw, &e);
                        }
                    }
                }
            }

            if *json {
                let doc = json!({ "results": records, "failures": failures });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
            tally.print();
        }
        Command::Extract { input } => {
            for raw in input {
                let ids = extract_all(raw);
                if ids.is_empty() {
                    eprintln!(
                        "{} {}",
                        "✗".red(),
                        Error::InvalidIdentifier {
                            input: raw.trim().to_string()
                        }
                    );
                    continue;
                }
                for id in ids {
                    if id.is_arxiv_derived() {
                        println!("{id}\tarxiv");
                    } else {
                        println!("{id}");
                    }
                }
            }
        }
        Command::Format { file, format } => {
            let raw = match file {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading stdin")?;
                    buf
                }
            };
            println!("{}", normalize(raw.trim_end(), &(*format).into()));
        }
    }
    Ok(())
}

#[derive(Default)]
struct Tally {
    ok: usize,
    failed: usize,
}

impl Tally {
    fn print(&self) {
        eprintln!("{} {}  {} {}", "✓".green(), self.ok, "✗".red(), self.failed);
    }
}

fn spinner(raw: &str) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("fetching {raw}"));
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn report_failures(state: &BatchState, sink: &mut Vec<Value>) {
    for failure in state.failures() {
        eprintln!("{} {}: {}", "✗".red(), failure.identifier, failure.error);
        sink.push(json!({
            "identifier": failure.identifier.as_str(),
            "error": failure.error.to_string(),
        }));
    }
}

/// How many references a failed batch stands for in the summary.
fn failed_in(raw: &str, err: &Error) -> usize {
    match err {
        Error::AllFetchesFailed(_) => extract_all(raw)
            .into_iter()
            .collect::<HashSet<_>>()
            .len()
            .max(1),
        _ => 1,
    }
}

fn source_name(source: &Source) -> String {
    match source {
        Source::Input(s) => s.clone(),
        Source::File(p) => p.display().to_string(),
    }
}

fn slot_name(slot: Slot) -> &'static str {
    match slot {
        Slot::Arxiv => "arxiv",
        Slot::Primary => "primary",
    }
}

fn origin_name(origin: Origin) -> &'static str {
    match origin {
        Origin::Supplied => "supplied",
        Origin::Related => "related",
    }
}
