use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use poscrawl::{
    HarvestConfig, Harvester, HttpFetcher, JsonLinesSink,
    source::{Envelope, oai},
    transport::Fetcher,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, HarvestOptions, Source};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);
    match args.command {
        Command::Harvest { from, options } => harvest(&from, options),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "poscrawl=debug" } else { "poscrawl=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn config_for(options: &HarvestOptions) -> HarvestConfig {
    let mut config = HarvestConfig::from_env();
    if let Some(url) = &options.base_conference_paper_url {
        config.base_conference_paper_url = url.clone();
    }
    if let Some(url) = &options.base_proceedings_url {
        config.base_proceedings_url = url.clone();
    }
    if let Some(jobs) = options.jobs {
        config.jobs = jobs;
    }
    config
}

fn read_envelopes(sources: &[Source], fetcher: &HttpFetcher) -> anyhow::Result<Vec<Envelope>> {
    let mut envelopes = Vec::new();
    for source in sources {
        let (name, xml) = match source {
            Source::File(path) => (
                path.display().to_string(),
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
            ),
            Source::Url(url) => (url.to_string(), fetcher.fetch(url.as_str())?),
        };
        let decoded = oai::decode(&xml).with_context(|| format!("failed to decode {name}"))?;
        info!(source = %name, records = decoded.len(), "feed decoded");
        envelopes.extend(decoded);
    }
    Ok(envelopes)
}

fn harvest(sources: &[Source], options: HarvestOptions) -> anyhow::Result<()> {
    let config = config_for(&options);
    let fetcher = HttpFetcher::new(&config);
    let envelopes = read_envelopes(sources, &fetcher)?;

    let out: Box<dyn Write + Send> = match &options.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    };
    let sink = JsonLinesSink::new(out);

    let progress = ProgressBar::new(envelopes.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let harvester = Harvester::new(config, fetcher);
    let report = harvester.harvest(envelopes, &sink, &|outcome| {
        progress.inc(1);
        if let Some(id) = &outcome.identifier {
            progress.set_message(id.clone());
        }
    })?;
    progress.finish_and_clear();
    sink.into_inner().flush().context("failed to flush output")?;

    eprintln!(
        "{} {}  {} {}",
        "✓".green(),
        report.succeeded(),
        "✗".red(),
        report.failed()
    );
    Ok(())
}
