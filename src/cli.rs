use std::{fs, path::PathBuf, str::FromStr};

use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log every chain transition
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Harvest conference paper and proceedings records for every record in the given feeds
    Harvest {
        #[arg(value_name = "SRC", required = true)]
        from: Vec<Source>,

        #[command(flatten)]
        options: HarvestOptions,
    },
}

#[derive(Args, Debug, Default)]
pub struct HarvestOptions {
    /// Prefix the contribution identifier is appended to
    #[arg(long, value_name = "URL")]
    pub base_conference_paper_url: Option<String>,

    /// Prefix the internal conference id is appended to
    #[arg(long, value_name = "URL")]
    pub base_proceedings_url: Option<String>,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Write JSON Lines here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a metadata feed comes from: a local file, or a URL (`file`, `http` or `https`).
pub enum Source {
    File(PathBuf),
    Url(Url),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(path) = fs::canonicalize(s) {
            return Ok(Source::File(path));
        }
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "file" | "http" | "https") => Ok(Source::Url(url)),
            _ => Err(format!("{s} is neither an existing file nor a file/http(s) URL")),
        }
    }
}
