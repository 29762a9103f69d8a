use std::{fs, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand};
use doi2bib::{Config, FormatOptions, config::DEFAULT_USER_AGENT};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log every step at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Seconds to wait for one BibTeX record
    #[arg(long, global = true, value_name = "SECS", env = "DOI2BIB_BIBTEX_TIMEOUT", default_value_t = 10)]
    pub bibtex_timeout: u64,

    /// Seconds to wait for one arXiv metadata page, per route
    #[arg(long, global = true, value_name = "SECS", env = "DOI2BIB_HTML_TIMEOUT", default_value_t = 20)]
    pub html_timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, global = true, value_name = "UA", env = "DOI2BIB_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            bibtex_timeout: Duration::from_secs(self.bibtex_timeout),
            html_timeout: Duration::from_secs(self.html_timeout),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            ..Config::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and normalize the BibTeX of one or more references
    Fetch {
        #[arg(value_name = "SRC", required = true)]
        from: Vec<Source>,

        #[command(flatten)]
        format: FormatArgs,

        /// Don't look up the published version of an arXiv preprint
        #[arg(long)]
        no_related: bool,

        /// Print results as JSON instead of BibTeX
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical identifier found in each input, without fetching anything
    Extract {
        #[arg(value_name = "INPUT", required = true)]
        input: Vec<String>,
    },
    /// Normalize BibTeX read from a file, or from stdin when no file is given
    Format {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct FormatArgs {
    /// Drop the abstract field
    #[arg(long)]
    pub remove_abstract: bool,

    /// Drop the keywords field
    #[arg(long)]
    pub remove_keywords: bool,

    /// Rebuild each entry with one field per line
    #[arg(long)]
    pub beautify: bool,
}

impl From<FormatArgs> for FormatOptions {
    fn from(args: FormatArgs) -> Self {
        FormatOptions {
            remove_abstract: args.remove_abstract,
            remove_keywords: args.remove_keywords,
            beautify: args.beautify,
        }
    }
}

#[derive(Clone, Debug)]
/// Defines where we can get references from, which can either be
///
/// - one line of user input, possibly holding several comma-separated references, or
/// - a file holding one such line per line.
pub enum Source {
    Input(String),
    File(PathBuf),
}

impl Source {
    /// The batches this source stands for, one per non-empty line for files.
    pub fn batches(&self) -> std::io::Result<Vec<String>> {
        match self {
            Source::Input(s) => Ok(vec![s.clone()]),
            Source::File(path) => Ok(fs::read_to_string(path)?
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
        }
    }
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Is this a path?
        if let Ok(path) = fs::canonicalize(s)
            && path.is_file()
        {
            Ok(Source::File(path))
        }
        // No? Must be a reference then!
        else {
            Ok(Source::Input(s.to_string()))
        }
    }
}
