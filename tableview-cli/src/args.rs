//! Command line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "tableview", version, about = "Browse and edit a remote paginated table")]
pub struct Cli {
    /// Base url of the endpoint family (`list/`, `add/`, `update/`, `delete/`)
    #[arg(short, long, env = "TABLEVIEW_URL")]
    pub url: String,

    /// Page to show
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page
    #[arg(short = 's', long, default_value_t = 10)]
    pub page_size: u32,

    /// Column to show, as `key` or `key:Header`. Repeatable.
    #[arg(short, long = "column", value_name = "KEY[:HEADER]")]
    pub columns: Vec<ColumnArg>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log to stderr instead of the log file
    #[arg(short, long)]
    pub verbose: bool,

    /// Log file (defaults to `latest.log` in the cache directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current page (default)
    List,
    /// Create a record through the "New Record" form
    Add {
        #[command(flatten)]
        inputs: FormInputs,
    },
    /// Edit a record through the "Edit Record" form
    Edit {
        /// Record id
        id: String,
        #[command(flatten)]
        inputs: FormInputs,
    },
    /// Delete a record
    Delete {
        /// Record id
        id: String,
    },
}

/// Values typed into a form before it is submitted.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    /// Field value, as `name=value`. Repeatable.
    #[arg(short, long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<KeyValue>,

    /// File to attach, as `name=path`. Repeatable.
    #[arg(long = "file", value_name = "NAME=PATH")]
    pub files: Vec<KeyValue>,
}

/// A `--column` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnArg {
    pub key: String,
    pub header: String,
}

impl FromStr for ColumnArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, header) = match s.split_once(':') {
            Some((key, header)) => (key.trim(), header.trim()),
            None => (s.trim(), s.trim()),
        };
        if key.is_empty() {
            return Err(format!("column '{}' has no key", s));
        }
        Ok(Self {
            key: key.to_string(),
            header: header.to_string(),
        })
    }
}

/// A `name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub name: String,
    pub value: String,
}

impl FromStr for KeyValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(Self {
                name: name.to_string(),
                value: value.to_string(),
            }),
            _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
        }
    }
}
