use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::resolve::DEFAULT_FUZZY_THRESHOLD;

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize regional wage statistics exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean one export: normalize headers, coerce types, derive indicators
    Clean(CleanArgs),
    /// Append already-cleaned CSV files to a master table
    Append(AppendArgs),
    /// List the header dictionary (variants, normalized keys, canonical fields)
    Dictionary(DictionaryArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input CSV file to clean ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Master CSV file to append the cleaned rows to
    #[arg(long = "append-to")]
    pub append_to: Option<PathBuf>,
    /// Extra header variants merged after the built-in dictionary
    #[arg(short = 'd', long = "dictionary")]
    pub dictionary: Option<PathBuf>,
    /// Fuzzy-match acceptance threshold in [0,1]
    #[arg(long, default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub threshold: f64,
    /// Keep unmapped source columns as passthrough output columns
    #[arg(long = "keep-extra")]
    pub keep_extra: bool,
    /// Show the first rows as a formatted table instead of writing CSV
    #[arg(long)]
    pub preview: bool,
    /// Limit the number of rows shown with --preview
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct AppendArgs {
    /// Cleaned CSV files to append, in order
    #[arg(short = 'i', long = "input", required = true)]
    pub inputs: Vec<PathBuf>,
    /// Master CSV file receiving the rows
    #[arg(short = 'm', long = "master")]
    pub master: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct DictionaryArgs {
    /// Extra header variants merged after the built-in dictionary
    #[arg(short = 'd', long = "dictionary")]
    pub dictionary: Option<PathBuf>,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "," | "comma" => Ok(b','),
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        ";" | "semicolon" => Ok(b';'),
        "|" | "pipe" => Ok(b'|'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        other => Err(format!("Unsupported delimiter '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_tokens_parse() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert!(parse_delimiter("comma-ish").is_err());
    }
}
