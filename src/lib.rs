pub mod canonical;
pub mod cli;
pub mod coerce;
pub mod dictionary;
pub mod error;
pub mod frame;
pub mod io_utils;
pub mod load;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod store;
pub mod table;
pub mod value;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use crate::cli::{AppendArgs, Cli, CleanArgs, Commands, DictionaryArgs};
use crate::dictionary::HeaderDictionary;
use crate::pipeline::Cleaner;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("wage_clean", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Append(args) => handle_append(&args),
        Commands::Dictionary(args) => handle_dictionary(&args),
    }
}

fn load_dictionary(path: Option<&Path>) -> Result<HeaderDictionary> {
    match path {
        Some(path) => HeaderDictionary::with_extensions(path)
            .with_context(|| format!("Loading dictionary extensions from {path:?}")),
        None => Ok(HeaderDictionary::builtin()),
    }
}

fn handle_clean(args: &CleanArgs) -> Result<()> {
    if args.preview && args.output.is_some() {
        return Err(anyhow!("--preview cannot be combined with --output"));
    }
    if !(0.0..=1.0).contains(&args.threshold) {
        return Err(anyhow!(
            "--threshold must be within [0,1], got {}",
            args.threshold
        ));
    }

    let delimiter = io_utils::resolve_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let dictionary = load_dictionary(args.dictionary.as_deref())?;

    info!(
        "Cleaning '{}' with delimiter '{}' and {} dictionary entr(ies)",
        args.input.display(),
        printable_delimiter(delimiter),
        dictionary.len()
    );

    let raw = load::load_table(&args.input, delimiter, encoding)?;
    let cleaned = Cleaner::new(&dictionary)
        .threshold(args.threshold)
        .keep_extra(args.keep_extra)
        .clean(raw)?;

    if args.preview {
        let rows = cleaned
            .rows
            .iter()
            .take(args.limit)
            .map(|row| cleaned.render_row(row))
            .collect::<Vec<_>>();
        table::print_table(&cleaned.columns, &rows);
    } else {
        let mut writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
        writer
            .write_record(cleaned.columns.iter())
            .context("Writing output headers")?;
        for row in &cleaned.rows {
            writer
                .write_record(cleaned.render_row(row).iter())
                .context("Writing output row")?;
        }
        writer.flush().context("Flushing output")?;
    }

    if let Some(master) = args.append_to.as_deref() {
        // The master file keeps its own delimiter; a .tsv input must not
        // force tabs into a .csv master.
        let master_delimiter = io_utils::resolve_delimiter(master, args.delimiter);
        let appended = store::append_to_master(&cleaned, master, master_delimiter)?;
        info!("Appended {appended} cleaned row(s) to {master:?}");
    }
    Ok(())
}

fn handle_append(args: &AppendArgs) -> Result<()> {
    let delimiter = io_utils::resolve_delimiter(&args.master, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

    let mut total = 0usize;
    for input in &args.inputs {
        let table = load::load_table(input, delimiter, encoding)?;
        total += store::append_to_master(&table, &args.master, delimiter)
            .with_context(|| format!("Appending {input:?}"))?;
        info!("✓ Appended {input:?}");
    }
    info!("Wrote {total} row(s) to {:?}", args.master);
    Ok(())
}

fn handle_dictionary(args: &DictionaryArgs) -> Result<()> {
    let dictionary = load_dictionary(args.dictionary.as_deref())?;
    let rows = dictionary
        .describe()
        .map(|(variant, key, field)| {
            vec![
                variant.to_string(),
                key.to_string(),
                field.as_str().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = vec![
        "variant".to_string(),
        "normalized".to_string(),
        "canonical field".to_string(),
    ];
    table::print_table(&headers, &rows);
    info!("Listed {} dictionary entr(ies)", dictionary.len());
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
