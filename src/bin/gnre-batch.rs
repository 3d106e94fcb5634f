//! gnre-batch CLI - build a GNRE lot from NF-e XML files

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use gnre_batch::GnreError;
use gnre_batch::gnre::{
    BatchAggregator, BatchResult, DEFAULT_PRODUCT_CODE, DEFAULT_RECEIPT_CODE, GuideParams,
    OriginPolicy,
};

#[derive(Parser)]
#[command(name = "gnre-batch")]
#[command(version)]
#[command(about = "Build a GNRE 2.00 lot from NF-e XML files", long_about = None)]
struct Cli {
    /// NF-e XML files or directories containing them
    #[arg(value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Output lot file (default: Lote_GNRE_<timestamp>.xml)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Revenue code (receita)
    #[arg(long, default_value = DEFAULT_RECEIPT_CODE)]
    receita: String,

    /// Product code (produto)
    #[arg(long, default_value = DEFAULT_PRODUCT_CODE)]
    produto: String,

    /// Payment due date, YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE")]
    vencimento: Option<NaiveDate>,

    /// Origin document policy: numero, chave, legado or TYPE:VALUE
    #[arg(long, default_value = "numero")]
    origem: OriginPolicy,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, GnreError> {
    let due_date = cli.vencimento.unwrap_or_else(|| Local::now().date_naive());
    let params = GuideParams::builder(due_date)
        .receipt_code(cli.receita)
        .product_code(cli.produto)
        .origin(cli.origem)
        .build()?;

    let files = collect_inputs(&cli.inputs)?;
    if files.is_empty() {
        eprintln!("Nenhum arquivo XML informado.");
        return Ok(ExitCode::SUCCESS);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut aggregator = BatchAggregator::new(params);
    for path in &files {
        let name = display_name(path);
        pb.set_message(name.clone());
        match fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(xml) => {
                    aggregator.push(&name, &xml);
                }
                Err(e) => aggregator.push_failure(&name, GnreError::Parse(format!("not UTF-8: {e}"))),
            },
            Err(e) => aggregator.push_failure(&name, GnreError::Parse(format!("cannot read file: {e}"))),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let result = aggregator.finish();
    report(&result, cli.output, cli.json)
}

fn report(result: &BatchResult, output: Option<PathBuf>, json: bool) -> Result<ExitCode, GnreError> {
    let written = match result.to_lot_xml() {
        Some(lot) => {
            let path = output.unwrap_or_else(default_output_name);
            fs::write(&path, lot)?;
            Some(path)
        }
        None => None,
    };

    if json {
        let summary = serde_json::to_string_pretty(&result.summary())
            .map_err(|e| GnreError::Xml(format!("JSON summary: {e}")))?;
        println!("{summary}");
    } else {
        match &written {
            Some(path) => println!(
                "Lote gerado! Total: R$ {} ({} guias) -> {}",
                result.total_formatted(),
                result.fragments.len(),
                path.display()
            ),
            None => println!("Sem guias geradas."),
        }
        if !result.failures.is_empty() {
            println!("Erros:");
            for failure in &result.failures {
                println!("  {failure}");
            }
        }
    }

    Ok(if written.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Expand directories to their `.xml` files, sorted by name; files pass through.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, GnreError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_xml(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn default_output_name() -> PathBuf {
    PathBuf::from(format!(
        "Lote_GNRE_{}.xml",
        Local::now().format("%d-%m-%Y_%H-%M-%S")
    ))
}
