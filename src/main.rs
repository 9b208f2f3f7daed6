use std::path::{Path, PathBuf};
use std::process::ExitCode;

use archive_date::config::Settings;
use archive_date::dataset;
use archive_date::scanner::{RESULT_FILE, scan_archive};
use archive_date::{DateResolver, Document, Error, SummaryMode};
use chrono::{DateTime, Local, NaiveDate};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "archive-date",
    about = "Find the date a scanned, OCR'd document belongs to"
)]
struct Cli {
    /// Reference date (YYYY-MM-DD); later dates are ignored. Defaults to today
    #[arg(long, global = true, env = "ARCHIVE_DATE_TODAY")]
    today: Option<NaiveDate>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the date mentioned in a string, e.g. "30/01/2016"
    Parse {
        text: Vec<String>,
    },
    /// Print the authoritative date of each OCR text file
    Resolve {
        files: Vec<PathBuf>,
        /// Print evidence, candidates and label as JSON
        #[arg(long)]
        explain: bool,
    },
    /// Build a classifier dataset from a filed archive → JSON
    Dataset {
        /// Archive root, laid out as YYYY/MM/DD/<title>/result.txt
        root: PathBuf,
        /// Write literal candidate dates instead of day offsets
        #[arg(long)]
        dates: bool,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Name of the transcript files to collect
        #[arg(long, default_value = RESULT_FILE)]
        result_file: String,
    },
    /// Check the classifier against a dataset written by `dataset`
    Evaluate {
        dataset: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::new(cli.today);
    tracing::info!(today = %settings.today, "reference date");

    let result = match cli.command {
        Command::Parse { text } => run_parse(&settings, &text),
        Command::Resolve { files, explain } => run_resolve(&settings, &files, explain),
        Command::Dataset {
            root,
            dates,
            output,
            result_file,
        } => {
            let mode = if dates {
                SummaryMode::Dates
            } else {
                SummaryMode::Offsets
            };
            let settings = settings.with_result_file(result_file).with_mode(mode);
            run_dataset(&settings, &root, output.as_deref())
        }
        Command::Evaluate { dataset } => run_evaluate(&dataset),
    };

    result.unwrap_or_else(|err| {
        eprintln!("error: {err}");
        ExitCode::FAILURE
    })
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "archive_date=info"
    } else {
        "archive_date=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "none".to_string(), |d| d.to_string())
}

// ═══════════════════════════════════════════════════════════════════════
//  PARSE MODE: one string → one date
// ═══════════════════════════════════════════════════════════════════════

fn run_parse(settings: &Settings, text: &[String]) -> Result<ExitCode, Error> {
    let resolver = DateResolver::new(settings.parser_config());
    let raw = text.join(" ");
    println!("{}", print_date(resolver.parser().parse(&raw)));
    Ok(ExitCode::SUCCESS)
}

// ═══════════════════════════════════════════════════════════════════════
//  RESOLVE MODE: OCR text files → authoritative dates
// ═══════════════════════════════════════════════════════════════════════

struct LoadedFile {
    path: String,
    text: String,
    modified: Option<NaiveDate>,
}

fn load_file(path: &Path) -> Result<LoadedFile, Error> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).date_naive())
        .map_err(|e| tracing::warn!(path = %path.display(), error = %e, "no modification time"))
        .ok();
    Ok(LoadedFile {
        path: path.to_string_lossy().into_owned(),
        text: String::from_utf8_lossy(&bytes).into_owned(),
        modified,
    })
}

fn run_resolve(settings: &Settings, files: &[PathBuf], explain: bool) -> Result<ExitCode, Error> {
    let resolver = DateResolver::new(settings.parser_config());

    let loaded = files
        .par_iter()
        .map(|p| load_file(p))
        .collect::<Result<Vec<_>, Error>>()?;

    let resolutions: Vec<_> = loaded
        .par_iter()
        .map(|f| {
            resolver.resolve(&Document {
                path: Some(&f.path),
                text: &f.text,
                modified: f.modified,
            })
        })
        .collect();

    for (file, resolution) in loaded.iter().zip(&resolutions) {
        if explain {
            #[derive(serde::Serialize)]
            struct Explained<'a> {
                path: &'a str,
                modified: Option<NaiveDate>,
                #[serde(flatten)]
                resolution: &'a archive_date::Resolution,
            }

            let json = serde_json::to_string_pretty(&Explained {
                path: &file.path,
                modified: file.modified,
                resolution,
            })?;
            println!("{json}");
        } else {
            println!("{}\t{}", file.path, print_date(resolution.date));
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ═══════════════════════════════════════════════════════════════════════
//  DATASET MODE: archive → labeled feature vectors
// ═══════════════════════════════════════════════════════════════════════

fn run_dataset(settings: &Settings, root: &Path, output: Option<&Path>) -> Result<ExitCode, Error> {
    let resolver = DateResolver::new(settings.parser_config());
    let files = scan_archive(root, &settings.result_file);
    let records = dataset::create_dataset(&resolver, &files, settings.mode)?;
    eprintln!("Created dataset with {} records.", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json).map_err(|e| Error::io(path, e))?;
            eprintln!("  {} ({} bytes)", path.display(), json.len());
        }
        None => println!("{json}"),
    }
    Ok(ExitCode::SUCCESS)
}

// ═══════════════════════════════════════════════════════════════════════
//  EVALUATE MODE: dataset → classifier agreement report
// ═══════════════════════════════════════════════════════════════════════

fn run_evaluate(path: &Path) -> Result<ExitCode, Error> {
    let records = dataset::load_dataset(path)?;
    eprintln!("Validating with {} records.", records.len());

    let eval = dataset::evaluate(&records)?;
    for m in &eval.mismatches {
        println!(
            "Validation failed! Expected: {}. Actual: {}. ({})",
            m.expected, m.actual, m.path
        );
    }
    println!(
        "{} of {} records agree ({:.1}%)",
        eval.correct,
        eval.total,
        eval.accuracy() * 100.0
    );

    Ok(if eval.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
