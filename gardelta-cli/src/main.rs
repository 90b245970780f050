//! GarDelta CLI - fetch the GAR delta archive and report active address
//! objects grouped by hierarchy level.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gardelta::archive::{ArchiveExtractor, ArchiveFetcher, HttpDownloader, ZipExtractor};
use gardelta::config::{
    DEFAULT_ARCHIVE_PATH, DEFAULT_ARCHIVE_URL, DEFAULT_EXTRACT_DIR, DEFAULT_REPORT_PATH,
};
use gardelta::{run_pipeline, PipelineConfig, PipelineOutcome};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use error::CliError;

#[derive(Parser)]
#[command(name = "gardelta")]
#[command(about = "Grouped report of active address objects from the GAR delta archive")]
#[command(version)]
struct Cli {
    /// Delta archive URL
    #[arg(long, default_value = DEFAULT_ARCHIVE_URL)]
    url: String,

    /// Local path the archive is downloaded to
    #[arg(long, default_value = DEFAULT_ARCHIVE_PATH)]
    archive: PathBuf,

    /// Directory the archive is extracted into
    #[arg(long, default_value = DEFAULT_EXTRACT_DIR)]
    extract_dir: PathBuf,

    /// Report output path
    #[arg(long, default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Process an already extracted directory without downloading
    #[arg(long)]
    skip_download: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let config = PipelineConfig::new()
        .with_archive_url(cli.url)
        .with_archive_path(cli.archive)
        .with_extract_dir(cli.extract_dir)
        .with_report_path(cli.report);

    if cli.skip_download {
        info!(
            "skipping download, processing {}",
            config.extract_dir.display()
        );
    } else {
        let downloader = HttpDownloader::new();
        info!("downloading {}", config.archive_url);
        let bytes = downloader.fetch(&config.archive_url, &config.archive_path)?;
        info!(
            "saved {} bytes to {}",
            bytes,
            config.archive_path.display()
        );

        let extractor = ZipExtractor::new();
        let count = extractor.extract(&config.archive_path, &config.extract_dir)?;
        info!(
            "extracted {} files into {}",
            count,
            config.extract_dir.display()
        );
    }

    match run_pipeline(&config)? {
        PipelineOutcome::NoDataFiles => {
            println!("No AS_ADDR_OBJ data files found in the archive.");
        }
        PipelineOutcome::NoActiveObjects => {
            println!("No active address objects found.");
        }
        PipelineOutcome::ReportWritten {
            path,
            object_count,
            files_processed,
            files_skipped,
        } => {
            println!(
                "Report saved to {} ({} objects from {} files).",
                path.display(),
                object_count,
                files_processed
            );
            if files_skipped > 0 {
                println!("{} data files were skipped due to errors.", files_skipped);
            }
        }
    }

    Ok(())
}
