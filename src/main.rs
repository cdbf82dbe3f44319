//! daisy-extract - DAISY 2.02 talking book to audio album

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use daisy_extract::{ExtractOptions, ExtractionPlan};

#[derive(Parser)]
#[command(name = "daisy-extract")]
#[command(version, about = "Extract DAISY 2.02 talking books into numbered audio tracks", long_about = None)]
#[command(after_help = "EXAMPLES:
    daisy-extract -i /media/cdrom -o ~/Audiobooks
    daisy-extract -i book -o out --encoding iso-8859-1
    daisy-extract -i book -o out --dry-run")]
struct Cli {
    /// Directory containing the NCC, SMIL and audio files
    #[arg(short, long = "input-directory", value_name = "DIR")]
    input_directory: PathBuf,

    /// Root directory under which <authors>/<title>/ is created
    #[arg(short, long = "output-directory", value_name = "DIR")]
    output_directory: PathBuf,

    /// Text encoding of the NCC and SMIL files
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Show what would be written without copying anything
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    info!("daisy-extract version {}", env!("CARGO_PKG_VERSION"));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}

fn run(cli: &Cli) -> daisy_extract::Result<()> {
    let options = ExtractOptions::new(&cli.input_directory, &cli.output_directory)
        .with_encoding(&cli.encoding)?;

    let plan = daisy_extract::plan(&options)?;
    if cli.dry_run {
        show_plan(&plan);
        return Ok(());
    }

    let report = plan.execute()?;
    info!(
        "Extracted {} tracks to {}",
        report.tracks.len(),
        report.output_dir.display()
    );
    Ok(())
}

fn show_plan(plan: &ExtractionPlan) {
    println!("Title: {}", plan.metadata.title);
    println!("Authors: {}", plan.metadata.authors_display());
    println!("Output: {}", plan.output_dir.display());
    println!("Tracks: {}", plan.tracks.len());
    for track in &plan.tracks {
        println!("  {}  <- {}", track.file_name, track.source.display());
    }
    println!("Playlist: {}", plan.playlist_name);
}
