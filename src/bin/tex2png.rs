//! tex2png - Command-line interface for TEX texture conversion
//!
//! Converts a single `.tex` file, or every `.tex` entry of an `.ipa` archive,
//! to PNG.

use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tex2png::batch::{is_archive_path, is_texture_path};
use tex2png::{convert_file, BatchConverter, BatchOptions, EntryOutcome, PvrtcDecoder};

const USAGE: &str = "Usage: tex2png <filename.tex | filename.ipa>";

#[derive(Parser)]
#[command(name = "tex2png")]
#[command(about = "Convert TEX textures (or every texture in an .ipa archive) to PNG")]
#[command(version)]
struct Cli {
    /// Input .tex file or .ipa archive
    input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep existing PNG files instead of overwriting them
    #[arg(short, long)]
    skip_existing: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("{USAGE}");
            return;
        }
    };

    let result = if is_texture_path(&cli.input) {
        single_convert(
            &cli.input,
            cli.output.as_deref(),
            cli.skip_existing,
            cli.verbose,
            cli.quiet,
        )
    } else if is_archive_path(&cli.input) {
        batch_convert(
            &cli.input,
            cli.output.as_deref(),
            cli.skip_existing,
            cli.verbose,
            cli.quiet,
        )
    } else {
        println!("Unknown file extension");
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// PNG path for a single texture: same stem, `.png`, optionally in `output_dir`
fn png_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let png = input.with_extension("png");
    match (output_dir, png.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => png,
    }
}

fn single_convert(
    input: &Path,
    output_dir: Option<&Path>,
    skip_existing: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let output = png_path(input, output_dir);

    if skip_existing && output.exists() {
        if !quiet {
            println!("Skipping '{}': output already exists", output.display());
        }
        return Ok(());
    }

    if verbose {
        println!("Converting '{}' to '{}'", input.display(), output.display());
    }

    let start_time = Instant::now();

    let header = convert_file(input, &output, &PvrtcDecoder::new())
        .map_err(|e| format!("Conversion failed: {}", e))?;

    if !quiet {
        println!("✓ Conversion successful!");
        println!("  Size:   {}x{}", header.width, header.height);
        println!("  Format: {}", header.format);
        println!("  Output: {}", output.display());
        println!("  Time:   {:.2?}", start_time.elapsed());
    }

    Ok(())
}

fn batch_convert(
    input: &Path,
    output_dir: Option<&Path>,
    skip_existing: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let mut options = BatchOptions::new().with_skip_existing(skip_existing);
    if let Some(dir) = output_dir {
        options = options.with_output_dir(dir);
    }

    let start_time = Instant::now();
    let total = BatchConverter::count_textures(input)?;

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    };

    let decoder = PvrtcDecoder::new();
    let converter = BatchConverter::new(options, &decoder);
    let report = converter.convert_archive(input, |entry| {
        progress.set_message(entry.name.clone());
        match &entry.outcome {
            EntryOutcome::Converted { .. } if verbose => {
                progress.println(entry.name.clone());
            }
            EntryOutcome::Skipped { reason } if verbose => {
                progress.println(format!("{} (skipped: {})", entry.name, reason));
            }
            EntryOutcome::Failed { error } => {
                progress.println(format!("✗ {}: {}", entry.name, error));
            }
            _ => {}
        }
        progress.inc(1);
    })?;

    progress.finish_with_message("Batch conversion complete");

    if !quiet {
        println!("✓ Batch conversion finished!");
        println!("  Converted: {}", report.converted());
        println!("  Skipped:   {}", report.skipped());
        println!("  Failed:    {}", report.failed());
        println!("  Time:      {:.2?}", start_time.elapsed());
    }

    Ok(())
}
