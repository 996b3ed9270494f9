//! Command-line front end: trim one GPX file or every GPX file in a ZIP archive.

use std::fs::{self, File};
use std::io::{BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use gpx_trimmer::{trim_archive, trim_gpx, trimmed_file_name, TrimConfig};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trim long pauses from GPX tracks", long_about = None)]
struct Cli {
    /// GPX file or ZIP archive of GPX files
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Speed in m/s below which points are part of a pause [default: 0.1]
    #[arg(long, alias = "min_speed")]
    min_speed: Option<f64>,

    /// Minimum pause duration in seconds before it is trimmed [default: 240]
    #[arg(long, alias = "min_pause_duration")]
    min_pause_duration: Option<f64>,

    /// JSON file with `min_speed` and/or `min_pause_duration`
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Output path (defaults to `<input>_trimmed.<ext>`)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Print pause reports as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<TrimConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => TrimConfig::default(),
    };
    if let Some(v) = cli.min_speed {
        config.min_speed = v;
    }
    if let Some(v) = cli.min_pause_duration {
        config.min_pause_duration = v;
    }
    config.validate()?;
    Ok(config)
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(&cli)?;
    if !cli.input.is_file() {
        bail!("input {} does not exist", cli.input.display());
    }
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| trimmed_file_name(&cli.input));
    info!(
        "[gpx-trimmer] min_speed={} m/s, min_pause_duration={} s",
        config.min_speed, config.min_pause_duration
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if is_zip(&cli.input) {
        let reader = BufReader::new(
            File::open(&cli.input)
                .with_context(|| format!("failed to open {}", cli.input.display()))?,
        );
        let mut buffer = Cursor::new(Vec::new());
        let reports = trim_archive(reader, &mut buffer, &config)
            .with_context(|| format!("failed to trim {}", cli.input.display()))?;
        fs::write(&output, buffer.into_inner())
            .with_context(|| format!("failed to write {}", output.display()))?;

        if cli.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        } else {
            for entry in &reports {
                writeln!(out, "\n=== {} ===\n", entry.name)?;
                match (&entry.report, &entry.error) {
                    (Some(report), _) => writeln!(out, "{}", report)?,
                    (None, Some(error)) => writeln!(out, "Skipped: {}", error)?,
                    (None, None) => {}
                }
            }
        }

        let trimmed = reports.iter().filter(|r| r.is_ok()).count();
        if trimmed > 0 {
            eprintln!(
                "\nCreated {} with {} trimmed track(s).",
                output.display(),
                trimmed
            );
        } else {
            eprintln!("No .gpx files could be trimmed in the archive.");
        }
        return Ok(());
    }

    let reader = BufReader::new(
        File::open(&cli.input).with_context(|| format!("failed to open {}", cli.input.display()))?,
    );
    let mut buffer = Vec::new();
    let report = trim_gpx(reader, &mut buffer, &config)
        .with_context(|| format!("failed to trim {}", cli.input.display()))?;
    fs::write(&output, buffer).with_context(|| format!("failed to write {}", output.display()))?;

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        let name = cli
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        writeln!(out, "\n=== {} ===\n", name)?;
        writeln!(out, "{}", report)?;
    }
    eprintln!("\nCreated {}", output.display());
    Ok(())
}
