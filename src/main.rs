//! plategate - license-plate gate control over camera frames
//!
//! Reads the authorized-plate roster once, then runs every given frame
//! through the recognition pipeline and reports which plates were seen and
//! whether they are allowed through the gate.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use plategate::config::{self, AppConfig};
use plategate::{Annotator, AuthorizedPlates, DebugDump, Pipeline, PlateReader};

/// plategate - automatic number-plate recognition for gate control
#[derive(Parser, Debug)]
#[command(name = "plategate")]
#[command(about = "Locates, reads and authorizes license plates in camera frames")]
struct Args {
    /// Frame images to process, in stream order
    #[arg(required = true)]
    frames: Vec<PathBuf>,

    /// Authorized-plate roster, one plate per line
    #[arg(short, long)]
    plates: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write every intermediate pipeline image below this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Write annotated frames to this directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    let roster = AuthorizedPlates::load(&args.plates)
        .context("could not load the authorized-plate roster")?;
    info!(
        "loaded {} authorized plates from {:?}",
        roster.len(),
        args.plates
    );
    if roster.is_empty() {
        warn!("authorized-plate roster is empty, every plate will be unauthorized");
    }

    // OCR init failure is fatal: the pipeline cannot run without it.
    let reader = build_reader(&config)?;

    let dump = match args.debug_dir.clone().or_else(|| config.debug.dump_dir.clone()) {
        Some(dir) => DebugDump::new(dir),
        None => DebugDump::disabled(),
    };
    let annotator = Annotator::new(config.annotate.font.as_deref());
    let mut pipeline = Pipeline::new(roster, reader, annotator, dump);

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {dir:?}"))?;
    }

    let mut decoded_any = false;
    for (index, path) in args.frames.iter().enumerate() {
        let mut frame = match image::open(path) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("skipping unreadable frame {:?}: {err}", path);
                continue;
            }
        };
        decoded_any = true;

        let report = pipeline.process_frame(&mut frame);
        for m in &report.matches {
            if m.authorized {
                info!("frame {index}: OK {}", m.code);
            } else if m.id_valid {
                info!("frame {index}: unknown plate {}", m.code);
            }
        }

        if let Some(dir) = &args.out_dir {
            let out = dir.join(format!("frame_{index:04}.png"));
            if let Err(err) = frame.save(&out) {
                warn!("failed to write annotated frame {:?}: {err}", out);
            }
        }
    }

    if !decoded_any {
        bail!("no readable frames among the given sources");
    }

    let stats = pipeline.stats();
    info!(
        "processed {} frames, {} with a valid plate id",
        stats.frames, stats.frames_with_id
    );

    Ok(())
}

#[cfg(feature = "tesseract")]
fn build_reader(config: &AppConfig) -> Result<Box<dyn PlateReader>> {
    use plategate::ocr::TesseractReader;

    let reader = TesseractReader::new(&config.ocr.language, &config.ocr.whitelist)
        .context("OCR engine initialization failed")?;
    Ok(Box::new(reader))
}

#[cfg(not(feature = "tesseract"))]
fn build_reader(_config: &AppConfig) -> Result<Box<dyn PlateReader>> {
    bail!("this build has no OCR backend; rebuild with `--features tesseract`")
}
