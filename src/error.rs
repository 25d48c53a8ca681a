//! Error types for the recognition pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the library. Per-candidate problems (bad crop geometry,
/// a recognition failure on one region) are handled inside the pipeline and
/// never reach the caller; these variants cover startup and I/O failures.
#[derive(Debug, Error)]
pub enum PlateError {
    #[error("failed to initialize OCR engine: {0}")]
    OcrInit(String),

    #[error("OCR recognition failed: {0}")]
    OcrRead(String),

    #[error("failed to read authorized-plate roster {path:?}")]
    Roster {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
