//! plategate - automatic number-plate recognition for parking-lot gate control
//!
//! Per frame the pipeline runs five stages: locate candidate regions with a
//! fixed morphological pipeline, filter them down to plate-shaped rectangles,
//! OCR each cropped region, normalize the raw text into a canonical 6-character
//! plate code, and classify the code against the authorized roster. The
//! annotator then draws the outcome back onto the frame for inspection.
//!
//! The authorized roster is loaded once at startup and shared read-only across
//! frames; no other state survives a frame.

pub mod annotate;
pub mod config;
pub mod debug_dump;
pub mod error;
pub mod locate;
pub mod matching;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod regions;

pub use annotate::Annotator;
pub use config::AppConfig;
pub use debug_dump::DebugDump;
pub use error::PlateError;
pub use locate::{locate, FrameScale, Localization};
pub use matching::{classify, AuthorizedPlates, PlateMatch};
pub use normalize::normalize;
pub use ocr::PlateReader;
pub use pipeline::{FrameReport, Pipeline, RunStats};
pub use regions::{filter_rectangles, Candidate};
