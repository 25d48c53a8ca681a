//! Plate matching against the authorized roster
//!
//! The roster is loaded once at startup and treated as read-only for the
//! lifetime of the pipeline. Matching is exact byte equality; there is no
//! fuzzy comparison anywhere in the gate decision.

use std::path::Path;

use imageproc::rect::Rect;

use crate::error::PlateError;

/// The list of plate codes permitted through the gate, in file order.
#[derive(Debug, Clone, Default)]
pub struct AuthorizedPlates {
    plates: Vec<String>,
}

impl AuthorizedPlates {
    /// Load the roster from a line-delimited text file: one plate per
    /// non-empty line, order preserved. An empty file is a valid roster
    /// that authorizes nothing.
    pub fn load(path: &Path) -> Result<Self, PlateError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlateError::Roster {
            path: path.to_path_buf(),
            source,
        })?;
        let plates = content
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self { plates })
    }

    pub fn from_plates(plates: Vec<String>) -> Self {
        Self { plates }
    }

    /// Exact, case-sensitive membership test; short-circuits on the first hit.
    pub fn contains(&self, code: &str) -> bool {
        self.plates.iter().any(|plate| plate == code)
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

/// Outcome for one surviving rectangle in one frame. Created by the match
/// engine, consumed by the annotator, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateMatch {
    /// Bounding rectangle in working-frame coordinates.
    pub rect: Rect,
    /// Normalized plate code; empty when no valid code was extracted.
    pub code: String,
    /// A plausible plate code was extracted from this region.
    pub id_valid: bool,
    /// The code appears in the authorized roster.
    pub authorized: bool,
}

/// Classify one candidate rectangle given its normalized plate code.
///
/// `id_valid` intentionally uses a looser length check than the normalizer's
/// 6-character rule; under the normalizer's contract the two are equivalent,
/// but the looser signal is kept as a separate notion of validity.
/// `authorized` requires `id_valid` so that the invariant
/// `authorized implies id_valid` holds for any roster content.
pub fn classify(rect: Rect, code: String, roster: &AuthorizedPlates) -> PlateMatch {
    let id_valid = code.len() > 1;
    let authorized = id_valid && roster.contains(&code);
    PlateMatch {
        rect,
        code,
        id_valid,
        authorized,
    }
}
