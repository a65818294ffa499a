//! Per-member conversion diagnostics.
//!
//! Degraded conversions are values, not errors: a pull or push that had to
//! drop or guess placement data still returns a result, and records what it
//! lost here. Every warning is also sent to the `log` facade, so callers that
//! install a logger see it without inspecting the diagnostics.
//!
//! # Example
//!
//! ```ignore
//! let outcome = pull(&input, &options);
//! if !outcome.diagnostics.is_clean() {
//!     for warning in &outcome.diagnostics.warnings {
//!         eprintln!("{warning}");
//!     }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classify::CurveCategory;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileDiagnostics {
    /// Classification of the driving curve; `None` when it was invalid.
    pub curve_category: Option<CurveCategory>,

    /// Justification was known but could not be carried over (curved or
    /// non-planar members).
    pub justification_dropped: bool,

    /// Push found no stored justification and placed the member centred.
    pub metadata_missing: bool,

    /// Push reversed the curve to make a column's elevation increase.
    pub curve_flipped: bool,

    /// The profile had no usable extents; offsets were taken raw.
    pub degenerate_profile: bool,

    pub warnings: Vec<String>,

    /// Informational messages; they do not make a conversion unclean.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ReconcileDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `warning` and logs it at warn level.
    pub fn warn(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Records `note` and logs it at info level.
    pub fn note(&mut self, note: impl Into<String>) {
        let note = note.into();
        log::info!("{note}");
        self.notes.push(note);
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// `true` when the conversion lost nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.justification_dropped
            && !self.metadata_missing
            && !self.degenerate_profile
            && !matches!(self.curve_category, None | Some(CurveCategory::NonPlanar))
            && self.warnings.is_empty()
    }

    /// Short summary suitable for logging.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![match self.curve_category {
            Some(category) => format!("{category:?}"),
            None => "invalid-curve".to_string(),
        }];
        if self.justification_dropped {
            parts.push("justification-dropped".to_string());
        }
        if self.metadata_missing {
            parts.push("metadata-missing".to_string());
        }
        if self.curve_flipped {
            parts.push("flipped".to_string());
        }
        if self.degenerate_profile {
            parts.push("degenerate-profile".to_string());
        }
        if !self.warnings.is_empty() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }
        parts.join(" ")
    }
}

impl fmt::Display for ReconcileDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        for warning in &self.warnings {
            write!(f, "\n  - {warning}")?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_not_clean_without_category() {
        let diag = ReconcileDiagnostics::new();
        assert!(!diag.is_clean());
        assert!(!diag.has_warnings());
        assert_eq!(diag.summary(), "invalid-curve");
    }

    #[test]
    fn test_clean_linear_member() {
        let diag = ReconcileDiagnostics {
            curve_category: Some(CurveCategory::LinearOther),
            ..ReconcileDiagnostics::default()
        };
        assert!(diag.is_clean());
        assert_eq!(diag.summary(), "LinearOther");
    }

    #[test]
    fn test_warn_records_and_dirties() {
        let mut diag = ReconcileDiagnostics {
            curve_category: Some(CurveCategory::LinearVertical),
            ..ReconcileDiagnostics::default()
        };
        diag.warn("justification code 2 read as Center");
        assert!(diag.has_warnings());
        assert!(!diag.is_clean());
        assert!(diag.to_string().contains("code 2"));
    }

    #[test]
    fn test_summary_lists_flags() {
        let diag = ReconcileDiagnostics {
            curve_category: Some(CurveCategory::LinearVertical),
            metadata_missing: true,
            curve_flipped: true,
            ..ReconcileDiagnostics::default()
        };
        assert_eq!(diag.summary(), "LinearVertical metadata-missing flipped");
    }

    #[test]
    fn test_notes_are_not_warnings() {
        let mut diag = ReconcileDiagnostics {
            curve_category: Some(CurveCategory::LinearOther),
            ..ReconcileDiagnostics::default()
        };
        diag.note("no stored justification; member pushed centred");
        assert!(!diag.has_warnings());
        assert!(diag.is_clean());
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.summary(), "LinearOther");
        assert!(diag.to_string().contains("note: no stored justification"));
    }
}
