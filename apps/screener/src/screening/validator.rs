//! Admission rules applied before a file enters the pipeline.
//!
//! Two tiers: an oversized file rejects the whole incoming group, while a count
//! overflow still accepts the selection truncated to the cap and raises a warning.

use std::collections::HashSet;

use thiserror::Error;

use crate::config::Config;
use crate::screening::models::{AnalysisMode, UploadedFile};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Hard: nothing from the incoming group is accepted.
    #[error("File \"{file_name}\" is larger than the {limit_mb}MB limit.")]
    FileTooLarge { file_name: String, limit_mb: u64 },

    /// Soft: the selection was truncated to `max` and still accepted.
    #[error("You can select a maximum of {max} files.")]
    TooManyFiles { max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionLimits {
    pub max_file_size_mb: u64,
    pub max_bulk_files: usize,
}

impl AdmissionLimits {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

impl Default for AdmissionLimits {
    fn default() -> Self {
        Self {
            max_file_size_mb: 4,
            max_bulk_files: 10,
        }
    }
}

impl From<&Config> for AdmissionLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_file_size_mb: config.max_file_size_mb,
            max_bulk_files: config.max_bulk_files,
        }
    }
}

/// The new selection after admission, plus a warning if it was truncated.
#[derive(Debug, Clone)]
pub struct Admission {
    pub selection: Vec<UploadedFile>,
    pub warning: Option<AdmissionError>,
}

/// Applies the admission rules to `incoming` on top of `existing`.
///
/// On `Err`, the caller keeps its existing selection untouched.
pub fn admit(
    existing: &[UploadedFile],
    incoming: Vec<UploadedFile>,
    mode: AnalysisMode,
    limits: &AdmissionLimits,
) -> Result<Admission, AdmissionError> {
    let (current, candidates): (Vec<UploadedFile>, Vec<UploadedFile>) = match mode {
        // Single mode holds one file: the previous selection is replaced outright.
        AnalysisMode::Single => (Vec::new(), incoming.into_iter().take(1).collect()),
        AnalysisMode::Bulk => {
            let mut seen: HashSet<String> = existing.iter().map(|f| f.name.clone()).collect();
            let fresh = incoming
                .into_iter()
                .filter(|f| seen.insert(f.name.clone()))
                .collect();
            (existing.to_vec(), fresh)
        }
    };

    let ceiling = limits.max_file_size_bytes();
    if let Some(too_large) = candidates.iter().find(|f| f.size > ceiling) {
        return Err(AdmissionError::FileTooLarge {
            file_name: too_large.name.clone(),
            limit_mb: limits.max_file_size_mb,
        });
    }

    let mut selection = current;
    selection.extend(candidates);

    let mut warning = None;
    if mode == AnalysisMode::Bulk && selection.len() > limits.max_bulk_files {
        selection.truncate(limits.max_bulk_files);
        warning = Some(AdmissionError::TooManyFiles {
            max: limits.max_bulk_files,
        });
    }

    Ok(Admission { selection, warning })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    const MB: u64 = 1024 * 1024;

    fn file(name: &str, size: u64) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            size,
            content_type: "application/pdf".to_string(),
            bytes: Bytes::new(),
        }
    }

    fn names(files: &[UploadedFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_oversized_file_rejects_whole_incoming_group() {
        let existing = vec![file("A.pdf", MB)];
        let incoming = vec![file("B.pdf", 5 * MB), file("C.pdf", MB)];

        let err = admit(&existing, incoming, AnalysisMode::Bulk, &AdmissionLimits::default())
            .unwrap_err();

        assert_eq!(
            err,
            AdmissionError::FileTooLarge {
                file_name: "B.pdf".to_string(),
                limit_mb: 4
            }
        );
        assert_eq!(err.to_string(), "File \"B.pdf\" is larger than the 4MB limit.");
        // caller still holds the untouched existing selection
        assert_eq!(names(&existing), vec!["A.pdf"]);
    }

    #[test]
    fn test_exactly_at_ceiling_is_accepted() {
        let admission = admit(
            &[],
            vec![file("edge.pdf", 4 * MB)],
            AnalysisMode::Bulk,
            &AdmissionLimits::default(),
        )
        .unwrap();
        assert_eq!(names(&admission.selection), vec!["edge.pdf"]);
    }

    #[test]
    fn test_bulk_overflow_truncates_and_warns() {
        let incoming: Vec<_> = (1..=12).map(|i| file(&format!("{i:02}.pdf"), MB)).collect();

        let admission =
            admit(&[], incoming, AnalysisMode::Bulk, &AdmissionLimits::default()).unwrap();

        assert_eq!(admission.selection.len(), 10);
        assert_eq!(admission.selection[0].name, "01.pdf");
        assert_eq!(admission.selection[9].name, "10.pdf");
        let warning = admission.warning.unwrap();
        assert_eq!(warning.to_string(), "You can select a maximum of 10 files.");
    }

    #[test]
    fn test_overflow_keeps_existing_files_first() {
        let existing: Vec<_> = (1..=8).map(|i| file(&format!("old{i}.pdf"), MB)).collect();
        let incoming = vec![file("new1.pdf", MB), file("new2.pdf", MB), file("new3.pdf", MB)];

        let admission =
            admit(&existing, incoming, AnalysisMode::Bulk, &AdmissionLimits::default()).unwrap();

        assert_eq!(admission.selection.len(), 10);
        assert_eq!(admission.selection[8].name, "new1.pdf");
        assert_eq!(admission.selection[9].name, "new2.pdf");
        assert!(admission.warning.is_some());
    }

    #[test]
    fn test_bulk_drops_duplicate_names_silently() {
        let existing = vec![file("A.pdf", MB)];
        let incoming = vec![file("A.pdf", 2 * MB), file("B.pdf", MB), file("B.pdf", MB)];

        let admission =
            admit(&existing, incoming, AnalysisMode::Bulk, &AdmissionLimits::default()).unwrap();

        assert_eq!(names(&admission.selection), vec!["A.pdf", "B.pdf"]);
        assert_eq!(admission.selection[0].size, MB);
        assert!(admission.warning.is_none());
    }

    #[test]
    fn test_duplicate_oversized_name_is_dropped_before_size_check() {
        let existing = vec![file("A.pdf", MB)];
        let incoming = vec![file("A.pdf", 9 * MB)];

        let admission =
            admit(&existing, incoming, AnalysisMode::Bulk, &AdmissionLimits::default()).unwrap();

        assert_eq!(names(&admission.selection), vec!["A.pdf"]);
    }

    #[test]
    fn test_single_mode_replaces_existing_selection() {
        let existing = vec![file("old.pdf", MB)];
        let incoming = vec![file("new.pdf", MB), file("extra.pdf", MB)];

        let admission =
            admit(&existing, incoming, AnalysisMode::Single, &AdmissionLimits::default())
                .unwrap();

        assert_eq!(names(&admission.selection), vec!["new.pdf"]);
        assert!(admission.warning.is_none());
    }

    #[test]
    fn test_single_mode_same_name_is_not_deduplicated() {
        let existing = vec![file("cv.pdf", MB)];
        let admission = admit(
            &existing,
            vec![file("cv.pdf", 2 * MB)],
            AnalysisMode::Single,
            &AdmissionLimits::default(),
        )
        .unwrap();
        assert_eq!(admission.selection[0].size, 2 * MB);
    }

    #[test]
    fn test_single_mode_oversized_rejected() {
        let err = admit(
            &[file("keep.pdf", MB)],
            vec![file("huge.pdf", 10 * MB)],
            AnalysisMode::Single,
            &AdmissionLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AdmissionError::FileTooLarge { .. }));
    }

    #[test]
    fn test_huge_size_limit_saturates() {
        let limits = AdmissionLimits {
            max_file_size_mb: u64::MAX,
            max_bulk_files: 10,
        };
        assert_eq!(limits.max_file_size_bytes(), u64::MAX);
        let admission = admit(&[], vec![file("a.pdf", 50 * MB)], AnalysisMode::Bulk, &limits).unwrap();
        assert_eq!(names(&admission.selection), vec!["a.pdf"]);
    }

    #[test]
    fn test_custom_limits() {
        let limits = AdmissionLimits {
            max_file_size_mb: 1,
            max_bulk_files: 2,
        };
        let incoming = vec![file("a.pdf", MB), file("b.pdf", MB), file("c.pdf", MB)];
        let admission = admit(&[], incoming, AnalysisMode::Bulk, &limits).unwrap();
        assert_eq!(names(&admission.selection), vec!["a.pdf", "b.pdf"]);
        assert_eq!(
            admission.warning,
            Some(AdmissionError::TooManyFiles { max: 2 })
        );
    }
}
