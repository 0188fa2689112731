//! Result types returned by the batch driver.
//!
//! A [`BatchReport`] always lists every input exactly once, in processing
//! order, whether it produced a document or not. All types serialise to JSON
//! so the CLI's `--json` mode can print the report verbatim.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one input record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardResult {
    /// Path of the input JSON file.
    pub input: PathBuf,
    /// Path of the written document, when generation succeeded.
    pub output: Option<PathBuf>,
    /// Contact name, when the record loaded.
    pub name: Option<String>,
    /// Why the record failed, if it did.
    pub error: Option<RecordError>,
}

impl CardResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// File stem of the input, used as its identifier in logs and reports.
    pub fn input_id(&self) -> String {
        input_id(&self.input)
    }
}

/// Aggregate counters for a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_inputs: usize,
    pub generated: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub cards: Vec<CardResult>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// Records that failed, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &CardResult> {
        self.cards.iter().filter(|c| !c.is_success())
    }

    /// Paths of every written document, in processing order.
    pub fn outputs(&self) -> Vec<&PathBuf> {
        self.cards.iter().filter_map(|c| c.output.as_ref()).collect()
    }
}

/// File stem of `path`, or the whole file name when it has no stem.
pub(crate) fn input_id(path: &std::path::Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(input: &str, output: &str) -> CardResult {
        CardResult {
            input: PathBuf::from(input),
            output: Some(PathBuf::from(output)),
            name: Some("x".into()),
            error: None,
        }
    }

    #[test]
    fn test_failures_and_outputs_split_results() {
        let report = BatchReport {
            cards: vec![
                ok("in/a.json", "out/a.html"),
                CardResult {
                    input: PathBuf::from("in/b.json"),
                    output: None,
                    name: None,
                    error: Some(RecordError::MissingField {
                        field: "name".into(),
                    }),
                },
                ok("in/c.json", "out/c.html"),
            ],
            stats: BatchStats::default(),
        };

        let failed: Vec<_> = report.failures().map(|c| c.input_id()).collect();
        assert_eq!(failed, vec!["b"]);
        assert_eq!(
            report.outputs(),
            vec![&PathBuf::from("out/a.html"), &PathBuf::from("out/c.html")]
        );
    }

    #[test]
    fn test_report_serialises_to_json() {
        let report = BatchReport {
            cards: vec![ok("in/a.json", "out/a.html")],
            stats: BatchStats {
                total_inputs: 1,
                generated: 1,
                failed: 0,
                duration_ms: 3,
            },
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"generated\":1"));
        assert!(json.contains("a.html"));
    }
}
