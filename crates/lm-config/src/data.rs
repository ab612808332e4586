//! Input data tables for the worked analyses.
//!
//! All tables are immutable after load: the evaluator reads them behind
//! shared references and never mutates them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// One grouped record of a randomized-encouragement trial with one-sided
/// noncompliance: `count` units sharing the same assignment/receipt pattern,
/// of which `successes` had a positive outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceGroup {
    /// Randomized to receive treatment.
    pub assigned: bool,
    /// Actually received treatment.
    pub received: bool,
    /// Number of units in the group (frequency weight).
    pub count: u64,
    /// Units in the group with a positive outcome.
    pub successes: u64,
}

/// A full noncompliance trial table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceTrial {
    #[serde(default)]
    pub description: Option<String>,
    pub groups: Vec<ComplianceGroup>,
}

impl ComplianceTrial {
    /// Load and parse a trial table from a JSON file. Semantic validation is
    /// a separate step (`validate::validate_compliance_trial`).
    pub fn load(path: impl AsRef<Path>) -> ValidationResult<Self> {
        read_json(path.as_ref())
    }
}

/// Detection history of one site: per-visit detection counts, each out of
/// the survey-wide number of subtrials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSite {
    pub detections: Vec<u64>,
}

impl DetectionSite {
    /// Whether the site was never detected at any visit.
    pub fn never_detected(&self) -> bool {
        self.detections.iter().all(|&d| d == 0)
    }
}

/// A repeated-visit detection survey: every site is visited the same number
/// of times, and each visit comprises `subtrials_per_visit` detection
/// opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSurvey {
    #[serde(default)]
    pub description: Option<String>,
    pub subtrials_per_visit: u32,
    pub sites: Vec<DetectionSite>,
}

impl DetectionSurvey {
    /// Number of visits per site (0 for an empty survey).
    pub fn visits(&self) -> usize {
        self.sites.first().map_or(0, |s| s.detections.len())
    }

    pub fn load(path: impl AsRef<Path>) -> ValidationResult<Self> {
        read_json(path.as_ref())
    }
}

/// A bag-of-words corpus for topic classification: per-document term counts
/// over a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCorpus {
    #[serde(default)]
    pub description: Option<String>,
    pub vocabulary: usize,
    pub topics: usize,
    /// `documents[d][v]` = count of vocabulary term v in document d.
    pub documents: Vec<Vec<u64>>,
}

impl TopicCorpus {
    pub fn load(path: impl AsRef<Path>) -> ValidationResult<Self> {
        read_json(path.as_ref())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ValidationResult<T> {
    let file = File::open(path)
        .map_err(|e| ValidationError::IoError(format!("{}: {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ValidationError::ParseError(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn compliance_trial_json_round_trip() {
        let trial = ComplianceTrial {
            description: Some("vitamin A".into()),
            groups: vec![
                ComplianceGroup {
                    assigned: true,
                    received: true,
                    count: 100,
                    successes: 90,
                },
                ComplianceGroup {
                    assigned: false,
                    received: false,
                    count: 150,
                    successes: 120,
                },
            ],
        };
        let json = serde_json::to_string(&trial).unwrap();
        let back: ComplianceTrial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trial);
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"groups":[{{"assigned":true,"received":true,"count":10,"successes":7}}]}}"#
        )
        .unwrap();
        let trial = ComplianceTrial::load(file.path()).unwrap();
        assert_eq!(trial.groups.len(), 1);
        assert_eq!(trial.groups[0].successes, 7);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ComplianceTrial::load("/nonexistent/trial.json").unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }

    #[test]
    fn load_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = ComplianceTrial::load(file.path()).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn never_detected_flag() {
        let quiet = DetectionSite {
            detections: vec![0, 0, 0],
        };
        let seen = DetectionSite {
            detections: vec![0, 2, 0],
        };
        assert!(quiet.never_detected());
        assert!(!seen.never_detected());
    }

    #[test]
    fn survey_visit_count() {
        let survey = DetectionSurvey {
            description: None,
            subtrials_per_visit: 18,
            sites: vec![DetectionSite {
                detections: vec![0, 1, 0],
            }],
        };
        assert_eq!(survey.visits(), 3);
    }
}
