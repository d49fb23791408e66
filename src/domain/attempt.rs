//! Warm-up creation attempts
//!
//! Every suggestion, successful or not, leaves an attempt record.
//!
//! ID Format: `w-{7-char-hash}` (e.g., `w-3c9a01f`), hashed from the
//! selected workouts and the creation timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AttemptIdError {
    #[error("Invalid attempt ID format: expected 'w-{{7-char-hash}}', got '{0}'")]
    Invalid(String),
}

/// Attempt ID in the format `w-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttemptId {
    hash: String,
}

impl AttemptId {
    pub fn new(workouts: &[String], timestamp: DateTime<Utc>) -> Self {
        let input = format!(
            "{}{}",
            workouts.join("\u{1f}"),
            timestamp.timestamp_nanos_opt().unwrap_or(0)
        );
        let hash = blake3::hash(input.as_bytes());
        Self {
            hash: hash.to_hex()[..7].to_string(),
        }
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w-{}", self.hash)
    }
}

impl FromStr for AttemptId {
    type Err = AttemptIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("w-")
            .ok_or_else(|| AttemptIdError::Invalid(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AttemptIdError::Invalid(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_lowercase(),
        })
    }
}

impl TryFrom<String> for AttemptId {
    type Error = AttemptIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AttemptId> for String {
    fn from(id: AttemptId) -> Self {
        id.to_string()
    }
}

/// One run of the warm-up planner for a workout selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupAttempt {
    pub id: AttemptId,

    pub date: DateTime<Utc>,

    /// Selected workout movements
    pub workouts: Vec<String>,

    /// Suggested warm-up; empty when the attempt failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warmups: Vec<String>,

    /// Number of minimal warm-ups found
    #[serde(default)]
    pub options: usize,

    /// Search time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ex_time_ms: Option<f64>,

    pub passed: bool,
}

impl WarmupAttempt {
    /// Records a successful suggestion
    pub fn passed(workouts: Vec<String>, warmups: Vec<String>, options: usize, ex_time_ms: f64) -> Self {
        let date = Utc::now();
        Self {
            id: AttemptId::new(&workouts, date),
            date,
            workouts,
            warmups,
            options,
            ex_time_ms: Some(ex_time_ms),
            passed: true,
        }
    }

    /// Records a search that found no warm-up
    pub fn failed(workouts: Vec<String>, ex_time_ms: Option<f64>) -> Self {
        let date = Utc::now();
        Self {
            id: AttemptId::new(&workouts, date),
            date,
            workouts,
            warmups: Vec::new(),
            options: 0,
            ex_time_ms,
            passed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_format() {
        let id = AttemptId::new(&["Snatch".to_string()], Utc::now());
        let s = id.to_string();
        assert!(s.starts_with("w-"));
        assert_eq!(s.len(), 9);
    }

    #[test]
    fn id_round_trips_through_string() {
        let id = AttemptId::new(&["Snatch".to_string()], Utc::now());
        let parsed: AttemptId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn invalid_ids_are_rejected() {
        assert!("a-1234567".parse::<AttemptId>().is_err());
        assert!("w-123".parse::<AttemptId>().is_err());
        assert!("w-zzzzzzz".parse::<AttemptId>().is_err());
    }

    #[test]
    fn different_selections_get_different_ids() {
        let now = Utc::now();
        let a = AttemptId::new(&["Snatch".to_string()], now);
        let b = AttemptId::new(&["Deadlift".to_string()], now);
        assert_ne!(a, b);
    }

    #[test]
    fn failed_attempt_has_no_warmups() {
        let attempt = WarmupAttempt::failed(vec!["Snatch".to_string()], None);
        assert!(!attempt.passed);
        assert!(attempt.warmups.is_empty());

        let json = serde_json::to_string(&attempt).unwrap();
        assert!(!json.contains("warmups"));
        assert!(json.contains("\"passed\":false"));
    }

    #[test]
    fn attempt_json_shape() {
        let attempt = WarmupAttempt::passed(
            vec!["Snatch".to_string()],
            vec!["Air Squat".to_string(), "Good Morning".to_string()],
            3,
            1.5,
        );
        let json = serde_json::to_value(&attempt).unwrap();

        assert!(json["id"].as_str().unwrap().starts_with("w-"));
        assert_eq!(json["options"], 3);
        assert_eq!(json["warmups"][1], "Good Morning");

        let back: WarmupAttempt = serde_json::from_value(json).unwrap();
        assert_eq!(back, attempt);
    }
}
