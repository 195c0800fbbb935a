//! Data models for the analysis runner.
//!
//! This module contains the core data structures used throughout
//! the application for representing flattened objects, type tallies,
//! and run outcomes.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One node from the model graph after flattening.
///
/// A read-only snapshot of platform data: a type tag (e.g. a class name
/// such as `Structure.Beam`), an identifier unique within a version, and
/// an open-ended set of named properties.
#[derive(Debug, Clone)]
pub struct FlatObject {
    /// Object identifier (unique within a version, not globally).
    pub id: String,
    /// Type tag of the object.
    pub object_type: String,
    /// Named properties. Keys and presence are model-defined.
    pub properties: Map<String, Value>,
}

impl FlatObject {
    /// Look up a named property. A JSON `null` counts as absent.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).filter(|v| !v.is_null())
    }

    /// Whether a named property is present (and not `null`).
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }
}

/// Occurrence counts per object type, in first-seen order.
///
/// Insertion order only matters for deterministic report rendering.
#[derive(Debug, Clone, Default)]
pub struct TypeTally {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl TypeTally {
    /// Build a tally over a slice of flattened objects.
    pub fn from_objects(objects: &[FlatObject]) -> Self {
        let mut tally = Self::default();
        for object in objects {
            tally.record(&object.object_type);
        }
        tally
    }

    /// Record one occurrence of a type tag.
    pub fn record(&mut self, type_tag: &str) {
        if !self.counts.contains_key(type_tag) {
            self.order.push(type_tag.to_string());
        }
        *self.counts.entry(type_tag.to_string()).or_default() += 1;
    }

    /// Iterate `(type, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order
            .iter()
            .map(|t| (t.as_str(), self.counts[t.as_str()]))
    }

    /// Sum of all counts. Equals the number of recorded objects.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct types seen.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Terminal state of one invocation.
///
/// There are no partial or intermediate states: a run either succeeds with
/// a visible summary message or fails with an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success(String),
    Failure(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }

    /// The message reported to the run context.
    pub fn message(&self) -> &str {
        match self {
            RunOutcome::Success(msg) | RunOutcome::Failure(msg) => msg,
        }
    }
}

/// Record of a finished local run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// When the terminal outcome was reported.
    pub finished_at: DateTime<Utc>,
    /// The terminal outcome.
    pub outcome: RunOutcome,
    /// Files registered as run artifacts.
    pub artifacts: Vec<PathBuf>,
}

/// A secret string (API key) that never appears in logs.
///
/// `Debug` is deliberately opaque so argument dumps and error chains
/// cannot leak the value.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for Secret {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_object(id: &str, object_type: &str, properties: &[(&str, Value)]) -> FlatObject {
        FlatObject {
            id: id.to_string(),
            object_type: object_type.to_string(),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_property_lookup() {
        let object = make_object(
            "a1",
            "Structure.Beam",
            &[("material", json!("steel")), ("height", json!(2.4))],
        );

        assert!(object.has_property("material"));
        assert_eq!(object.property("material"), Some(&json!("steel")));
        assert!(!object.has_property("width"));
    }

    #[test]
    fn test_null_property_counts_as_absent() {
        let object = make_object("a2", "Structure.Column", &[("material", Value::Null)]);

        assert!(!object.has_property("material"));
        assert_eq!(object.property("material"), None);
    }

    #[test]
    fn test_tally_counts_sum_to_object_count() {
        let objects = vec![
            make_object("1", "Structure.Beam", &[]),
            make_object("2", "Structure.Beam", &[]),
            make_object("3", "Architecture.Wall", &[]),
            make_object("4", "Structure.Column", &[]),
        ];

        let tally = TypeTally::from_objects(&objects);

        assert_eq!(tally.total(), objects.len());
        assert_eq!(tally.distinct(), 3);
    }

    #[test]
    fn test_tally_preserves_first_seen_order() {
        let mut tally = TypeTally::default();
        tally.record("Architecture.Wall");
        tally.record("Structure.Beam");
        tally.record("Architecture.Wall");

        let pairs: Vec<_> = tally.iter().collect();
        assert_eq!(pairs, vec![("Architecture.Wall", 2), ("Structure.Beam", 1)]);
    }

    #[test]
    fn test_run_outcome_accessors() {
        let success = RunOutcome::Success("done".to_string());
        let failure = RunOutcome::Failure("broke".to_string());

        assert!(success.is_success());
        assert!(!failure.is_success());
        assert_eq!(success.message(), "done");
        assert_eq!(failure.message(), "broke");
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("sk-very-secret");
        let rendered = format!("{:?}", secret);

        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("redacted"));
        assert_eq!(secret.expose(), "sk-very-secret");
    }
}
