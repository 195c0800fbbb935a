//! Rule-based consistency checks over sampled objects.
//!
//! Checks are pluggable: the configuration names the rules to run, and each
//! rule inspects one object at a time and yields a human-readable finding
//! when it fires.

use crate::models::FlatObject;
use anyhow::{bail, Result};

/// A single consistency check applied to each sampled object.
pub trait ValidationRule: Send + Sync + std::fmt::Debug {
    /// Stable name used in configuration and the CLI.
    fn name(&self) -> &'static str;

    /// Check one object. Returns a finding line when the rule fires.
    fn check(&self, object: &FlatObject) -> Option<String>;
}

/// Flags structural objects with no material assigned.
///
/// Fires for objects whose type tag contains `Structure` (case-sensitive)
/// and which lack a `material` property.
#[derive(Debug)]
pub struct MissingMaterial;

impl ValidationRule for MissingMaterial {
    fn name(&self) -> &'static str {
        "missing-material"
    }

    fn check(&self, object: &FlatObject) -> Option<String> {
        if !object.object_type.contains("Structure") {
            return None;
        }
        if object.has_property("material") {
            return None;
        }

        Some(format!(
            "Object {} of type {} has no material assigned",
            object.id, object.object_type
        ))
    }
}

/// Resolve configured check names into rule instances.
///
/// An unknown name is a configuration error and is reported before any
/// run starts.
pub fn build_rules(names: &[String]) -> Result<Vec<Box<dyn ValidationRule>>> {
    let mut rules: Vec<Box<dyn ValidationRule>> = Vec::with_capacity(names.len());

    for name in names {
        match name.as_str() {
            "missing-material" => rules.push(Box::new(MissingMaterial)),
            other => bail!("Unknown check: {other}"),
        }
    }

    Ok(rules)
}

/// Apply every rule to every sampled object, in order.
///
/// The returned list is unbounded; truncation for display happens at
/// rendering time.
pub fn apply_rules(rules: &[Box<dyn ValidationRule>], objects: &[FlatObject]) -> Vec<String> {
    let mut findings = Vec::new();

    for object in objects {
        for rule in rules {
            if let Some(finding) = rule.check(object) {
                findings.push(finding);
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

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
    fn test_structural_object_without_material_is_flagged() {
        let beam = make_object("beam-7", "Structure.Beam", &[]);
        let finding = MissingMaterial.check(&beam).expect("should fire");

        assert!(finding.contains("beam-7"));
        assert!(finding.contains("Structure.Beam"));
    }

    #[test]
    fn test_structural_object_with_material_passes() {
        let beam = make_object("beam-7", "Structure.Beam", &[("material", json!("steel"))]);
        assert_eq!(MissingMaterial.check(&beam), None);
    }

    #[test]
    fn test_null_material_is_treated_as_missing() {
        let column = make_object("col-1", "Structure.Column", &[("material", Value::Null)]);
        assert!(MissingMaterial.check(&column).is_some());
    }

    #[test]
    fn test_non_structural_objects_are_ignored() {
        let wall = make_object("wall-1", "Architecture.Wall", &[]);
        assert_eq!(MissingMaterial.check(&wall), None);
    }

    #[test]
    fn test_apply_rules_with_no_structural_objects_is_empty() {
        let rules = build_rules(&["missing-material".to_string()]).unwrap();
        let objects = vec![
            make_object("w1", "Architecture.Wall", &[]),
            make_object("f1", "Architecture.Floor", &[]),
        ];

        assert!(apply_rules(&rules, &objects).is_empty());
    }

    #[test]
    fn test_apply_rules_collects_findings_in_object_order() {
        let rules = build_rules(&["missing-material".to_string()]).unwrap();
        let objects = vec![
            make_object("b1", "Structure.Beam", &[]),
            make_object("w1", "Architecture.Wall", &[]),
            make_object("b2", "Structure.Beam", &[]),
        ];

        let findings = apply_rules(&rules, &objects);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].contains("b1"));
        assert!(findings[1].contains("b2"));
    }

    #[test]
    fn test_unknown_check_name_is_rejected() {
        let err = build_rules(&["does-not-exist".to_string()]).unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn test_empty_check_list_builds_no_rules() {
        let rules = build_rules(&[]).unwrap();
        assert!(rules.is_empty());
    }
}
