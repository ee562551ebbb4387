use std::collections::HashMap;
use std::fs;
use std::path::Path;

use leakcut_cutset::{CanonicalOrder, LeakSet};

use crate::error::{OracleError, Result};

const EMPTY_STEM: &str = "NoLeaks";
const ARTIFACT_EXTENSION: &str = "spthy";

/// One leak primitive: its name and the prover rule fragment that enables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakRule {
    pub name: String,
    pub rule: String,
}

/// Ordered leak catalog plus optional short names.
///
/// The JSON key order of the rules file defines the canonical order used for
/// enumeration, artifact content and file names.
#[derive(Debug, Clone)]
pub struct LeakCatalog {
    rules: Vec<LeakRule>,
    short_names: HashMap<String, String>,
    order: CanonicalOrder,
}

impl LeakCatalog {
    pub fn new(rules: Vec<LeakRule>, short_names: HashMap<String, String>) -> Result<Self> {
        if rules.is_empty() {
            return Err(OracleError::invalid_catalog("no leak rules defined"));
        }
        let order = CanonicalOrder::new(rules.iter().map(|r| r.name.clone()))?;
        Ok(Self {
            rules,
            short_names,
            order,
        })
    }

    /// Load the rules file and, when it exists, the short-name file.
    pub fn load(rules_path: &Path, short_names_path: &Path) -> Result<Self> {
        let rules = read_rules(rules_path)?;
        let short_names = if short_names_path.exists() {
            read_short_names(short_names_path)?
        } else {
            log::debug!(
                "No short-name file at {}; using full leak names",
                short_names_path.display()
            );
            HashMap::new()
        };
        Self::new(rules, short_names)
    }

    /// Keep only the first `limit` leaks in catalog order.
    pub fn truncated(&self, limit: usize) -> Result<Self> {
        let rules = self.rules.iter().take(limit).cloned().collect();
        Self::new(rules, self.short_names.clone())
    }

    pub fn order(&self) -> &CanonicalOrder {
        &self.order
    }

    pub fn rules(&self) -> &[LeakRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Abbreviation for `name`, falling back to the name itself.
    pub fn short_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.short_names.get(name).map_or(name, String::as_str)
    }

    /// File-safe identifier: short names concatenated in catalog order.
    pub fn file_stem(&self, set: &LeakSet) -> String {
        if set.is_empty() {
            return EMPTY_STEM.to_string();
        }
        self.order
            .names(set)
            .into_iter()
            .map(|name| self.short_name(name))
            .collect()
    }

    pub fn file_name(&self, set: &LeakSet) -> String {
        format!("{}.{ARTIFACT_EXTENSION}", self.file_stem(set))
    }

    /// Rule fragments of the included leaks in catalog order, each followed by a blank line.
    pub fn render(&self, set: &LeakSet) -> String {
        let mut out = String::new();
        for rank in set.iter() {
            if let Some(rule) = self.rules.get(rank) {
                out.push_str(&rule.rule);
                out.push_str("\n\n");
            }
        }
        out
    }
}

fn read_rules(path: &Path) -> Result<Vec<LeakRule>> {
    let text = fs::read_to_string(path)?;
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&text).map_err(|source| OracleError::JsonError {
            path: path.to_path_buf(),
            source,
        })?;
    map.into_iter()
        .map(|(name, value)| match value {
            serde_json::Value::String(rule) => Ok(LeakRule { name, rule }),
            other => Err(OracleError::invalid_catalog(format!(
                "rule for leak '{name}' must be a string, found {other}"
            ))),
        })
        .collect()
}

fn read_short_names(path: &Path) -> Result<HashMap<String, String>> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| OracleError::JsonError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn catalog() -> LeakCatalog {
        let rules = ["AIP", "ATC", "SessionKey"]
            .iter()
            .map(|name| LeakRule {
                name: name.to_string(),
                rule: format!("rule Leak_{name}:\n  [ !{name}(x) ] --> [ Out(x) ]"),
            })
            .collect();
        let short = HashMap::from([
            ("AIP".to_string(), "Aip".to_string()),
            ("SessionKey".to_string(), "Sk".to_string()),
        ]);
        LeakCatalog::new(rules, short).unwrap()
    }

    #[test]
    fn file_names_use_short_names_in_catalog_order() {
        let catalog = catalog();
        let set = catalog.order().leak_set(["SessionKey", "AIP", "ATC"]).unwrap();
        assert_eq!(catalog.file_stem(&set), "AipATCSk");
        assert_eq!(catalog.file_name(&set), "AipATCSk.spthy");
        assert_eq!(catalog.file_name(&LeakSet::empty()), "NoLeaks.spthy");
    }

    #[test]
    fn render_concatenates_rules_in_catalog_order() {
        let catalog = catalog();
        let set = catalog.order().leak_set(["SessionKey", "AIP"]).unwrap();
        assert_eq!(
            catalog.render(&set),
            "rule Leak_AIP:\n  [ !AIP(x) ] --> [ Out(x) ]\n\n\
             rule Leak_SessionKey:\n  [ !SessionKey(x) ] --> [ Out(x) ]\n\n"
        );
        assert_eq!(catalog.render(&LeakSet::empty()), "");
    }

    #[test]
    fn load_keeps_json_key_order() {
        let dir = tempdir().unwrap();
        let rules = dir.path().join("leak_rules.json");
        fs::write(&rules, r#"{"Zeta": "rule Z: [] --> []", "Alpha": "rule A: [] --> []"}"#)
            .unwrap();

        let catalog = LeakCatalog::load(&rules, &dir.path().join("missing.json")).unwrap();
        assert_eq!(catalog.names(), vec!["Zeta", "Alpha"]);
        assert_eq!(catalog.short_name("Zeta"), "Zeta");
    }

    #[test]
    fn load_rejects_non_string_rules_and_empty_catalogs() {
        let dir = tempdir().unwrap();
        let rules = dir.path().join("leak_rules.json");
        let short = dir.path().join("short.json");

        fs::write(&rules, r#"{"AIP": 3}"#).unwrap();
        let err = LeakCatalog::load(&rules, &short).unwrap_err();
        assert!(matches!(err, OracleError::InvalidCatalog(_)), "{err}");

        fs::write(&rules, "{}").unwrap();
        assert!(LeakCatalog::load(&rules, &short).is_err());

        fs::write(&rules, "[1, 2]").unwrap();
        let err = LeakCatalog::load(&rules, &short).unwrap_err();
        assert!(matches!(err, OracleError::JsonError { .. }), "{err}");
    }

    #[test]
    fn truncated_keeps_the_first_leaks() {
        let catalog = catalog().truncated(2).unwrap();
        assert_eq!(catalog.names(), vec!["AIP", "ATC"]);
        assert_eq!(catalog.order().len(), 2);
    }
}
