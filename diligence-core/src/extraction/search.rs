//! Bounded recursive search over a document tree.
//!
//! Documents are `serde_json::Value` trees, so there are no shared references
//! to revisit. Termination on adversarially deep or wide input comes from a
//! hard depth cap and a visited-node budget; exhausting either is simply
//! "not found".

use serde_json::{Map, Value};
use tracing::debug;

use super::coerce::coerce_number;

/// Fields whose string value names the object they sit in.
const LABEL_FIELDS: [&str; 4] = ["name", "id", "metric", "label"];

/// Lower-case and strip everything but ASCII letters and digits.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether a normalized key matches a normalized alias.
///
/// The key matches when it contains the alias. Aliases shorter than
/// `min_alias_len` must instead equal the whole key; pass `0` to disable that.
pub fn fuzzy_match(key: &str, alias: &str, min_alias_len: usize) -> bool {
    if alias.is_empty() || key.is_empty() {
        return false;
    }
    if alias.len() < min_alias_len {
        key == alias
    } else {
        key.contains(alias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: usize,
    pub max_nodes: usize,
    pub min_alias_len: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_nodes: 10_000,
            min_alias_len: 0,
        }
    }
}

/// A value located by [`deep_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub value: f64,
    /// Dotted location of the value.
    pub path: String,
    /// Unit declared next to the value, if any.
    pub unit: Option<String>,
}

struct Walker<'a> {
    aliases: &'a [&'a str],
    limits: SearchLimits,
    visited: usize,
}

/// Walk `root` depth-first looking for a value labelled by one of `aliases`.
///
/// An object whose `name`/`id`/`metric`/`label` field matches yields its own
/// `value`; otherwise each property name is tested and a matching property
/// with a numeric value wins. Aliases must already be normalized.
pub fn deep_search(root: &Value, aliases: &[&str], limits: SearchLimits) -> Option<SearchHit> {
    let mut walker = Walker {
        aliases,
        limits,
        visited: 0,
    };
    let hit = walker.visit(root, 0, String::new());
    if hit.is_none() {
        debug!(
            visited = walker.visited,
            max_nodes = limits.max_nodes,
            "deep search found no match"
        );
    }
    hit
}

impl Walker<'_> {
    fn matches(&self, raw: &str) -> bool {
        let key = normalize_key(raw);
        self.aliases
            .iter()
            .any(|alias| fuzzy_match(&key, alias, self.limits.min_alias_len))
    }

    fn visit(&mut self, node: &Value, depth: usize, path: String) -> Option<SearchHit> {
        if self.visited >= self.limits.max_nodes {
            return None;
        }
        self.visited += 1;

        match node {
            Value::Object(map) => {
                if let Some(hit) = self.match_object(map, &path) {
                    return Some(hit);
                }
                if depth >= self.limits.max_depth {
                    return None;
                }
                for (key, child) in map {
                    if child.is_object() || child.is_array() {
                        if let Some(hit) = self.visit(child, depth + 1, join(&path, key)) {
                            return Some(hit);
                        }
                    }
                }
                None
            }
            Value::Array(items) => {
                if depth >= self.limits.max_depth {
                    return None;
                }
                items.iter().enumerate().find_map(|(i, child)| {
                    self.visit(child, depth + 1, join(&path, &i.to_string()))
                })
            }
            _ => None,
        }
    }

    fn match_object(&self, map: &Map<String, Value>, path: &str) -> Option<SearchHit> {
        let labelled = LABEL_FIELDS
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .any(|label| self.matches(label));
        if labelled {
            if let Some(value) = map.get("value").and_then(coerce_number) {
                return Some(SearchHit {
                    value,
                    path: join(path, "value"),
                    unit: declared_unit(map),
                });
            }
        }

        for (key, child) in map {
            if !self.matches(key) {
                continue;
            }
            if let Some(value) = coerce_number(child) {
                let unit = match child {
                    Value::Object(inner) => declared_unit(inner),
                    _ => None,
                };
                return Some(SearchHit {
                    value,
                    path: join(path, key),
                    unit,
                });
            }
        }
        None
    }
}

/// The `unit` string declared on an object, if any.
pub(crate) fn declared_unit(map: &Map<String, Value>) -> Option<String> {
    map.get("unit")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
}

fn join(path: &str, step: &str) -> String {
    if path.is_empty() {
        step.to_string()
    } else {
        format!("{path}.{step}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search(doc: &Value, aliases: &[&str]) -> Option<SearchHit> {
        deep_search(doc, aliases, SearchLimits::default())
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Capital_Expenditure (USD)"), "capitalexpenditureusd");
        assert_eq!(normalize_key("payback-period"), "paybackperiod");
    }

    #[test]
    fn test_fuzzy_match_is_substring() {
        assert!(fuzzy_match("npv10yr", "npv", 0));
        assert!(fuzzy_match("trllevel", "trl", 0));
        assert!(fuzzy_match("capexestimate", "capex", 0));
        assert!(!fuzzy_match("", "capex", 0));
        assert!(!fuzzy_match("capex", "", 0));
    }

    #[test]
    fn test_fuzzy_match_minimum_length_guard() {
        assert!(fuzzy_match("irr", "irr", 4));
        assert!(!fuzzy_match("mirror", "irr", 4));
        assert!(fuzzy_match("capexestimate", "capex", 4));
    }

    #[test]
    fn test_short_alias_with_suffix_is_found() {
        let doc = json!({"results": {"trlLevel": 6}});
        let hit = search(&doc, &["trl", "technologyreadinesslevel"]).unwrap();
        assert_eq!(hit.value, 6.0);
        assert_eq!(hit.path, "results.trlLevel");

        let guarded = SearchLimits {
            min_alias_len: 4,
            ..SearchLimits::default()
        };
        assert!(deep_search(&doc, &["trl"], guarded).is_none());
    }

    #[test]
    fn test_property_name_match() {
        let doc = json!({"costBreakdown": {"detail": {"capexEstimate": {"value": 1200}}}});
        let hit = search(&doc, &["capex"]).unwrap();
        assert_eq!(hit.value, 1200.0);
        assert_eq!(hit.path, "costBreakdown.detail.capexEstimate");
    }

    #[test]
    fn test_label_match_in_array() {
        let doc = json!({
            "tables": [
                {"name": "Water use", "value": 3},
                {"metric": "Net Present Value", "value": "$45", "unit": "$M"}
            ]
        });
        let hit = search(&doc, &["netpresentvalue"]).unwrap();
        assert_eq!(hit.value, 45.0);
        assert_eq!(hit.path, "tables.1.value");
        assert_eq!(hit.unit.as_deref(), Some("$M"));
    }

    #[test]
    fn test_non_numeric_match_keeps_searching() {
        let doc = json!({
            "capexNotes": "see appendix",
            "later": {"capex": 80}
        });
        assert_eq!(search(&doc, &["capex"]).unwrap().value, 80.0);
    }

    #[test]
    fn test_depth_cap() {
        let mut doc = json!({"capex": 7});
        for _ in 0..15 {
            doc = json!({ "wrap": doc });
        }
        assert!(search(&doc, &["capex"]).is_none());

        let limits = SearchLimits {
            max_depth: 20,
            ..SearchLimits::default()
        };
        assert_eq!(deep_search(&doc, &["capex"], limits).unwrap().value, 7.0);
    }

    #[test]
    fn test_node_budget() {
        let filler: Vec<Value> = (0..50).map(|i| json!({ "x": i })).collect();
        let doc = json!({"a": filler, "z": {"capex": 1}});
        let limits = SearchLimits {
            max_nodes: 10,
            ..SearchLimits::default()
        };
        assert!(deep_search(&doc, &["capex"], limits).is_none());
        assert!(search(&doc, &["capex"]).is_some());
    }
}
