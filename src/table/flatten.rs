//! Flattening of nested JSON responses into row/column form.

use serde_json::{Map, Value};

use crate::error::{Result, StatsError};

/// A flat table built from a JSON array of objects.
///
/// `columns` is the union of keys seen across rows, in first-seen order.
/// Each row keeps only the keys its element actually carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTable {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl FlatTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first row, or a ShapeMismatch naming `path` when there is none.
    pub fn first_row(&self, path: &str) -> Result<&Map<String, Value>> {
        self.rows
            .first()
            .ok_or_else(|| StatsError::shape(path, "expected at least one element, found none"))
    }
}

/// Follow a dotted path into `value`.
///
/// Object segments are looked up by key; a numeric segment indexes into an
/// array. An empty path returns `value` itself.
pub fn locate<'a>(value: &'a Value, path: &str) -> Result<&'a Value> {
    let mut current = value;
    let mut walked = String::new();

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        current = match current {
            Value::Object(map) => map
                .get(segment)
                .ok_or_else(|| StatsError::shape(&walked, format!("missing key `{segment}`")))?,
            Value::Array(items) => {
                let idx: usize = segment.parse().map_err(|_| {
                    StatsError::shape(&walked, format!("`{segment}` is not an array index"))
                })?;
                items.get(idx).ok_or_else(|| {
                    StatsError::shape(
                        &walked,
                        format!("index {idx} out of bounds (len {})", items.len()),
                    )
                })?
            }
            other => {
                return Err(StatsError::shape(
                    &walked,
                    format!("cannot descend into {}", kind_of(other)),
                ))
            }
        };
    }

    Ok(current)
}

/// Flatten the array of objects found at `path` into a [`FlatTable`].
///
/// Element order is preserved. The located value must be an array whose
/// elements are all objects; anything else is a ShapeMismatch.
pub fn flatten_records(value: &Value, path: &str) -> Result<FlatTable> {
    let located = locate(value, path)?;
    let shown = if path.is_empty() { "<root>" } else { path };

    let Value::Array(items) = located else {
        return Err(StatsError::shape(
            shown,
            format!("expected an array of objects, found {}", kind_of(located)),
        ));
    };

    let mut table = FlatTable::default();
    for (idx, item) in items.iter().enumerate() {
        let Value::Object(obj) = item else {
            return Err(StatsError::shape(
                format!("{shown}[{idx}]"),
                format!("expected an object, found {}", kind_of(item)),
            ));
        };
        for key in obj.keys() {
            if !table.columns.iter().any(|c| c == key) {
                table.columns.push(key.clone());
            }
        }
        table.rows.push(obj.clone());
    }

    Ok(table)
}

/// Short name of a JSON value's type, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_root_array() {
        let doc = json!([{"id": 1, "link": "/a"}, {"id": 2, "extra": true}]);
        let table = flatten_records(&doc, "").unwrap();

        assert_eq!(table.columns, vec!["id", "link", "extra"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("link"), Some(&json!("/a")));
        assert_eq!(table.rows[1].get("link"), None);
        assert_eq!(table.rows[1].get("extra"), Some(&json!(true)));
    }

    #[test]
    fn test_flatten_nested_path_with_index() {
        let doc = json!({
            "stats": [
                {"splits": [{"stat": {"wins": 41}}]}
            ]
        });
        let table = flatten_records(&doc, "stats.0.splits").unwrap();
        assert_eq!(table.columns, vec!["stat"]);
        assert_eq!(table.rows[0].get("stat"), Some(&json!({"wins": 41})));
    }

    #[test]
    fn test_flatten_preserves_element_order() {
        let doc = json!({"teams": [{"id": 3}, {"id": 1}, {"id": 2}]});
        let table = flatten_records(&doc, "teams").unwrap();
        let ids: Vec<_> = table.rows.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(1), json!(2)]);
    }

    #[test]
    fn test_flatten_empty_array() {
        let doc = json!({"teams": []});
        let table = flatten_records(&doc, "teams").unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
        assert!(table.first_row("teams").is_err());
    }

    #[test]
    fn test_flatten_missing_key_is_shape_mismatch() {
        let doc = json!({"copyright": "NHL"});
        match flatten_records(&doc, "teams") {
            Err(StatsError::ShapeMismatch { path, .. }) => assert_eq!(path, "teams"),
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_flatten_scalar_is_shape_mismatch() {
        let doc = json!({"teams": 5});
        assert!(matches!(
            flatten_records(&doc, "teams"),
            Err(StatsError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_flatten_non_object_element_is_shape_mismatch() {
        let doc = json!({"teams": [{"id": 1}, 2]});
        match flatten_records(&doc, "teams") {
            Err(StatsError::ShapeMismatch { path, .. }) => assert_eq!(path, "teams[1]"),
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_index_out_of_bounds() {
        let doc = json!({"stats": []});
        match locate(&doc, "stats.0") {
            Err(StatsError::ShapeMismatch { path, reason }) => {
                assert_eq!(path, "stats.0");
                assert!(reason.contains("out of bounds"));
            }
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_through_scalar() {
        let doc = json!({"stats": "none"});
        assert!(locate(&doc, "stats.splits").is_err());
    }
}
