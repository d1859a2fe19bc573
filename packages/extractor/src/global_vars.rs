//! Content-addressed global style store.
//!
//! Every style, layout or span value an extractor produces is registered here
//! and replaced on the node by a short id. Values are compared by their
//! canonical JSON serialization (object keys sorted at every level), so two
//! structurally equal values always share an id within one extraction while
//! distinct values never collide. Lookups go through a hash index keyed by the
//! canonical string instead of scanning prior entries.

use crate::error::ExtractResult;
use designlens_model::{GlobalVars, VarId};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct GlobalVarStore {
    styles: BTreeMap<VarId, Value>,
    index: HashMap<String, VarId>,
    counter: u64,
}

impl GlobalVarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of an equal stored value, or store `value` under a new
    /// `{prefix}_{n}` id.
    pub fn find_or_create<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        prefix: &str,
    ) -> ExtractResult<VarId> {
        let value = serde_json::to_value(value)?;
        let canonical = canonical_json(&value);

        if let Some(id) = self.index.get(&canonical) {
            return Ok(id.clone());
        }

        self.counter += 1;
        let id = VarId::new(format!("{}_{}", prefix, self.counter));
        self.index.insert(canonical, id.clone());
        self.styles.insert(id.clone(), value);
        Ok(id)
    }

    pub fn get(&self, id: &VarId) -> Option<&Value> {
        self.styles.get(id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn into_global_vars(self) -> GlobalVars {
        GlobalVars {
            styles: self.styles,
        }
    }
}

/// Serialize with object keys sorted, independent of map insertion order
fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equal_values_share_an_id() {
        let mut store = GlobalVarStore::new();
        let a = store.find_or_create(&json!({ "color": "#FF0000" }), "fill").unwrap();
        let b = store.find_or_create(&json!({ "color": "#FF0000" }), "fill").unwrap();

        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_distinct_values_get_distinct_ids() {
        let mut store = GlobalVarStore::new();
        let a = store.find_or_create(&json!(["#FF0000"]), "fill").unwrap();
        let b = store.find_or_create(&json!(["#00FF00"]), "fill").unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let mut store = GlobalVarStore::new();
        let mut first = serde_json::Map::new();
        first.insert("b".to_string(), json!(2));
        first.insert("a".to_string(), json!({ "y": 1, "x": 0 }));
        let mut second = serde_json::Map::new();
        second.insert("a".to_string(), json!({ "x": 0, "y": 1 }));
        second.insert("b".to_string(), json!(2));

        let a = store.find_or_create(&Value::Object(first), "layout").unwrap();
        let b = store.find_or_create(&Value::Object(second), "layout").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_array_order_matters() {
        let mut store = GlobalVarStore::new();
        let a = store.find_or_create(&json!(["#000", "#FFF"]), "fill").unwrap();
        let b = store.find_or_create(&json!(["#FFF", "#000"]), "fill").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_use_prefix_and_increase() {
        let mut store = GlobalVarStore::new();
        let a = store.find_or_create(&json!(1), "layout").unwrap();
        let b = store.find_or_create(&json!(2), "style").unwrap();

        assert_eq!(a.as_str(), "layout_1");
        assert_eq!(b.as_str(), "style_2");
    }

    #[test]
    fn test_repeated_inserts_never_grow_the_store() {
        let mut store = GlobalVarStore::new();
        let values = [json!({ "gap": "8px" }), json!({ "gap": "16px" }), json!(null)];

        for _ in 0..10 {
            for value in &values {
                store.find_or_create(value, "layout").unwrap();
            }
        }
        assert_eq!(store.len(), values.len());
    }

    #[test]
    fn test_into_global_vars_keeps_values() {
        let mut store = GlobalVarStore::new();
        let id = store.find_or_create(&json!({ "fontSize": 14 }), "style").unwrap();

        let vars = store.into_global_vars();
        assert_eq!(vars.get(&id), Some(&json!({ "fontSize": 14 })));
    }
}
