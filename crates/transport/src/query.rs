//! Query-string flattening.
//!
//! The storefront API parses bracketed keys, so structured parameters are
//! flattened as:
//!
//! | JSON | Pairs |
//! |------|-------|
//! | `{"limit": 10}` | `limit=10` |
//! | `{"ids": ["a", "b"]}` | `ids[]=a`, `ids[]=b` |
//! | `{"filter": {"q": "x"}}` | `filter[q]=x` |
//! | `{"q": null}` | (nothing) |

use extensions::Query;
use serde_json::Value;

/// Flattens `query` into ordered `(key, value)` pairs ready for URL encoding.
pub fn flatten_query(query: &Query) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(query.len());
    for (key, value) in query {
        flatten_value(key, value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key.to_owned(), b.to_string())),
        Value::Number(n) => out.push((key.to_owned(), n.to_string())),
        Value::String(s) => out.push((key.to_owned(), s.clone())),
        Value::Array(items) => {
            let nested = format!("{key}[]");
            for item in items {
                flatten_value(&nested, item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten_value(&format!("{key}[{sub}]"), item, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(value: Value) -> Query {
        match value {
            Value::Object(map) => map,
            _ => panic!("test query must be an object"),
        }
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_scalars_become_single_pairs() {
        let mut flat =
            flatten_query(&query(json!({ "limit": 10, "include_product": true, "q": "sofia" })));
        flat.sort();
        assert_eq!(
            flat,
            pairs(&[("include_product", "true"), ("limit", "10"), ("q", "sofia")])
        );
    }

    #[test]
    fn test_arrays_repeat_bracketed_keys() {
        let flat = flatten_query(&query(json!({ "product_ids": ["prod_1", "prod_2"] })));
        assert_eq!(flat, pairs(&[("product_ids[]", "prod_1"), ("product_ids[]", "prod_2")]));
    }

    #[test]
    fn test_nested_objects_use_bracketed_members() {
        let flat = flatten_query(&query(json!({ "filter": { "city": "Sofia" } })));
        assert_eq!(flat, pairs(&[("filter[city]", "Sofia")]));
    }

    #[test]
    fn test_nulls_and_empty_arrays_are_dropped() {
        let flat = flatten_query(&query(json!({ "q": null, "ids": [] })));
        assert!(flat.is_empty());
    }
}
