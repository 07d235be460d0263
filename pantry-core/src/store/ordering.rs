//! Ordered queries
//!
//! Documents lacking the order field are not part of an ordered query.
//! Values of different JSON types rank null < bool < number < string < array
//! < object; equal keys fall back to the document identifier.

use std::cmp::Ordering;

use serde_json::Value;

use crate::domain::{Document, Snapshot};

pub fn ordered_snapshot(docs: impl IntoIterator<Item = Document>, order_by: &str) -> Snapshot {
    let mut docs: Vec<Document> = docs
        .into_iter()
        .filter(|doc| doc.fields.contains_key(order_by))
        .collect();
    docs.sort_by(|a, b| {
        let key_a = a.get(order_by).unwrap_or(&Value::Null);
        let key_b = b.get(order_by).unwrap_or(&Value::Null);
        compare_values(key_a, key_b).then_with(|| a.id.cmp(&b.id))
    });
    docs
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    type_rank(a).cmp(&type_rank(b)).then_with(|| match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        // Bytewise, so "Zucchini" sorts before "apple"
        (Value::String(x), Value::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(l, r)| compare_values(l, r))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        match fields {
            Value::Object(map) => Document::new(id, map),
            _ => unreachable!(),
        }
    }

    fn ids(snapshot: &Snapshot) -> Vec<&str> {
        snapshot.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_orders_by_field_lexicographically() {
        let snapshot = ordered_snapshot(
            vec![
                doc("1", json!({"name": "Milk"})),
                doc("2", json!({"name": "Apple"})),
                doc("3", json!({"name": "Zucchini"})),
                doc("4", json!({"name": "apple"})),
            ],
            "name",
        );
        assert_eq!(ids(&snapshot), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn test_excludes_documents_without_order_field() {
        let snapshot = ordered_snapshot(
            vec![doc("1", json!({"name": "Milk"})), doc("2", json!({"quantity": 3}))],
            "name",
        );
        assert_eq!(ids(&snapshot), vec!["1"]);
    }

    #[test]
    fn test_ties_break_on_identifier() {
        let snapshot = ordered_snapshot(
            vec![doc("b", json!({"label": "Same"})), doc("a", json!({"label": "Same"}))],
            "label",
        );
        assert_eq!(ids(&snapshot), vec!["a", "b"]);
    }

    #[test]
    fn test_mixed_types_rank() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1])), Ordering::Greater);
    }
}
