use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Lay `raw` over the defaults of `T`.
///
/// Missing and `null` fields keep their default. Present values win, including
/// `false`, `0` and `""`. Nested objects are merged key by key against the
/// nested defaults. A value that does not deserialize into its field's type is
/// dropped and the default stays; the fallback descends into nested objects
/// and array elements, so one bad leaf only costs that leaf. Keys that `T`
/// does not declare are ignored. Never fails.
pub fn overlay<T>(raw: Option<&Value>) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    let defaults = T::default();
    let Some(input @ Value::Object(_)) = raw else {
        return defaults;
    };
    let Ok(mut doc) = serde_json::to_value(&defaults) else {
        return defaults;
    };

    // Common case: the whole input fits.
    if let Ok(config) = serde_json::from_value::<T>(merge_value(&doc, input)) {
        return config;
    }

    place::<T>(&mut doc, "", input);
    serde_json::from_value(doc).unwrap_or(defaults)
}

fn fits<T: DeserializeOwned>(doc: &Value) -> bool {
    serde_json::from_value::<T>(doc.clone()).is_ok()
}

/// Replace the value at `path` when the result still deserializes as `T`.
fn try_set<T: DeserializeOwned>(doc: &mut Value, path: &str, value: Value) -> bool {
    let mut trial = doc.clone();
    match trial.pointer_mut(path) {
        Some(slot) => *slot = value,
        None => return false,
    }
    if fits::<T>(&trial) {
        *doc = trial;
        true
    } else {
        false
    }
}

/// Merge `value` into the slot at `path`, descending on failure.
fn place<T: DeserializeOwned>(doc: &mut Value, path: &str, value: &Value) {
    if value.is_null() {
        return;
    }
    let Some(current) = doc.pointer(path).cloned() else {
        return;
    };
    if try_set::<T>(doc, path, merge_value(&current, value)) {
        return;
    }
    match value {
        Value::Object(fields) => {
            if !current.is_object() && !try_set::<T>(doc, path, Value::Object(Map::new())) {
                return;
            }
            for (key, field) in fields {
                let child = format!("{path}/{}", escape(key));
                let inserted = match doc.pointer_mut(path) {
                    Some(Value::Object(slot)) if !slot.contains_key(key) => {
                        slot.insert(key.clone(), Value::Null);
                        true
                    }
                    _ => false,
                };
                place::<T>(doc, &child, field);
                if inserted {
                    if let Some(Value::Object(slot)) = doc.pointer_mut(path) {
                        if slot.get(key).is_some_and(Value::is_null) {
                            slot.remove(key);
                        }
                    }
                }
            }
        }
        Value::Array(items) => {
            if !try_set::<T>(doc, path, Value::Array(Vec::new())) {
                return;
            }
            for item in items {
                let seed = if item.is_object() { Value::Object(Map::new()) } else { item.clone() };
                let mut trial = doc.clone();
                let index = match trial.pointer_mut(path) {
                    Some(Value::Array(slot)) => {
                        slot.push(seed);
                        slot.len() - 1
                    }
                    _ => return,
                };
                if !fits::<T>(&trial) {
                    continue;
                }
                *doc = trial;
                if item.is_object() {
                    place::<T>(doc, &format!("{path}/{index}"), item);
                }
            }
        }
        _ => {}
    }
}

fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn merge_object(base: &Map<String, Value>, input: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in input {
        if value.is_null() {
            continue;
        }
        let next = match base.get(key) {
            Some(default) => merge_value(default, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

fn merge_value(default: &Value, value: &Value) -> Value {
    match (default, value) {
        (Value::Object(d), Value::Object(v)) => Value::Object(merge_object(d, v)),
        (_, Value::Null) => default.clone(),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Sample {
        title: String,
        show_timer: bool,
        columns: u32,
        inner: Inner,
        items: Vec<Inner>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Inner {
        phone: String,
        email: String,
        rank: u32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                title: "Default".into(),
                show_timer: true,
                columns: 3,
                inner: Inner::default(),
                items: Vec::new(),
            }
        }
    }

    impl Default for Inner {
        fn default() -> Self {
            Self { phone: "+62".into(), email: "info@example.com".into(), rank: 1 }
        }
    }

    #[test]
    fn falsy_values_survive() {
        let p: Sample = overlay(Some(&json!({"title": "", "showTimer": false, "columns": 0})));
        assert_eq!(p.title, "");
        assert!(!p.show_timer);
        assert_eq!(p.columns, 0);
    }

    #[test]
    fn wrong_types_fall_back_per_field() {
        let p: Sample = overlay(Some(&json!({"title": 42, "columns": 4, "showTimer": "yes"})));
        assert_eq!(p.title, "Default");
        assert_eq!(p.columns, 4);
        assert!(p.show_timer);
    }

    #[test]
    fn nested_objects_merge() {
        let p: Sample = overlay(Some(&json!({"inner": {"phone": "+1"}})));
        assert_eq!(p.inner.phone, "+1");
        assert_eq!(p.inner.email, "info@example.com");
    }

    #[test]
    fn bad_nested_leaf_keeps_its_siblings() {
        let p: Sample = overlay(Some(&json!({
            "title": "Tower A",
            "inner": {"phone": "+1", "email": "a@b.c", "rank": "first"}
        })));
        assert_eq!(p.title, "Tower A");
        assert_eq!(p.inner.phone, "+1");
        assert_eq!(p.inner.email, "a@b.c");
        assert_eq!(p.inner.rank, 1);
    }

    #[test]
    fn bad_array_element_fields_fall_back_per_element() {
        let p: Sample = overlay(Some(&json!({
            "items": [
                {"phone": "+1", "rank": 2.5},
                "not an object",
                {"email": "x@y.z", "rank": 7}
            ],
            "columns": "four"
        })));
        assert_eq!(p.columns, 3);
        assert_eq!(p.items.len(), 2);
        assert_eq!(p.items[0].phone, "+1");
        assert_eq!(p.items[0].rank, 1);
        assert_eq!(p.items[0].email, "info@example.com");
        assert_eq!(p.items[1].email, "x@y.z");
        assert_eq!(p.items[1].rank, 7);
    }

    #[test]
    fn nested_object_in_place_of_scalar_is_dropped() {
        let p: Sample = overlay(Some(&json!({"title": {"text": "x"}, "inner": "flat"})));
        assert_eq!(p, Sample::default());
    }

    #[test]
    fn odd_keys_are_escaped() {
        let p: Sample = overlay(Some(&json!({"a/b": 1, "c~d": {"e": 2}, "columns": -1})));
        assert_eq!(p, Sample::default());
    }

    #[test]
    fn non_objects_yield_defaults() {
        assert_eq!(overlay::<Sample>(Some(&json!([1, 2]))), Sample::default());
        assert_eq!(overlay::<Sample>(Some(&Value::Null)), Sample::default());
        assert_eq!(overlay::<Sample>(None), Sample::default());
    }
}
