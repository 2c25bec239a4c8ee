use crate::value::Value;

/// Generate a fresh random id for story nodes and resources
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Give an object node an `id` when it has none.
///
/// Non-object values are returned untouched. An existing `id` (even an
/// empty string) is kept.
pub fn ensure_id(mut element: Value) -> Value {
    if let Some(map) = element.object_mut() {
        if !map.contains_key("id") {
            map.shift_insert(0, "id".to_string(), Value::from(new_id()));
        }
    }
    element
}
