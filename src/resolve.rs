use crate::Value;

/// Resolve a dot-separated path against a nested value.
///
/// Maps descend by key; lists descend by a non-negative in-bounds index.
/// Any other step, including an empty segment, misses with `None`.
#[must_use]
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = match current {
            Value::Map(map) => map.get(segment)?,
            Value::List(items) => items.get(list_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// [`resolve`] with a caller-supplied default for misses.
#[must_use]
pub fn resolve_or<'a>(root: &'a Value, path: &str, default: &'a Value) -> &'a Value {
    resolve(root, path).unwrap_or(default)
}

fn list_index(segment: &str) -> Option<usize> {
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.parse().ok()
    } else {
        None
    }
}
