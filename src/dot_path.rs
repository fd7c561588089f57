//! Dotted-path access into a JSON object.
//!
//! `"a.b.c"` walks the nested objects `a` then `b` and addresses key `c`.
//! A backslash before a dot keeps the dot in the key: `"a\\.b"` is the
//! single top-level key `"a.b"`. Only objects are traversed; arrays and
//! scalars along the way end the walk.

use serde_json::Value;

use crate::store::Document;

/// Split a dotted path into keys, honoring `\.` escapes.
pub fn segments(path: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut pieces = path.split('.');
    while let Some(piece) = pieces.next() {
        let mut key = piece.to_string();
        while key.ends_with('\\') {
            let Some(next) = pieces.next() else { break };
            key.pop();
            key.push('.');
            key.push_str(next);
        }
        parts.push(key);
    }
    parts
}

/// Value at `path`, or `None` if any step is missing or not an object.
pub fn get<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let keys = segments(path);
    let (last, parents) = keys.split_last()?;

    let mut current = document;
    for key in parents {
        current = current.get(key.as_str())?.as_object()?;
    }
    current.get(last.as_str())
}

/// Whether `path` resolves. A key holding `null` counts as present.
pub fn has(document: &Document, path: &str) -> bool {
    get(document, path).is_some()
}

/// Assign `value` at `path`, creating intermediate objects. Intermediate
/// values that are not objects are replaced.
pub fn set(document: &mut Document, path: &str, value: Value) {
    let keys = segments(path);
    let Some((last, parents)) = keys.split_last() else {
        return;
    };

    let mut current = document;
    for key in parents {
        let slot = current.entry(key.as_str()).or_insert(Value::Null);
        if !slot.is_object() {
            *slot = Value::Object(Document::new());
        }
        let Value::Object(child) = slot else {
            unreachable!("slot was just made an object");
        };
        current = child;
    }
    current.insert(last.clone(), value);
}

/// Remove the key at `path`. Returns `false` if the path did not resolve.
pub fn delete(document: &mut Document, path: &str) -> bool {
    let keys = segments(path);
    let Some((last, parents)) = keys.split_last() else {
        return false;
    };

    let mut current = document;
    for key in parents {
        match current.get_mut(key.as_str()) {
            Some(Value::Object(child)) => current = child,
            _ => return false,
        }
    }
    current.shift_remove(last.as_str()).is_some()
}
