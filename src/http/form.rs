//! URL-encoded form decoding into a JSON value.
//!
//! Keys follow the bracket convention of extended form parsers:
//! - `a[b][c]=1` nests objects
//! - `a[]=1` appends to a list, `a[0]=x&a[1]=y` fills list slots
//! - repeated keys collect into a list
//!
//! Indices above [`ARRAY_LIMIT`] are treated as object keys, and bracket
//! segments beyond [`MAX_DEPTH`] stay together as one literal key. When a key
//! is used both as a scalar and as a container the values are merged, never
//! dropped: `a=1&a[b]=2` gives `["1", {"b": "2"}]`.

use serde_json::{Map, Value};

/// Highest bracket index decoded as a list slot.
pub const ARRAY_LIMIT: usize = 20;
/// Bracket segments decoded below the root name.
pub const MAX_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    Append,
}

/// Decode a URL-encoded form into a JSON object.
pub fn parse_form(bytes: &[u8]) -> Value {
    let mut root = Value::Object(Map::new());
    for (key, value) in url::form_urlencoded::parse(bytes) {
        let segments = key_segments(&key);
        root = insert(root, &segments, Value::String(value.into_owned()));
    }
    compact(&mut root);
    root
}

fn key_segments(key: &str) -> Vec<Segment> {
    let literal = || vec![Segment::Key(key.to_string())];

    let Some(open) = key.find('[') else {
        return literal();
    };
    if open == 0 {
        return literal();
    }

    let mut segments = vec![Segment::Key(key[..open].to_string())];
    let mut rest = &key[open..];
    while !rest.is_empty() {
        if segments.len() > MAX_DEPTH {
            segments.push(Segment::Key(rest.to_string()));
            return segments;
        }
        let Some(stripped) = rest.strip_prefix('[') else {
            return literal();
        };
        let Some(close) = stripped.find(']') else {
            return literal();
        };
        segments.push(segment(&stripped[..close]));
        rest = &stripped[close + 1..];
    }
    segments
}

fn segment(text: &str) -> Segment {
    if text.is_empty() {
        return Segment::Append;
    }
    match text.parse::<usize>() {
        Ok(index) if index <= ARRAY_LIMIT && index.to_string() == text => Segment::Index(index),
        _ => Segment::Key(text.to_string()),
    }
}

/// Place `value` at `segments` below `slot`, returning the updated slot.
fn insert(slot: Value, segments: &[Segment], value: Value) -> Value {
    let Some((segment, rest)) = segments.split_first() else {
        return combine(slot, value);
    };

    match segment {
        Segment::Key(key) => match slot {
            Value::String(_) => Value::Array(vec![slot, insert(Value::Null, segments, value)]),
            other => insert_key(into_object(other), key, rest, value),
        },
        Segment::Index(index) => match slot {
            Value::Object(map) => insert_key(map, &index.to_string(), rest, value),
            Value::String(_) => Value::Array(vec![slot, insert(Value::Null, rest, value)]),
            other => {
                let mut items = into_array(other);
                if items.len() <= *index {
                    items.resize(index + 1, Value::Null);
                }
                let child = items[*index].take();
                items[*index] = insert(child, rest, value);
                Value::Array(items)
            }
        },
        Segment::Append => match slot {
            Value::Object(map) => {
                let key = map.len().to_string();
                insert_key(map, &key, rest, value)
            }
            other => {
                let mut items = into_array(other);
                items.push(insert(Value::Null, rest, value));
                Value::Array(items)
            }
        },
    }
}

fn insert_key(mut map: Map<String, Value>, key: &str, rest: &[Segment], value: Value) -> Value {
    // `insert` on an existing key keeps its position
    let child = map.get_mut(key).map(Value::take).unwrap_or(Value::Null);
    map.insert(key.to_string(), insert(child, rest, value));
    Value::Object(map)
}

/// A leaf assignment: the first value wins the slot, later ones collect into a list.
fn combine(slot: Value, value: Value) -> Value {
    match slot {
        Value::Null => value,
        Value::Array(mut items) => {
            items.push(value);
            Value::Array(items)
        }
        other => Value::Array(vec![other, value]),
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(i, item)| (i.to_string(), item))
            .collect(),
        other => Map::from_iter([("0".to_string(), other)]),
    }
}

fn into_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Drop the holes left by sparse indices (`a[3]=x` alone is `["x"]`).
fn compact(value: &mut Value) {
    match value {
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(compact);
        }
        Value::Object(map) => map.values_mut().for_each(compact),
        _ => {}
    }
}
