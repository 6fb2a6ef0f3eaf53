//! Long metadata values.
//!
//! Stripe caps each metadata value at 500 characters, but a serialized order
//! form can be longer. Long values are stored as numbered chunks
//! (`form_data_0`, `form_data_1`, ...) and joined back on retrieval.

use std::collections::BTreeMap;

pub const MAX_VALUE_CHARS: usize = 500;

/// Split `value` into `{key}_{n}` entries of at most [`MAX_VALUE_CHARS`].
pub fn split_value(key: &str, value: &str) -> Vec<(String, String)> {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return vec![(format!("{key}_0"), String::new())];
    }
    chars
        .chunks(MAX_VALUE_CHARS)
        .enumerate()
        .map(|(i, chunk)| (format!("{key}_{i}"), chunk.iter().collect()))
        .collect()
}

/// Reassemble a value written by [`split_value`]. A plain `key` entry (no
/// chunks) is accepted as well.
pub fn join_value(metadata: &BTreeMap<String, String>, key: &str) -> Option<String> {
    if let Some(whole) = metadata.get(key) {
        return Some(whole.clone());
    }

    let mut joined = String::new();
    let mut found = false;
    for i in 0.. {
        match metadata.get(&format!("{key}_{i}")) {
            Some(part) => {
                joined.push_str(part);
                found = true;
            }
            None => break,
        }
    }
    found.then_some(joined)
}
