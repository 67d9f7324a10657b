use fxhash::FxHashMap;

/**
 * Hash map with a fast non-cryptographically secure hash function.
 */
pub type HashMap<K, V> = FxHashMap<K, V>;

/// Joins a parent directory and a relative path with '/'.
/// Leaves the path untouched when there is no parent.
pub fn join_path(parent: Option<&str>, path: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}/{path}"),
        _ => String::from(path),
    }
}
