/// How an object key is derived from the selected file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// Use the file name unchanged.
    OriginalName,
    /// Prefix the file name with the submission time in Unix milliseconds.
    /// Two same-named uploads within the same millisecond still collide.
    #[default]
    TimestampPrefixed,
}

/// Object key for `file_name` submitted at `submitted_at_ms`.
pub fn derive_object_key(strategy: KeyStrategy, file_name: &str, submitted_at_ms: i64) -> String {
    match strategy {
        KeyStrategy::OriginalName => file_name.to_string(),
        KeyStrategy::TimestampPrefixed => format!("{submitted_at_ms}-{file_name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_object_key, KeyStrategy};

    #[test]
    fn original_name_is_kept_verbatim() {
        assert_eq!(
            derive_object_key(KeyStrategy::OriginalName, "scan 01.png", 1_700_000_000_000),
            "scan 01.png"
        );
    }

    #[test]
    fn timestamp_prefix_uses_millis_and_dash() {
        assert_eq!(
            derive_object_key(KeyStrategy::TimestampPrefixed, "scan.png", 1_700_000_000_123),
            "1700000000123-scan.png"
        );
    }

    #[test]
    fn same_name_different_instants_do_not_collide() {
        let a = derive_object_key(KeyStrategy::TimestampPrefixed, "a.pdf", 1);
        let b = derive_object_key(KeyStrategy::TimestampPrefixed, "a.pdf", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn same_name_same_instant_collides() {
        let a = derive_object_key(KeyStrategy::TimestampPrefixed, "a.pdf", 5);
        let b = derive_object_key(KeyStrategy::TimestampPrefixed, "a.pdf", 5);
        assert_eq!(a, b);
    }
}
