//! Property-based tests for the archive pipeline using proptest.

use std::fs;

use proptest::prelude::*;
use tmpl::{extract, ArchiveEntry, ArchiveWriter, StripRule};

// ============================================================================
// Strategies
// ============================================================================

fn components() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 1..6)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Stripping removes min(n, len - 1) components and keeps the tail.
    #[test]
    fn strip_rule_keeps_a_name(parts in components(), n in 0usize..10) {
        let kept = StripRule(n).apply(&parts);
        prop_assert!(!kept.is_empty());
        prop_assert_eq!(kept.len(), parts.len() - n.min(parts.len() - 1));
        prop_assert_eq!(kept.last(), parts.last());
        prop_assert!(parts.ends_with(kept));
    }

    /// Whatever is written can be extracted back with the same content.
    #[test]
    fn extract_restores_written_entries(
        parts in components(),
        body in prop::collection::vec(any::<u8>(), 0..600),
        n in 0usize..4,
    ) {
        let path = parts.join("/");
        let mut writer = ArchiveWriter::new(Vec::new());
        writer
            .append(&ArchiveEntry { path, mode: 0o644, content: body.clone() })
            .unwrap();
        let bytes = writer.finish().unwrap();

        let tmp = tempfile::tempdir().unwrap();
        let count = extract(bytes.as_slice(), tmp.path(), StripRule(n)).unwrap();
        prop_assert_eq!(count, 1);

        let mut expected = tmp.path().to_path_buf();
        expected.extend(StripRule(n).apply(&parts));
        prop_assert_eq!(fs::read(expected).unwrap(), body);
    }
}
