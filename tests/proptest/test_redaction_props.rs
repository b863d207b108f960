//! Property-based tests for output redaction
//!
//! Random lines and secrets checked against the redacting writer's
//! guarantees: masking keeps length, secrets never survive, and chunk
//! boundaries do not matter.

use std::io::Write;

use ptyredact::{RedactingWriter, RedactionSet};
use proptest::prelude::*;

fn filter_all(set: &RedactionSet, chunks: &[&[u8]]) -> Vec<u8> {
    let mut writer = RedactingWriter::new(Vec::new(), set.clone());
    for chunk in chunks {
        writer.write_all(chunk).unwrap();
    }
    writer.into_inner()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

proptest! {
    #[test]
    fn test_masking_preserves_length(
        prefix in "[a-z =]{0,40}",
        secret in "[a-z0-9]{1,12}",
        suffix in "[a-z =]{0,40}",
    ) {
        let line = format!("{}{}{}\n", prefix, secret, suffix);
        let set = RedactionSet::parse(&secret);

        let output = filter_all(&set, &[line.as_bytes()]);
        prop_assert_eq!(output.len(), line.len());
    }

    #[test]
    fn test_secret_never_survives(
        prefix in "[a-z ]{0,40}",
        secret in "[a-z]{1,8}",
        suffix in "[a-z ]{0,40}",
        repeats in 1usize..4,
    ) {
        let line = format!("{}{}{}\n", prefix, secret.repeat(repeats), suffix);
        let set = RedactionSet::parse(&secret);

        let output = filter_all(&set, &[line.as_bytes()]);
        prop_assert!(!contains(&output, secret.as_bytes()));
    }

    #[test]
    fn test_chunk_boundaries_do_not_change_output(
        lines in prop::collection::vec("[a-z0-9 ]{0,30}", 1..6),
        secret in "[a-z0-9]{1,6}",
        split in any::<prop::sample::Index>(),
    ) {
        let mut input = String::new();
        for line in &lines {
            input.push_str(line);
            input.push_str(&secret);
            input.push('\n');
        }
        let bytes = input.as_bytes();
        let at = split.index(bytes.len() + 1);
        let set = RedactionSet::parse(&secret);

        let whole = filter_all(&set, &[bytes]);
        let split_output = filter_all(&set, &[&bytes[..at], &bytes[at..]]);
        prop_assert_eq!(whole, split_output);
    }

    #[test]
    fn test_empty_set_is_identity(
        lines in prop::collection::vec("[ -~]{0,60}", 0..8),
    ) {
        let input: String = lines.iter().map(|line| format!("{}\n", line)).collect();

        let output = filter_all(&RedactionSet::default(), &[input.as_bytes()]);
        prop_assert_eq!(output, input.into_bytes());
    }

    #[test]
    fn test_redaction_is_idempotent(
        line in "[a-z ]{0,60}",
        secret in "[a-z]{1,6}",
    ) {
        let input = format!("{}\n", line);
        let set = RedactionSet::parse(&secret);

        let once = filter_all(&set, &[input.as_bytes()]);
        let twice = filter_all(&set, &[&once]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_unterminated_tail_is_never_emitted(
        complete in "[a-z ]{0,30}",
        tail in "[a-z ]{1,30}",
    ) {
        let input = format!("{}\n{}", complete, tail);
        let set = RedactionSet::parse("zzz");

        let output = filter_all(&set, &[input.as_bytes()]);
        prop_assert_eq!(output.len(), complete.len() + 1);
    }
}
