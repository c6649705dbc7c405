//! Near-duplicate suppression
//!
//! The same abstract usually surfaces several times: through overlapping
//! structural rules, the JSON-LD description and the meta tags. Copies differ
//! only in formatting, so their lengths stay close. Two texts whose lengths
//! differ by less than [`LENGTH_PROXIMITY`] characters are treated as the same
//! abstract and the earlier one is kept.
//!
//! Two genuinely different abstracts of similar length also collapse; that
//! loss is accepted.

use crate::char_len;

/// Length difference (in characters) below which two texts are duplicates
pub const LENGTH_PROXIMITY: usize = 50;

/// Drop exact and near-duplicate texts, keeping first occurrences in order
pub fn deduplicate(texts: Vec<String>) -> Vec<String> {
    let mut accepted: Vec<String> = Vec::new();
    let mut seen_lengths: Vec<usize> = Vec::new();

    for text in texts {
        let length = char_len(&text);

        if seen_lengths
            .iter()
            .any(|&seen| seen.abs_diff(length) < LENGTH_PROXIMITY)
        {
            continue;
        }

        if accepted.contains(&text) {
            continue;
        }

        seen_lengths.push(length);
        accepted.push(text);
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let out = deduplicate(vec![text(100), text(100), text(100)]);
        assert_eq!(out, vec![text(100)]);
    }

    #[test]
    fn test_length_proximity() {
        let out = deduplicate(vec![text(100), text(149), text(150), text(51), text(50)]);
        // 149 and 51 are within 50 of 100; 150 and 50 sit exactly 50 away
        assert_eq!(out, vec![text(100), text(150), text(50)]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let first = format!("{} first", "a".repeat(200));
        let second = format!("{} other", "b".repeat(210));
        let out = deduplicate(vec![first.clone(), second]);
        assert_eq!(out, vec![first]);
    }

    #[test]
    fn test_proximity_uses_characters() {
        // 60 two-byte characters vs 60 ASCII characters: same length
        let accented = "\u{e9}".repeat(60);
        let out = deduplicate(vec![accented.clone(), text(60)]);
        assert_eq!(out, vec![accented]);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(Vec::new()).is_empty());
    }
}
