//! Multi-tier fuzzy name matching.
//!
//! Both inputs must already be normalized (`normalize::normalize_name`).
//! Tiers are tried in order and the first satisfied tier decides:
//!
//! 1. exact equality
//! 2. same tokens in a different order (swapped first/last name)
//! 3. one full string contained in the other
//! 4. enough overlapping tokens
//!
//! The outcome is deliberately binary. No similarity score exists, and the
//! tier order is a contract: exact always wins over token overlap.

use std::collections::HashSet;

/// Decide whether two normalized names refer to the same person.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    if reordered_tokens_match(a, b) {
        return true;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }
    token_overlap_match(a, b)
}

fn tokens_min_len(s: &str, min: usize) -> Vec<&str> {
    s.split_whitespace().filter(|t| t.len() >= min).collect()
}

/// Tier 2: both names carry the same tokens (length ≥ 2) in any order.
/// Token lists must be the same size, so "john doe" matches "doe john"
/// but not "john doe smith".
fn reordered_tokens_match(a: &str, b: &str) -> bool {
    let mut ta = tokens_min_len(a, 2);
    let mut tb = tokens_min_len(b, 2);
    if ta.is_empty() || tb.is_empty() || ta.len() != tb.len() {
        return false;
    }
    ta.sort_unstable();
    tb.sort_unstable();
    ta.join(" ") == tb.join(" ")
}

/// Tier 4: count tokens of length ≥ 3 present in both names. Match on an
/// overlap of at least 2, or when both names have ≥ 2 such tokens and the
/// shorter name's tokens are a complete subset of the longer name's.
fn token_overlap_match(a: &str, b: &str) -> bool {
    let ta: HashSet<&str> = tokens_min_len(a, 3).into_iter().collect();
    let tb: HashSet<&str> = tokens_min_len(b, 3).into_iter().collect();
    if ta.is_empty() || tb.is_empty() {
        return false;
    }
    let overlap = ta.intersection(&tb).count();
    if overlap >= 2 {
        return true;
    }
    ta.len() >= 2 && tb.len() >= 2 && overlap == ta.len().min(tb.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(names_match("john doe", "john doe"));
        assert!(!names_match("john doe", "jane doe"));
    }

    #[test]
    fn reordered_tokens() {
        assert!(names_match("john doe", "doe john"));
        assert!(names_match("maria garcia lopez", "lopez maria garcia"));
        // Different token counts fall through tier 2
        assert!(!names_match("maria garcia", "ana garcia"));
    }

    #[test]
    fn containment() {
        assert!(names_match("john smith", "john smith jr"));
        assert!(names_match("ann lee", "ann"));
    }

    #[test]
    fn token_overlap() {
        // Two shared tokens of length >= 3
        assert!(names_match("john michael doe", "doe john k"));
        // Shorter name's tokens fully inside the longer name's
        assert!(names_match("maria garcia lopez", "garcia lopez ramirez"));
    }

    #[test]
    fn single_letter_tokens_excluded() {
        // "anna l": the "l" token is too short for token tiers, but "anna l"
        // is a literal prefix of "anna lee", so containment still applies.
        assert!(names_match("anna lee", "anna l"));
        // With no containment, one short token is not enough
        assert!(!names_match("anna lee", "l anna"));
    }

    #[test]
    fn no_tier_satisfied() {
        assert!(!names_match("maria garcia", "ana lopez"));
        assert!(!names_match("", "john doe"));
        assert!(!names_match("john", ""));
    }
}
