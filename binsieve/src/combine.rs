//! Aggregation of per-matcher verdicts into one report decision per file.

use serde::{Deserialize, Serialize};

use crate::matcher::MatchVerdict;

/// Process-wide AND/OR/NOT policy, fixed before traversal begins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationPolicy {
    /// Report when any matcher matched, instead of requiring all
    #[serde(default)]
    pub use_or: bool,
    /// Invert the final decision
    #[serde(default)]
    pub invert: bool,
}

impl CombinationPolicy {
    pub fn and() -> Self {
        Self::default()
    }

    pub fn or() -> Self {
        CombinationPolicy {
            use_or: true,
            invert: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Collapses the participating matchers' verdicts for one file.
    ///
    /// `Failed` verdicts count toward neither side: a matcher that could not
    /// examine the file is treated as non-participating for this one
    /// evaluation. With no countable verdicts at all, AND reports the file
    /// (the count equality holds vacuously) and OR does not; callers that
    /// dislike the vacuous outcome must require a participating matcher up
    /// front.
    pub fn decide(&self, verdicts: &[MatchVerdict]) -> bool {
        let matched = verdicts
            .iter()
            .filter(|v| matches!(v, MatchVerdict::Matched))
            .count();
        let total = matched
            + verdicts
                .iter()
                .filter(|v| matches!(v, MatchVerdict::NotMatched))
                .count();

        let base = if self.use_or {
            matched > 0
        } else {
            matched == total
        };
        base != self.invert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchVerdict::{Failed, Matched, NotMatched};

    #[test]
    fn test_truth_table_two_matchers() {
        let and = CombinationPolicy::and();
        let or = CombinationPolicy::or();

        assert!(and.decide(&[Matched, Matched]));
        assert!(or.decide(&[Matched, Matched]));

        assert!(!and.decide(&[Matched, NotMatched]));
        assert!(or.decide(&[Matched, NotMatched]));

        assert!(!and.decide(&[NotMatched, NotMatched]));
        assert!(!or.decide(&[NotMatched, NotMatched]));
    }

    #[test]
    fn test_invert_flips_every_outcome() {
        let and = CombinationPolicy::and();
        let or = CombinationPolicy::or();

        for verdicts in [
            vec![Matched, Matched],
            vec![Matched, NotMatched],
            vec![NotMatched, NotMatched],
        ] {
            assert_ne!(
                and.decide(&verdicts),
                and.inverted().decide(&verdicts),
                "AND inversion failed for {verdicts:?}"
            );
            assert_ne!(
                or.decide(&verdicts),
                or.inverted().decide(&verdicts),
                "OR inversion failed for {verdicts:?}"
            );
        }
    }

    #[test]
    fn test_vacuous_case() {
        assert!(CombinationPolicy::and().decide(&[]));
        assert!(!CombinationPolicy::or().decide(&[]));
    }

    #[test]
    fn test_failed_excluded_from_both_counts() {
        let and = CombinationPolicy::and();
        let or = CombinationPolicy::or();
        let reason = || Failed("io".to_string());

        // The failed matcher does not break an otherwise unanimous AND
        assert!(and.decide(&[Matched, reason()]));
        // Nor does it satisfy an OR on its own
        assert!(!or.decide(&[NotMatched, reason()]));
        // All failed collapses to the vacuous case
        assert!(and.decide(&[reason(), reason()]));
        assert!(!or.decide(&[reason(), reason()]));
    }
}
