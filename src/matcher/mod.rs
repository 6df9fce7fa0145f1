#![warn(clippy::all, clippy::pedantic)]

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::spec::Suggestion;

static MATCHER: Lazy<SkimMatcherV2> = Lazy::new(SkimMatcherV2::default);

/// How candidates are narrowed against the text already typed in the
/// active token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStrategy {
    /// Subsequence rank, best matches first.
    Fuzzy,
    /// Case-sensitive prefix match, declaration order preserved.
    Prefix,
    /// Unset; behaves as [`FilterStrategy::Prefix`].
    #[default]
    Default,
}

impl FilterStrategy {
    /// Resolves an unset strategy against the owning spec's strategy.
    #[must_use]
    pub fn or(self, fallback: FilterStrategy) -> FilterStrategy {
        match self {
            FilterStrategy::Default => fallback,
            other => other,
        }
    }
}

/// Narrows `candidates` against the typed partial text.
///
/// Prefix mode keeps declaration order. Fuzzy mode drops candidates with no
/// subsequence match and sorts the rest by descending rank; the sort is
/// stable, so ties keep declaration order.
#[must_use]
pub fn filter_suggestions(
    candidates: Vec<Suggestion>,
    typed: &str,
    strategy: FilterStrategy,
) -> Vec<Suggestion> {
    if typed.is_empty() {
        return candidates;
    }

    match strategy {
        FilterStrategy::Fuzzy => {
            let mut ranked: Vec<(i64, Suggestion)> = candidates
                .into_iter()
                .filter_map(|s| MATCHER.fuzzy_match(&s.name, typed).map(|rank| (rank, s)))
                .collect();
            ranked.sort_by(|a, b| b.0.cmp(&a.0));
            ranked.into_iter().map(|(_, s)| s).collect()
        }
        FilterStrategy::Prefix | FilterStrategy::Default => candidates
            .into_iter()
            .filter(|s| s.name.starts_with(typed))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Suggestion> {
        names.iter().map(|n| Suggestion::new(n, "")).collect()
    }

    #[test]
    fn test_prefix_filter_is_case_sensitive() {
        let out = filter_suggestions(named(&["status", "Stash", "stage"]), "sta", FilterStrategy::Prefix);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "status");
        assert_eq!(out[1].name, "stage");
    }

    #[test]
    fn test_prefix_filter_preserves_declaration_order() {
        let out = filter_suggestions(named(&["stash", "status", "stage"]), "st", FilterStrategy::Prefix);
        let names: Vec<&str> = out.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["stash", "status", "stage"]);
    }

    #[test]
    fn test_default_strategy_behaves_as_prefix() {
        let out = filter_suggestions(named(&["push", "pull"]), "pu", FilterStrategy::Default);
        assert_eq!(out.len(), 2);
        let out = filter_suggestions(named(&["push", "pull"]), "ps", FilterStrategy::Default);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fuzzy_filter_drops_non_subsequence_matches() {
        let out = filter_suggestions(named(&["checkout", "commit", "status"]), "cmt", FilterStrategy::Fuzzy);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "commit");
    }

    #[test]
    fn test_fuzzy_filter_ranks_closer_matches_first() {
        let out = filter_suggestions(named(&["restage", "stage", "status"]), "stage", FilterStrategy::Fuzzy);
        assert_eq!(out[0].name, "stage");
        assert!(out.iter().all(|s| s.name != "status"));
    }

    #[test]
    fn test_empty_typed_text_keeps_everything() {
        let out = filter_suggestions(named(&["a", "b"]), "", FilterStrategy::Fuzzy);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_strategy_fallback() {
        assert_eq!(FilterStrategy::Default.or(FilterStrategy::Fuzzy), FilterStrategy::Fuzzy);
        assert_eq!(FilterStrategy::Prefix.or(FilterStrategy::Fuzzy), FilterStrategy::Prefix);
    }
}
