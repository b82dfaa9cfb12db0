//! Name normalization and similarity scoring.
//!
//! Both sources spell the same athlete differently: the reference source uses full
//! names ("Tom Brady") while the computed source often only has an abbreviated form
//! ("T.Brady"). Everything here is pure and allocation-light.

use crate::error::MatchError;
use crate::models::Entity;
use strsim::normalized_levenshtein;

/// Highest score an abbreviation-only equality can reach ("Tom Brady" vs "T.Brady").
///
/// Keeps an exact full-name hit ahead of a candidate that only shares the initial and
/// last name.
pub const ABBREVIATED_SCORE_CEILING: f64 = 0.99;

/// Normalized Levenshtein ratio between two names, case-insensitive.
///
/// `1 - distance / max(len(a), len(b))`, counted in chars. Two empty strings score 1.0,
/// an empty string against a non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize_name(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Name used for comparison: the linked identity when present, otherwise the entity's own.
pub fn canonical_name(entity: &Entity) -> String {
    match &entity.linked_identity {
        Some(identity) => normalize_name(&identity.full_name),
        None => normalize_name(&entity.name),
    }
}

/// Split a whitespace-collapsed name into (first token, remainder).
///
/// Splits on the first space; a single token splits on its first `.` only when both
/// sides are non-empty, which is the shape of an already abbreviated name.
fn split_name(name: &str) -> Option<(&str, &str)> {
    if let Some(parts) = name.split_once(' ') {
        return Some(parts);
    }
    match name.split_once('.') {
        Some((first, rest)) if !first.is_empty() && !rest.is_empty() => Some((first, rest)),
        _ => None,
    }
}

/// Reduce a name to "F.Last" form.
///
/// "Tom Brady" -> "T.Brady", "J. Smith" -> "J.Smith". A single token that already has
/// the "F.Last" shape is returned as is; any other single token (or an empty name) is
/// a [`MatchError::MalformedName`].
pub fn abbreviate(full_name: &str) -> Result<String, MatchError> {
    let collapsed = collapse_whitespace(full_name);
    let (first, rest) =
        split_name(&collapsed).ok_or_else(|| MatchError::MalformedName(full_name.to_string()))?;
    let initial = first
        .chars()
        .next()
        .ok_or_else(|| MatchError::MalformedName(full_name.to_string()))?;
    Ok(format!("{}.{}", initial, rest))
}

/// Pre-split comparison forms of a person name, all lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub initial: char,
    /// "t.brady"
    pub abbreviated: String,
    /// "tom brady"; `None` when the given name is only an initial.
    pub full: Option<String>,
}

impl ParsedName {
    pub fn parse(raw: &str) -> Result<Self, MatchError> {
        let norm = normalize_name(raw);
        let abbreviated = abbreviate(&norm).map_err(|_| MatchError::MalformedName(raw.to_string()))?;
        let initial = abbreviated
            .chars()
            .next()
            .ok_or_else(|| MatchError::MalformedName(raw.to_string()))?;

        // A given name like "j." or "t.j." carries no more than the abbreviation does
        let full = match norm.split_once(' ') {
            Some((given, _)) if given.chars().count() > 1 && !given.contains('.') => {
                Some(norm.clone())
            }
            _ => None,
        };

        Ok(Self {
            initial,
            abbreviated,
            full,
        })
    }

    /// Score against another parsed name using the most detailed form both sides share.
    ///
    /// Different initials are rejected outright with 0.0. When only one side carries a
    /// given name the score is capped at [`ABBREVIATED_SCORE_CEILING`].
    pub fn score(&self, other: &ParsedName) -> f64 {
        if self.initial != other.initial {
            return 0.0;
        }
        match (&self.full, &other.full) {
            (Some(a), Some(b)) => similarity(a, b),
            (None, None) => similarity(&self.abbreviated, &other.abbreviated),
            _ => similarity(&self.abbreviated, &other.abbreviated).min(ABBREVIATED_SCORE_CEILING),
        }
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Similarity
    // -------------------------------------------------------------------------

    #[test]
    fn test_similarity_identity() {
        for s in ["tom brady", "T.Brady", "a", "Ja'Marr Chase"] {
            assert_eq!(similarity(s, s), 1.0, "s = {s}");
        }
    }

    #[test]
    fn test_similarity_case_insensitive() {
        assert_eq!(similarity("Tom Brady", "TOM BRADY"), 1.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [
            ("kitten", "sitting"),
            ("jon smith", "jonathan smith"),
            ("t.brady", "tom brady"),
            ("", "abc"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_similarity_known_values() {
        // kitten -> sitting is 3 edits over 7 chars
        assert!((similarity("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_empty_strings() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "brady"), 0.0);
    }

    #[test]
    fn test_similarity_bounds() {
        let score = similarity("patrick mahomes", "pat mahomes");
        assert!((0.0..=1.0).contains(&score));
    }

    // -------------------------------------------------------------------------
    // Abbreviation
    // -------------------------------------------------------------------------

    #[test]
    fn test_abbreviate_full_name() {
        assert_eq!(abbreviate("Tom Brady").unwrap(), "T.Brady");
        assert_eq!(abbreviate("  Amon-Ra   St. Brown ").unwrap(), "A.St. Brown");
    }

    #[test]
    fn test_abbreviate_initial_with_period() {
        assert_eq!(abbreviate("J. Smith").unwrap(), "J.Smith");
    }

    #[test]
    fn test_abbreviate_already_abbreviated_token() {
        assert_eq!(abbreviate("T.Brady").unwrap(), "T.Brady");
    }

    #[test]
    fn test_abbreviate_single_token_is_malformed() {
        assert_eq!(
            abbreviate("Cher"),
            Err(MatchError::MalformedName("Cher".to_string()))
        );
        assert!(matches!(abbreviate(""), Err(MatchError::MalformedName(_))));
        assert!(matches!(abbreviate("Brady."), Err(MatchError::MalformedName(_))));
    }

    // -------------------------------------------------------------------------
    // Parsed names
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_full_name() {
        let parsed = ParsedName::parse("John  Smith").unwrap();
        assert_eq!(parsed.initial, 'j');
        assert_eq!(parsed.abbreviated, "j.smith");
        assert_eq!(parsed.full.as_deref(), Some("john smith"));
    }

    #[test]
    fn test_parse_abbreviated_forms() {
        for raw in ["J. Smith", "J.Smith", "j smith"] {
            let parsed = ParsedName::parse(raw).unwrap();
            assert_eq!(parsed.abbreviated, "j.smith", "raw = {raw}");
            assert!(parsed.full.is_none(), "raw = {raw}");
        }
    }

    #[test]
    fn test_parse_dotted_given_name_is_not_full() {
        let parsed = ParsedName::parse("T.J. Watt").unwrap();
        assert_eq!(parsed.abbreviated, "t.watt");
        assert!(parsed.full.is_none());
    }

    #[test]
    fn test_parse_malformed_keeps_raw_name() {
        assert_eq!(
            ParsedName::parse("Cher"),
            Err(MatchError::MalformedName("Cher".to_string()))
        );
    }

    #[test]
    fn test_score_rejects_different_initials() {
        let a = ParsedName::parse("Mike Evans").unwrap();
        let b = ParsedName::parse("K.Evans").unwrap();
        assert_eq!(a.score(&b), 0.0);
    }

    #[test]
    fn test_score_uses_abbreviation_when_one_side_lacks_given_name() {
        let full = ParsedName::parse("Tom Brady").unwrap();
        let short = ParsedName::parse("T.Brady").unwrap();
        assert_eq!(full.score(&short), ABBREVIATED_SCORE_CEILING);
        assert_eq!(short.score(&full), ABBREVIATED_SCORE_CEILING);
    }

    #[test]
    fn test_score_exact_forms_reach_one() {
        let josh = ParsedName::parse("Josh Allen").unwrap();
        let short = ParsedName::parse("J. Allen").unwrap();
        assert_eq!(josh.score(&ParsedName::parse("josh  allen").unwrap()), 1.0);
        assert_eq!(short.score(&ParsedName::parse("J.Allen").unwrap()), 1.0);
        assert!(josh.score(&short) < 1.0);
    }

    #[test]
    fn test_score_keeps_full_names_apart() {
        let john = ParsedName::parse("John Smith").unwrap();
        let jane = ParsedName::parse("Jane Smith").unwrap();
        // Same abbreviation, but both sides carry the given name
        assert!(john.score(&jane) < 1.0);
    }

    #[test]
    fn test_canonical_name_prefers_linked_identity() {
        let plain = Entity::new("1", "T.Brady", "TB", crate::models::Position::QB);
        assert_eq!(canonical_name(&plain), "t.brady");

        let linked = plain.with_linked_identity("Tom  Brady");
        assert_eq!(canonical_name(&linked), "tom brady");
    }
}
