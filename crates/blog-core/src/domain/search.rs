//! Search modes and the text-ranking functions used by the in-memory store.
//!
//! The Postgres repository computes ranks in SQL. The functions here mirror
//! `ts_rank` over a title/body weighted vector and pg_trgm's `similarity`,
//! minus stemming and stop words.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use super::Post;
use crate::error::DomainError;

/// Full-text results below this rank are dropped.
pub const MIN_SEARCH_RANK: f32 = 0.3;

/// Trigram results must be strictly above this similarity.
pub const MIN_TRIGRAM_SIMILARITY: f32 = 0.1;

/// Weight of title lexemes (class A).
pub const TITLE_WEIGHT: f32 = 1.0;

/// Weight of body lexemes (class B).
pub const BODY_WEIGHT: f32 = 0.4;

// sum(1/i^2) for i in 1..inf
const RANK_NORM: f32 = 1.644_934;

/// How the search page ranks posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SearchMode {
    /// Weighted full-text rank over title and body.
    #[default]
    FullText,
    /// Trigram similarity against the title.
    Trigram,
}

impl FromStr for SearchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fulltext" | "full-text" | "full_text" => Ok(SearchMode::FullText),
            "trigram" => Ok(SearchMode::Trigram),
            other => Err(DomainError::Validation(format!(
                "unknown search mode '{other}'"
            ))),
        }
    }
}

/// A post matched by a search, with its relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub post: Post,
    pub rank: f32,
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Rank `query` against a document whose title is weighted A and body B.
///
/// Title words take positions `1..=n` and body words follow. A single
/// distinct term gets `ts_rank`'s frequency score. Several terms form an AND
/// query scored on how close their occurrences are to each other, so a
/// document lacking all but one of the terms ranks zero.
pub fn weighted_rank(title: &str, body: &str, query: &str) -> f32 {
    let terms: Vec<String> = words(query).collect::<BTreeSet<_>>().into_iter().collect();
    if terms.is_empty() {
        return 0.0;
    }

    let document: Vec<(String, f32)> = words(title)
        .map(|w| (w, TITLE_WEIGHT))
        .chain(words(body).map(|w| (w, BODY_WEIGHT)))
        .collect();

    match terms.as_slice() {
        [term] => frequency_rank(&document, term),
        _ => proximity_rank(&document, &terms),
    }
}

fn frequency_rank(document: &[(String, f32)], term: &str) -> f32 {
    let mut sum = 0.0;
    let mut best = -1.0_f32;
    let mut best_at = 0usize;

    let weights = document
        .iter()
        .filter(|(word, _)| word == term)
        .map(|(_, weight)| *weight);
    for (j, weight) in weights.enumerate() {
        sum += weight / ((j + 1) * (j + 1)) as f32;
        if weight > best {
            best = weight;
            best_at = j;
        }
    }

    if best < 0.0 {
        return 0.0;
    }
    (best + sum - best / ((best_at + 1) * (best_at + 1)) as f32) / RANK_NORM
}

/// Pairwise proximity score: every pair of occurrences of two different
/// terms adds `sqrt(w1 * w2 * word_distance(d))`, combined as independent
/// probabilities.
fn proximity_rank(document: &[(String, f32)], terms: &[String]) -> f32 {
    let occurrences: Vec<Vec<(usize, f32)>> = terms
        .iter()
        .map(|term| {
            document
                .iter()
                .enumerate()
                .filter(|(_, (word, _))| word == term)
                .map(|(i, (_, weight))| (i + 1, *weight))
                .collect()
        })
        .collect();

    let mut rank: Option<f32> = None;
    for (i, later) in occurrences.iter().enumerate() {
        for earlier in &occurrences[..i] {
            for &(at, weight) in later {
                for &(other_at, other_weight) in earlier {
                    let current =
                        (weight * other_weight * word_distance(at.abs_diff(other_at))).sqrt();
                    rank = Some(match rank {
                        None => current,
                        Some(r) => 1.0 - (1.0 - r) * (1.0 - current),
                    });
                }
            }
        }
    }

    rank.unwrap_or(0.0)
}

fn word_distance(distance: usize) -> f32 {
    if distance > 100 {
        return 1e-30;
    }
    1.0 / (1.005 + 0.05 * (distance as f32 / 1.5 - 2.0).exp())
}

fn trigrams(text: &str) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for word in words(text) {
        let padded: Vec<char> = format!("  {word} ").chars().collect();
        for window in padded.windows(3) {
            set.insert(window.iter().collect());
        }
    }
    set
}

/// Trigram similarity in `0.0..=1.0`: shared trigrams over all distinct
/// trigrams of both strings.
pub fn trigram_similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);
    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn title_match_outranks_body_match() {
        let title_hit = weighted_rank("Learning Rust", "a book", "rust");
        let body_hit = weighted_rank("A book", "all about rust", "rust");

        assert!(approx(title_hit, 0.6079));
        assert!(approx(body_hit, 0.2432));
        assert!(title_hit >= MIN_SEARCH_RANK);
        assert!(body_hit < MIN_SEARCH_RANK);
    }

    #[test]
    fn repeated_body_matches_add_up() {
        let rank = weighted_rank("Notes", "rust and more rust", "rust");
        assert!(rank >= MIN_SEARCH_RANK);
    }

    #[test]
    fn every_query_term_must_occur() {
        assert!(weighted_rank("Rust tips", "", "rust") >= MIN_SEARCH_RANK);
        assert_eq!(weighted_rank("Rust tips", "", "rust python"), 0.0);
        assert_eq!(
            weighted_rank("Rust tips", "", "rust rust"),
            weighted_rank("Rust tips", "", "rust")
        );
    }

    #[test]
    fn nearby_terms_rank_higher() {
        let adjacent = weighted_rank("Rust tips", "", "rust tips");
        assert!(approx(adjacent, 0.9910));

        // Body words two apart: sqrt(0.4 * 0.4 * word_distance(2)).
        let spread = weighted_rank("Notes", "python and rust", "rust python");
        assert!(approx(spread, 0.3940));
        assert!(spread < adjacent);

        let far = format!("rust {} python", "filler ".repeat(120));
        assert!(weighted_rank("Notes", &far, "rust python") < MIN_SEARCH_RANK);
    }

    #[test]
    fn rank_is_case_insensitive_and_zero_without_terms() {
        assert!(weighted_rank("RUST", "", "rust") > 0.0);
        assert_eq!(weighted_rank("Rust", "body", "  "), 0.0);
        assert_eq!(weighted_rank("Rust", "body", "go"), 0.0);
    }

    #[test]
    fn trigram_similarity_matches_pg_trgm() {
        assert!(approx(trigram_similarity("word", "word"), 1.0));
        // "cat" has 4 trigrams, "cats" 5, sharing 3.
        assert!(approx(trigram_similarity("cat", "cats"), 0.5));
        assert_eq!(trigram_similarity("", "anything"), 0.0);
        assert_eq!(trigram_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn search_mode_parses_config_values() {
        assert_eq!("fulltext".parse::<SearchMode>().unwrap(), SearchMode::FullText);
        assert_eq!("Trigram".parse::<SearchMode>().unwrap(), SearchMode::Trigram);
        assert!("fuzzy".parse::<SearchMode>().is_err());
    }
}
