//! Similarity scoring between normalized name keys.

use strsim::{jaro_winkler, normalized_levenshtein, sorensen_dice};

/// Integer-percent similarity between two normalized keys.
///
/// Implementations must be symmetric and score identical inputs as 100.
pub trait SimilarityMetric {
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Best of four scores: Jaro-Winkler, normalized Levenshtein,
/// Sorensen-Dice, and Jaro-Winkler over token-sorted keys so reordered
/// names ("SMITH JOHN" vs "JOHN SMITH") still rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSimilarity;

impl SimilarityMetric for NameSimilarity {
    fn score(&self, a: &str, b: &str) -> u8 {
        if a == b {
            return 100;
        }
        let best = jaro_winkler(a, b)
            .max(normalized_levenshtein(a, b))
            .max(sorensen_dice(a, b))
            .max(jaro_winkler(&token_sort(a), &token_sort(b)));
        (best * 100.0).round() as u8
    }
}

fn token_sort(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}
