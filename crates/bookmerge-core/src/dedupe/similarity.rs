//! Title similarity backends for fuzzy deduplication

use strsim::normalized_levenshtein;

/// Capability interface for fuzzy title comparison.
///
/// The deduplication engine only runs its fuzzy pass when the injected
/// backend reports itself available; an unavailable backend downgrades
/// the engine to exact grouping without error.
pub trait TitleSimilarity {
    /// Whether this backend can produce scores at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Partial-ratio similarity in 0.0..=100.0: the best alignment of the
    /// shorter string against the longer one, so a clean substring
    /// scores 100.
    fn partial_ratio(&self, a: &str, b: &str) -> f64;
}

/// strsim-backed partial ratio: maximum normalized Levenshtein similarity
/// of the shorter string over every equal-length char window of the
/// longer one.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowedLevenshtein;

impl TitleSimilarity for WindowedLevenshtein {
    fn partial_ratio(&self, a: &str, b: &str) -> f64 {
        let (shorter, longer) = if a.chars().count() <= b.chars().count() {
            (a, b)
        } else {
            (b, a)
        };
        let window_len = shorter.chars().count();
        if window_len == 0 {
            return if longer.is_empty() { 100.0 } else { 0.0 };
        }

        let longer_chars: Vec<char> = longer.chars().collect();
        let mut best = 0.0_f64;
        for start in 0..=longer_chars.len() - window_len {
            let window: String = longer_chars[start..start + window_len].iter().collect();
            let score = normalized_levenshtein(shorter, &window);
            if score > best {
                best = score;
            }
            if best >= 1.0 {
                break;
            }
        }
        best * 100.0
    }
}

/// Backend for builds or callers without fuzzy matching; the engine
/// skips its fuzzy pass entirely and the exact grouping stands.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimilarityUnavailable;

impl TitleSimilarity for SimilarityUnavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn partial_ratio(&self, _a: &str, _b: &str) -> f64 {
        0.0
    }
}
