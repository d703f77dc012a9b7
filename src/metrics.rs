use crate::models::{RetrievalScore, RougeScore, RougeScores};
use std::collections::{HashMap, HashSet};

/// Lower-case whitespace tokenization.
///
/// Deliberately minimal: no stemming, no punctuation stripping, no
/// language-specific rules. Scores are only comparable across runs if the
/// tokenizer never changes under them.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Set-overlap precision/recall/F1 between the documents that should have
/// been retrieved and the ones that were.
///
/// Set semantics throughout: retrieving the same document five times counts
/// once. Empty sets never divide by zero, they score 0.0.
pub fn retrieval_score(
    relevant: &HashSet<String>,
    recovered: &HashSet<String>,
) -> RetrievalScore {
    let true_positives = relevant.intersection(recovered).count();
    let false_positives = recovered.difference(relevant).count();
    let false_negatives = relevant.difference(recovered).count();

    let precision = ratio(true_positives, true_positives + false_positives);
    let recall = ratio(true_positives, true_positives + false_negatives);

    RetrievalScore {
        precision,
        recall,
        f1: harmonic_mean(precision, recall),
        true_positives,
        false_positives,
        false_negatives,
    }
}

/// Clipped n-gram precision of the candidate against the reference, for a
/// single order n.
///
/// This is the BLEU-like score of the report: each candidate n-gram counts
/// as a match at most as many times as it occurs in the reference, and the
/// result is matches over total candidate n-grams. No brevity penalty, no
/// geometric mean over orders. 0.0 whenever either side has fewer than n
/// tokens.
pub fn ngram_overlap(reference: &str, candidate: &str, n: usize) -> f64 {
    let reference_tokens = tokenize(reference);
    let candidate_tokens = tokenize(candidate);

    let reference_counts = ngram_counts(&reference_tokens, n);
    let candidate_counts = ngram_counts(&candidate_tokens, n);
    if reference_counts.is_empty() || candidate_counts.is_empty() {
        return 0.0;
    }

    let matches = clipped_matches(&reference_counts, &candidate_counts);
    let total: usize = candidate_counts.values().sum();
    matches as f64 / total as f64
}

/// ROUGE-1 (clipped unigram overlap) and ROUGE-L (longest common
/// subsequence) for a reference/candidate pair.
///
/// Both variants report precision against the candidate length, recall
/// against the reference length, and their harmonic F1. Empty text on
/// either side scores 0.0 across the board.
pub fn rouge_scores(reference: &str, candidate: &str) -> RougeScores {
    let reference_tokens = tokenize(reference);
    let candidate_tokens = tokenize(candidate);

    let unigram_matches = clipped_matches(
        &ngram_counts(&reference_tokens, 1),
        &ngram_counts(&candidate_tokens, 1),
    );
    let lcs_length = lcs(&reference_tokens, &candidate_tokens).len();

    RougeScores {
        rouge1: overlap_ratios(unigram_matches, &reference_tokens, &candidate_tokens),
        rouge_l: overlap_ratios(lcs_length, &reference_tokens, &candidate_tokens),
    }
}

/// Longest common subsequence of two token sequences.
///
/// Classic O(m·n) table followed by a walkback from the far corner. When
/// the two neighboring cells tie during the walkback, the step goes back
/// along the candidate axis, so the reconstructed sequence is deterministic.
/// The length is the same under any tie rule.
pub fn lcs(reference: &[String], candidate: &[String]) -> Vec<String> {
    let m = reference.len();
    let n = candidate.len();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if reference[i - 1] == candidate[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    let mut subsequence = Vec::with_capacity(table[m][n]);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if reference[i - 1] == candidate[j - 1] {
            subsequence.push(reference[i - 1].clone());
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] > table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    subsequence.reverse();
    subsequence
}

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when either vector is empty or has zero norm instead of
/// dividing by zero.
///
/// # Panics
///
/// When the vectors are non-empty and of different lengths. That is a
/// caller bug, not an input condition to smooth over.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    assert_eq!(
        a.len(),
        b.len(),
        "cosine_similarity requires equal-length vectors"
    );

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Count every n-gram of `tokens`. Empty map when the sequence is shorter
/// than n or n is zero.
fn ngram_counts<'a>(tokens: &'a [String], n: usize) -> HashMap<&'a [String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Sum of candidate counts clipped to the reference counts.
fn clipped_matches(
    reference_counts: &HashMap<&[String], usize>,
    candidate_counts: &HashMap<&[String], usize>,
) -> usize {
    candidate_counts
        .iter()
        .map(|(gram, count)| (*count).min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum()
}

fn overlap_ratios(matches: usize, reference: &[String], candidate: &[String]) -> RougeScore {
    let precision = ratio(matches, candidate.len());
    let recall = ratio(matches, reference.len());
    RougeScore {
        precision,
        recall,
        f1: harmonic_mean(precision, recall),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}
