//! Picks the candidate title closest to a query.
//!
//! Similarity is the Sørensen–Dice coefficient over character bigrams,
//! computed after lower-casing, trimming and removing all whitespace. The
//! first candidate with the highest score wins, so results are stable for
//! a given input order.

use crate::utils::error::{MatchError, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub index: usize,
    pub score: f64,
    /// Score of every candidate, in input order
    pub ratings: Vec<f64>,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Dice coefficient of two strings in `[0, 1]`. Whitespace is ignored;
/// bigrams are counted as a multiset.
pub fn compare(first: &str, second: &str) -> f64 {
    let first: Vec<char> = first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> = second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }
    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in first.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2 * intersection) as f64 / (first.len() + second.len() - 2) as f64
}

pub fn find_best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> Result<BestMatch> {
    if candidates.is_empty() {
        return Err(MatchError::EmptyCandidateSet);
    }

    let query = normalize(query);
    let ratings: Vec<f64> = candidates
        .iter()
        .map(|candidate| compare(&query, &normalize(candidate.as_ref())))
        .collect();

    let mut index = 0;
    for (i, rating) in ratings.iter().enumerate() {
        // strict comparison keeps the earliest of equal scores
        if *rating > ratings[index] {
            index = i;
        }
    }

    Ok(BestMatch {
        index,
        score: ratings[index],
        ratings,
    })
}
