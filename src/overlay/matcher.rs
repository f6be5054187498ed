/*!
 * Common-phrase matching across the captions of several videos.
 *
 * The matcher looks for the longest contiguous run of words shared by all
 * phrases. When nothing is shared by all of them it retries on smaller
 * subsets, largest subsets first.
 *
 * The subset fallback enumerates every combination of phrases and is
 * exponential in the number of phrases. It is meant for batches of a handful
 * of videos.
 */

use log::{debug, info};

use super::words::WordSequence;

/// Longest contiguous run of `first` contained in every sequence of `others`.
///
/// Slices are tried by decreasing length, then by increasing start index in
/// `first`, so ties go to the leftmost run of the first sequence.
fn longest_shared_run(first: &WordSequence, others: &[&WordSequence]) -> WordSequence {
    let n = first.len();
    for length in (1..=n).rev() {
        for start in 0..=n - length {
            let candidate = first.slice(start, length);
            if others.iter().all(|other| other.contains_run(&candidate)) {
                return candidate;
            }
        }
    }
    WordSequence::default()
}

fn full_set_search(phrases: &[&WordSequence]) -> WordSequence {
    match phrases.split_first() {
        Some((first, others)) => longest_shared_run(first, others),
        None => WordSequence::default(),
    }
}

/// Lexicographic `r`-combinations of `0..n`
fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    if r == 0 || r > n {
        return result;
    }
    let mut indices: Vec<usize> = (0..r).collect();
    loop {
        result.push(indices.clone());

        // Rightmost index that can still move forward
        let mut i = r;
        while i > 0 && indices[i - 1] == n - r + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return result;
        }
        indices[i - 1] += 1;
        for j in i..r {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// Longest word run common to the given phrases.
///
/// Empty sequences are ignored. A single phrase is returned unchanged. When no
/// run is shared by all phrases, subsets of size `total - 1` down to 2 are
/// searched; the first size with any match wins, and within a size the
/// longest run wins with ties going to the earliest combination.
pub fn common_phrase(phrases: &[WordSequence]) -> WordSequence {
    let phrases: Vec<&WordSequence> = phrases.iter().filter(|p| !p.is_empty()).collect();

    match phrases.len() {
        0 => return WordSequence::default(),
        1 => return phrases[0].clone(),
        _ => {}
    }

    let candidate = full_set_search(&phrases);
    if !candidate.is_empty() {
        info!("Found common contiguous subsequence for all phrases: '{}'", candidate);
        return candidate;
    }

    let total = phrases.len();
    for size in (2..total).rev() {
        let mut best = WordSequence::default();
        for combo in combinations(total, size) {
            let subset: Vec<&WordSequence> = combo.iter().map(|&i| phrases[i]).collect();
            let candidate = full_set_search(&subset);
            if candidate.len() > best.len() {
                debug!("Subset {:?} shares '{}'", combo, candidate);
                best = candidate;
            }
        }
        if !best.is_empty() {
            info!("Found common contiguous subsequence for a subset of size {}: '{}'", size, best);
            return best;
        }
    }

    info!("No common contiguous subsequence found even in subsets");
    WordSequence::default()
}

/// Normalize raw phrases and return their common run joined by spaces
pub fn calculate_highlight_phrase<S: AsRef<str>>(phrases: &[S]) -> String {
    let sequences: Vec<WordSequence> = phrases
        .iter()
        .map(|p| WordSequence::from_phrase(p.as_ref()))
        .collect();
    common_phrase(&sequences).to_string()
}
