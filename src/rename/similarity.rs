//! String similarity scores on a 0-100 scale.

use difference::{Changeset, Difference};
use unicode_segmentation::UnicodeSegmentation;

/// Similarity of two strings based on their longest common subsequence.
///
/// `100 * 2 * lcs / (len(a) + len(b))`, not rounded.
/// Two empty strings are identical.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    let total = a.graphemes(true).count() + b.graphemes(true).count();
    if total == 0 {
        return 100.0;
    }
    let common = common_length(a, b);
    (200 * common) as f64 / total as f64
}

/// Best [`ratio`] of the shorter string against any same-length window of the longer one.
///
/// Windows that only partially overlap the start or end of the longer string are considered too,
/// so a needle hanging off either edge still gets credit for the overlapping part.
/// Returns 0 if either string is empty.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<&str> = a.graphemes(true).collect();
    let b: Vec<&str> = b.graphemes(true).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (needle, haystack) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let needle_str = needle.concat();
    let length = needle.len();

    let mut windows: Vec<&[&str]> = Vec::with_capacity(haystack.len() + length);
    for end in 1..length {
        windows.push(&haystack[..end]);
    }
    for start in 0..=haystack.len() - length {
        windows.push(&haystack[start..start + length]);
    }
    for start in haystack.len() - length + 1..haystack.len() {
        windows.push(&haystack[start..]);
    }

    let mut best = 0.0;
    for window in windows {
        let score = ratio(&needle_str, &window.concat());
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Length of the longest common subsequence in graphemes.
fn common_length(a: &str, b: &str) -> usize {
    Changeset::new(a, b, "")
        .diffs
        .iter()
        .map(|diff| match diff {
            Difference::Same(same) => same.graphemes(true).count(),
            Difference::Add(_) | Difference::Rem(_) => 0,
        })
        .sum()
}
