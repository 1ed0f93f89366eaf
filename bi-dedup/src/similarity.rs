//! Idea name normalization and fuzzy matching
//!
//! Two names match when their normalized forms are equal, when one contains
//! the other, or when their gestalt similarity ratio reaches the threshold.
//!
//! The ratio is the Ratcliff/Obershelp measure `2·M / (|a| + |b|)`, where M is
//! the number of characters covered by the matching blocks found by repeatedly
//! taking the longest common block and recursing on both sides of it.

use std::collections::HashMap;

/// Symbols stripped from both ends of a name before comparison
const DECORATIVE_SYMBOLS: &[char] = &[
    '🚀', '✨', '💡', '⭐', '🌟', '🔥', '🎯', '📈', '💰', '✅', '👉', '\u{fe0f}',
];

/// Sequences at least this long drop "popular" characters from the index
const AUTOJUNK_MIN_LEN: usize = 200;

/// Normalize an idea name for comparison
///
/// Strips decorative symbols and whitespace from both ends, then lower-cases.
/// Total and idempotent.
pub fn normalize_idea_name(name: &str) -> String {
    name.trim_matches(|c: char| c.is_whitespace() || DECORATIVE_SYMBOLS.contains(&c))
        .to_lowercase()
}

/// A block of `size` equal characters at `a[a_start..]` and `b[b_start..]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Longest-common-block sequence matcher over characters
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// Positions of each character in `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // Characters occurring in more than 1% of a long `b` are not indexed
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let limit = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block of equal characters in `a[alo..ahi]` and `b[blo..bhi]`
    ///
    /// Among blocks of maximal size, the one starting earliest in `a` wins,
    /// then the one starting earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j2len[j] = length of the longest block ending at a[i-1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Extend across characters left out of the index
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchBlock {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All matching blocks, ordered by position, adjacent blocks merged
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a_start && blo < m.b_start {
                queue.push((alo, m.a_start, blo, m.b_start));
            }
            if m.a_start + m.size < ahi && m.b_start + m.size < bhi {
                queue.push((m.a_start + m.size, ahi, m.b_start + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort_by_key(|m| (m.a_start, m.b_start));

        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged
    }

    /// Similarity ratio in [0, 1]; two empty sequences score 1
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

/// Decides whether two idea names refer to the same concept
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    threshold: f64,
}

impl NameMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare two raw names
    pub fn is_similar(&self, name1: &str, name2: &str) -> bool {
        self.matches_normalized(&normalize_idea_name(name1), &normalize_idea_name(name2))
    }

    /// Compare two already-normalized names
    pub fn matches_normalized(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }

        if (!a.is_empty() && b.contains(a)) || (!b.is_empty() && a.contains(b)) {
            return true;
        }

        SequenceMatcher::new(a, b).ratio() >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_decorations_and_case() {
        assert_eq!(normalize_idea_name("🚀 Great Idea"), "great idea");
        assert_eq!(normalize_idea_name("  Smart Planner ✨ "), "smart planner");
        assert_eq!(normalize_idea_name("⭐\u{fe0f} Star"), "star");
        assert_eq!(normalize_idea_name(""), "");
        assert_eq!(normalize_idea_name("🚀🚀"), "");
    }

    #[test]
    fn test_normalize_keeps_interior_symbols() {
        assert_eq!(normalize_idea_name("Rocket 🚀 Launch"), "rocket 🚀 launch");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "🚀 Great Idea",
            "great idea",
            "  ✨ Mixed CASE 🔥  ",
            "ΣΊΣΥΦΟΣ",
            "İstanbul Tour",
            "Tab\tSeparated\n",
            "🚀 ✨ 🚀",
        ];
        for s in samples {
            let once = normalize_idea_name(s);
            assert_eq!(normalize_idea_name(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_ratio_known_values() {
        // "bcd" is shared: 2·3 / 8
        assert_eq!(SequenceMatcher::new("abcd", "bcde").ratio(), 0.75);
        assert_eq!(SequenceMatcher::new("abc", "abc").ratio(), 1.0);
        assert_eq!(SequenceMatcher::new("abc", "xyz").ratio(), 0.0);
        assert_eq!(SequenceMatcher::new("", "").ratio(), 1.0);
        assert_eq!(SequenceMatcher::new("", "abc").ratio(), 0.0);
    }

    #[test]
    fn test_matching_blocks_recurse_on_both_sides() {
        let matcher = SequenceMatcher::new("qabxcd", "abycdf");
        let blocks = matcher.matching_blocks();
        assert_eq!(
            blocks,
            vec![
                MatchBlock { a_start: 1, b_start: 0, size: 2 },
                MatchBlock { a_start: 4, b_start: 3, size: 2 },
            ]
        );
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let matcher = SequenceMatcher::new(" abcd", "abcd abcd");
        let m = matcher.find_longest_match(0, 5, 0, 9);
        assert_eq!(m, MatchBlock { a_start: 0, b_start: 4, size: 5 });
    }

    #[test]
    fn test_ratio_on_long_sequences_uses_popular_filter() {
        let a = "a".repeat(250);
        let b = "a".repeat(250);
        // Every character is popular, but identical sequences still extend fully
        assert_eq!(SequenceMatcher::new(&a, &b).ratio(), 1.0);
    }

    #[test]
    fn test_exact_match_after_normalization() {
        let matcher = NameMatcher::new(0.85);
        assert!(matcher.is_similar("🚀 Smart Planner", "smart planner"));
    }

    #[test]
    fn test_substring_match() {
        let matcher = NameMatcher::new(0.85);
        assert!(matcher.is_similar("Budget", "Budget Tracker Pro"));
        assert!(matcher.is_similar("Budget Tracker Pro", "budget"));
    }

    #[test]
    fn test_empty_name_is_not_a_substring_of_everything() {
        let matcher = NameMatcher::new(0.85);
        assert!(!matcher.is_similar("", "Budget Tracker"));
        assert!(matcher.is_similar("", "🚀"));
    }

    #[test]
    fn test_fuzzy_match_threshold() {
        let matcher = NameMatcher::new(0.85);
        // One-letter typo: ratio 26/28 ≈ 0.93
        assert!(matcher.is_similar("Budget Tracker", "Budgat Tracker"));
        assert!(!matcher.is_similar("Budget Tracker", "Meal Planner"));

        let strict = NameMatcher::new(0.95);
        assert!(!strict.is_similar("Budget Tracker", "Budgat Tracker"));
    }
}
