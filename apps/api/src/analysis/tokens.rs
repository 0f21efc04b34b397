use std::collections::{HashMap, HashSet};

/// Lowercased whitespace tokens with more than `min_chars` characters.
pub fn tokens(text: &str, min_chars: usize) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(move |t| t.chars().count() > min_chars)
}

/// Whitespace-token count of the raw text, no filtering.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn token_set(text: &str, min_chars: usize) -> HashSet<String> {
    tokens(text, min_chars).collect()
}

/// Token counts that remember first-seen order.
#[derive(Debug, Default)]
pub struct FrequencyMap {
    order: Vec<String>,
    counts: HashMap<String, usize>,
    total: usize,
}

impl FrequencyMap {
    pub fn build(text: &str, min_chars: usize) -> Self {
        let mut map = Self::default();
        for token in tokens(text, min_chars) {
            map.total += 1;
            match map.counts.get_mut(&token) {
                Some(count) => *count += 1,
                None => {
                    map.counts.insert(token.clone(), 1);
                    map.order.push(token);
                }
            }
        }
        map
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of tokens counted, duplicates included.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Distinct tokens in first-seen order.
    pub fn distinct(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_lowercase_and_filter_by_length() {
        let out: Vec<String> = tokens("Go is a FAST language", 2).collect();
        assert_eq!(out, vec!["fast", "language"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let out: Vec<String> = tokens("été ok", 2).collect();
        assert_eq!(out, vec!["été"]);
    }

    #[test]
    fn test_word_count_ignores_outer_whitespace() {
        assert_eq!(word_count("  one two\n\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_frequency_map_keeps_first_seen_order() {
        let map = FrequencyMap::build("Rust tokio rust axum Tokio serde", 3);
        let distinct: Vec<&str> = map.distinct().collect();
        assert_eq!(distinct, vec!["rust", "tokio", "axum", "serde"]);
        assert_eq!(map.total(), 6);
        assert!(map.contains("axum"));
        assert!(!map.contains("Axum"));
    }
}
