use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence counts that remember first-seen order
///
/// Ranking is by count, descending; equal counts keep the order in which
/// the keys were first added.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` highest counts
    pub fn most_common(&self, k: usize) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, so ties stay in first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

impl<K: Eq + Hash + Clone> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}

/// Adjacent pairs, window 2, stride 1
pub fn bigrams(tokens: &[String]) -> impl Iterator<Item = (String, String)> + '_ {
    tokens
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_counts_and_rank() {
        let table: FrequencyTable<&str> = ["cat", "sat", "cat", "ran"].into_iter().collect();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.most_common(10),
            vec![("cat", 2), ("sat", 1), ("ran", 1)]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table: FrequencyTable<&str> = ["b", "a", "c", "a", "b", "d"].into_iter().collect();
        assert_eq!(table.most_common(3), vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_most_common_truncates() {
        let table: FrequencyTable<usize> = (0..25).collect();
        let top = table.most_common(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], (0, 1));
        assert_eq!(top[9], (9, 1));
    }

    #[test]
    fn test_empty_table() {
        let table: FrequencyTable<String> = FrequencyTable::new();
        assert!(table.is_empty());
        assert!(table.most_common(10).is_empty());
    }

    #[test]
    fn test_bigrams_over_filtered_tokens() {
        let filtered = tokens(&["cat", "sat", "cat", "ran"]);
        let table: FrequencyTable<(String, String)> = bigrams(&filtered).collect();

        let pair = |a: &str, b: &str| (a.to_string(), b.to_string());
        assert_eq!(
            table.most_common(10),
            vec![
                (pair("cat", "sat"), 1),
                (pair("sat", "cat"), 1),
                (pair("cat", "ran"), 1),
            ]
        );
    }

    #[test]
    fn test_bigrams_need_two_tokens() {
        assert_eq!(bigrams(&tokens(&["alone"])).count(), 0);
        assert_eq!(bigrams(&[]).count(), 0);
    }
}
