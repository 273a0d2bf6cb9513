//! A `Multiset` is a set where elements can appear more than once. It backs the word utilities
//! `is_anagram` and `can_spell`.

use itertools::Itertools;

use std::collections::HashMap;
use std::hash::Hash;


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Multiset<T: Hash + Eq> {
    counts: HashMap<T, usize>
}


impl<T: Hash + Eq> Multiset<T> {

    /// The number of times `item` occurs
    pub fn count(&self, item: &T) -> usize {
        self.counts.get(item).cloned().unwrap_or(0)
    }

    /// The total number of elements, counting repeats
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The number of distinct elements
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Check whether every element of `self` occurs in `other` at least as often
    pub fn is_subset(&self, other: &Multiset<T>) -> bool {
        self.counts.iter().all(|(item, &count)| other.count(item) >= count)
    }

}


impl<T: Hash + Eq> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Multiset { counts: iter.into_iter().counts() }
    }
}


/// Check whether the words are anagrams: the same letters, each used the same number of times.
pub fn is_anagram(word1: &str, word2: &str) -> bool {
    word1.chars().collect::<Multiset<char>>() == word2.chars().collect::<Multiset<char>>()
}


/// Check whether a set of tiles can spell a word.
pub fn can_spell(word: &str, tiles: &str) -> bool {
    let needed: Multiset<char> = word.chars().collect();
    needed.is_subset(&tiles.chars().collect())
}
