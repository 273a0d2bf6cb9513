//! Anagrams and spelling with tiles, both as multiset comparisons.

use tally as t;

fn main() {
    for &(a, b) in [("tachymetric", "mccarthyite"), ("banana", "peach")].iter() {
        println!("is_anagram({:?}, {:?}) = {}", a, b, t::is_anagram(a, b));
    }

    for &(word, tiles) in [("apple", "aapples"), ("apple", "aaples")].iter() {
        println!("can_spell({:?}, {:?}) = {}", word, tiles, t::can_spell(word, tiles));
    }
}
