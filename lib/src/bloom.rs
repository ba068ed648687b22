use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;
use std::hash::Hash;

/// A Bloom filter: a probabilistic set that may report false positives, but never false
/// negatives.
///
/// Probe positions come from a single `fxhash` value, split into two independent hashes with
/// different 64-bit finalizers (double hashing). `fxhash` is stable across runs, so a serialized
/// filter keeps answering correctly after being loaded again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomFilter {
    bits: Vec<u64>,
    num_bits: u64,
    num_hashes: u32,
    expected_items: usize,
    error_rate: f64,
}

impl BloomFilter {
    /// Creates a filter sized so that, once `expected_items` items are inserted, the chance of a
    /// false positive is about `error_rate`.
    pub fn new(expected_items: usize, error_rate: f64) -> BloomFilter {
        let items = expected_items.max(1) as f64;
        let error_rate = error_rate.clamp(f64::MIN_POSITIVE, 0.5);
        let num_bits = (-(items * error_rate.ln()) / (LN_2 * LN_2)).ceil().max(64.0) as u64;
        let num_hashes = ((num_bits as f64 / items) * LN_2).round().max(1.0) as u32;
        BloomFilter {
            bits: vec![0; ((num_bits + 63) / 64) as usize],
            num_bits,
            num_hashes,
            expected_items,
            error_rate,
        }
    }

    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        for position in self.positions(item) {
            self.bits[(position / 64) as usize] |= 1 << (position % 64);
        }
    }

    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.positions(item)
            .all(|position| self.bits[(position / 64) as usize] & (1 << (position % 64)) != 0)
    }

    pub fn expected_items(&self) -> usize {
        self.expected_items
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    fn positions<T: Hash + ?Sized>(&self, item: &T) -> impl Iterator<Item = u64> {
        let hash = fxhash::hash64(item);
        let first = mix_murmur(hash);
        // Odd, so the probes cycle through every bit when `num_bits` is a power of two.
        let second = mix_splitmix(hash) | 1;
        let num_bits = self.num_bits;
        (0..self.num_hashes as u64)
            .map(move |index| first.wrapping_add(index.wrapping_mul(second)) % num_bits)
    }
}

fn mix_murmur(mut value: u64) -> u64 {
    value ^= value >> 33;
    value = value.wrapping_mul(0xff51_afd7_ed55_8ccd);
    value ^= value >> 33;
    value = value.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    value ^ (value >> 33)
}

fn mix_splitmix(mut value: u64) -> u64 {
    value = value.wrapping_add(0x9e37_79b9_7f4a_7c15);
    value = (value ^ (value >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizing_follows_expected_items_and_error_rate() {
        let filter = BloomFilter::new(1000, 0.01);

        // m = -n ln(p) / ln(2)^2 = 9586 bits, k = m / n * ln(2) = 7.
        assert_eq!(filter.num_bits, 9586);
        assert_eq!(filter.num_hashes(), 7);
        assert_eq!(filter.bits.len(), 150);
        assert_eq!(filter.expected_items(), 1000);
        assert_eq!(filter.error_rate(), 0.01);
    }

    #[test]
    fn empty_filter_contains_nothing() {
        let filter = BloomFilter::new(10, 0.001);

        assert!(!filter.contains("anything"));
        assert!(!filter.contains(""));
    }

    #[test]
    fn no_false_negatives() {
        let mut filter = BloomFilter::new(5000, 1e-6);
        let items: Vec<String> = (0..5000).map(|index| format!("ЭЛЕМЕНТ{}", index)).collect();
        for item in &items {
            filter.insert(item.as_str());
        }

        assert!(items.iter().all(|item| filter.contains(item.as_str())));
    }

    #[test]
    fn false_positive_rate_is_bounded() {
        let mut filter = BloomFilter::new(2000, 1e-3);
        for index in 0..2000 {
            filter.insert(format!("member-{}", index).as_str());
        }

        let false_positives = (0..20_000)
            .filter(|index| filter.contains(format!("stranger-{}", index).as_str()))
            .count();

        // Expected about 20; allow a wide margin.
        assert!(false_positives < 200, "{} false positives", false_positives);
    }
}
