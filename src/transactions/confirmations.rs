/// Per-transaction confirmation flags, one bit per owner slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Confirmations {
    words: Vec<u64>,
    count: usize,
}

impl Confirmations {
    pub fn for_owners(owner_count: usize) -> Self {
        Self {
            words: vec![0; owner_count.div_ceil(64)],
            count: 0,
        }
    }

    pub fn contains(&self, slot: usize) -> bool {
        self.words
            .get(slot / 64)
            .is_some_and(|word| word & (1u64 << (slot % 64)) != 0)
    }

    /// Sets the bit for `slot`. Returns false if it was already set.
    pub fn insert(&mut self, slot: usize) -> bool {
        if self.contains(slot) {
            return false;
        }
        let word = slot / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (slot % 64);
        self.count += 1;
        true
    }

    /// Clears the bit for `slot`. Returns false if it was not set.
    pub fn remove(&mut self, slot: usize) -> bool {
        if !self.contains(slot) {
            return false;
        }
        self.words[slot / 64] &= !(1u64 << (slot % 64));
        self.count -= 1;
        true
    }

    pub fn count(&self) -> usize {
        self.count
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut set = Confirmations::for_owners(3);
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert!(set.contains(1));
        assert!(!set.contains(0));
        assert_eq!(set.count(), 1);

        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert_eq!(set.count(), 0);
    }

    #[test]
    fn test_slots_beyond_first_word() {
        let mut set = Confirmations::for_owners(130);
        assert!(set.insert(0));
        assert!(set.insert(64));
        assert!(set.insert(129));
        assert_eq!(set.count(), 3);
        assert!(set.contains(129));
        assert!(!set.contains(128));
        // Out-of-range lookups are simply unset.
        assert!(!set.contains(5000));
    }
}
