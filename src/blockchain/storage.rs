use std::collections::HashMap;
use std::hash::Hash;

/// A slot value together with the access-list bookkeeping the gas schedule
/// needs: the value at the start of the current transaction and whether the
/// slot has been touched since.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageValue<V> {
    pub original_value: V,
    pub value: V,
    pub warm: bool,
}

#[derive(Clone, Debug)]
pub struct Storage<K, V>(pub HashMap<K, StorageValue<V>>);

impl<K, V> Default for Storage<K, V> {
    fn default() -> Self {
        Storage(HashMap::new())
    }
}

impl<K: Copy + Eq + Hash, V: Clone + Default> Storage<K, V> {
    /// Returns the slot as seen before this access and warms it up. A miss
    /// materializes a default entry, reported as cold.
    pub fn load(&mut self, key: K) -> StorageValue<V> {
        match self.0.get_mut(&key) {
            Some(v) => {
                let res = v.clone();
                v.warm = true;
                res
            },
            None => {
                self.0.insert(key, StorageValue {
                    original_value: V::default(),
                    value: V::default(),
                    warm: true,
                });
                StorageValue {
                    original_value: V::default(),
                    value: V::default(),
                    warm: false,
                }
            },
        }
    }

    /// Overwrites the slot and returns its previous state, keeping the
    /// original value untouched for the duration of the transaction.
    pub fn store(&mut self, key: K, value: V) -> Option<StorageValue<V>> {
        let previous = self.0.get(&key).cloned();
        self.0.insert(key, StorageValue {
            original_value: match &previous {
                Some(v) => v.original_value.clone(),
                None => V::default(),
            },
            value,
            warm: true,
        });
        previous
    }

    /// Ends the current transaction: every slot becomes cold again and its
    /// current value becomes the original one.
    pub fn reset_access(&mut self) {
        for v in self.0.values_mut() {
            v.original_value = v.value.clone();
            v.warm = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use ethnum::{u256, uint};
    use super::*;

    #[test]
    fn load_warms_up_the_slot() {
        let mut storage = Storage::<u256, u256>::default();
        storage.0.insert(uint!("42"), StorageValue {
            original_value: uint!("7"),
            value: uint!("7"),
            warm: false,
        });

        assert_eq!(storage.load(uint!("42")), StorageValue {
            original_value: uint!("7"),
            value: uint!("7"),
            warm: false,
        });
        assert_eq!(storage.load(uint!("42")), StorageValue {
            original_value: uint!("7"),
            value: uint!("7"),
            warm: true,
        });
    }

    #[test]
    fn load_materializes_missing_slots() {
        let mut storage = Storage::<u256, u256>::default();

        assert_eq!(storage.load(uint!("42")), StorageValue {
            original_value: uint!("0"),
            value: uint!("0"),
            warm: false,
        });
        assert_eq!(storage.0.get(&uint!("42")), Some(&StorageValue {
            original_value: uint!("0"),
            value: uint!("0"),
            warm: true,
        }));
    }

    #[test]
    fn store_returns_the_prior_state() {
        let mut storage = Storage::<u256, u256>::default();

        assert_eq!(storage.store(uint!("42"), uint!("7")), None);
        assert_eq!(storage.store(uint!("42"), uint!("8")), Some(StorageValue {
            original_value: uint!("0"),
            value: uint!("7"),
            warm: true,
        }));
        assert_eq!(storage.0.get(&uint!("42")), Some(&StorageValue {
            original_value: uint!("0"),
            value: uint!("8"),
            warm: true,
        }));
    }

    #[test]
    fn reset_access_commits_values_and_cools_slots() {
        let mut storage = Storage::<u256, u256>::default();
        storage.store(uint!("42"), uint!("7"));
        storage.reset_access();

        assert_eq!(storage.0.get(&uint!("42")), Some(&StorageValue {
            original_value: uint!("7"),
            value: uint!("7"),
            warm: false,
        }));
    }
}
