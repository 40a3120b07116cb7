use std::fmt::{self, Debug};
use std::mem;
use std::time::Instant;

use log::{debug, trace};

use crate::error::HashTableError;
use crate::hash::{default_hash, HashFn, KeyHash};

/// An owned key-value pair stored in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashEntry<K, V> {
    pub key: K,
    pub value: V,
}

/// The entries sharing one slot of the bucket array. Order inside a chain is
/// incidental.
pub type Bucket<K, V> = Vec<HashEntry<K, V>>;

/// A hash table with separate chaining.
///
/// Every key lives in bucket `hash_function(key) % capacity`. The bucket array
/// doubles when a new distinct key is inserted while `size >= capacity`, so
/// the load factor never exceeds 1.0 after an insert. Removal never shrinks
/// the table.
#[derive(Clone)]
pub struct HashTable<K, V>
where
    K: Eq,
{
    size: usize,
    buckets: Vec<Bucket<K, V>>,
    hash_function: HashFn<K>,
}

impl<K, V> HashTable<K, V>
where
    K: KeyHash + Eq,
{
    /// Creates an empty table with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY)
    /// buckets, hashing keys with their [`KeyHash`] implementation.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self::with_hasher(initial_capacity, default_hash::<K>)
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: KeyHash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V>
where
    K: Eq,
{
    pub const DEFAULT_CAPACITY: usize = 10;
    pub const MIN_CAPACITY: usize = 1;

    /// Creates an empty table hashing keys with `hash_function`.
    ///
    /// A capacity below [`MIN_CAPACITY`](Self::MIN_CAPACITY) is raised to it.
    pub fn with_hasher(initial_capacity: usize, hash_function: HashFn<K>) -> Self {
        let capacity: usize = initial_capacity.max(Self::MIN_CAPACITY);
        HashTable {
            size: 0,
            buckets: Self::allocate(capacity),
            hash_function,
        }
    }

    fn allocate(capacity: usize) -> Vec<Bucket<K, V>> {
        std::iter::repeat_with(Vec::new).take(capacity).collect()
    }

    #[inline]
    fn index_for(hash_function: HashFn<K>, key: &K, capacity: usize) -> usize {
        (hash_function(key) % capacity as u64) as usize
    }

    #[inline]
    fn index(&self, key: &K) -> usize {
        Self::index_for(self.hash_function, key, self.capacity())
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Inserts `value` under `key`, overwriting in place if the key is
    /// already present.
    ///
    /// Returns the previous value on overwrite. An overwrite never grows the
    /// table; a new key grows it first when `size >= capacity`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut index: usize = self.index(&key);
        if let Some(entry) = self.buckets[index].iter_mut().find(|e| e.key == key) {
            return Some(mem::replace(&mut entry.value, value));
        }
        if self.size >= self.capacity() {
            self.grow();
            index = self.index(&key);
        }
        self.buckets[index].push(HashEntry { key, value });
        self.size += 1;
        None
    }

    /// Doubles the bucket array and rehashes every entry into it, walking the
    /// old buckets in order and each chain front to back.
    fn grow(&mut self) {
        let now: Instant = Instant::now();
        let old_capacity: usize = self.capacity();
        let new_capacity: usize = old_capacity
            .checked_mul(2)
            .expect("multiplication by 2 overflows a usize");
        let mut buckets: Vec<Bucket<K, V>> = Self::allocate(new_capacity);
        for entry in mem::take(&mut self.buckets).into_iter().flatten() {
            let i: usize = Self::index_for(self.hash_function, &entry.key, new_capacity);
            buckets[i].push(entry);
        }
        self.buckets = buckets;
        debug!(
            "grew hash table from {} to {} buckets ({} entries) in {:?}",
            old_capacity,
            new_capacity,
            self.size,
            now.elapsed()
        );
    }

    pub fn contains(&self, key: &K) -> bool {
        self.buckets[self.index(key)].iter().any(|e| &e.key == key)
    }

    /// Returns the value stored under `key`.
    pub fn get_item(&self, key: &K) -> Result<&V, HashTableError> {
        self.buckets[self.index(key)]
            .iter()
            .find(|e| &e.key == key)
            .map(|e| &e.value)
            .ok_or(HashTableError::KeyNotFound)
    }

    /// Mutates the value stored under `key` in place.
    ///
    /// The mutable borrow is confined to `f`; nothing escapes the table.
    pub fn update<F>(&mut self, key: &K, f: F) -> Result<(), HashTableError>
    where
        F: FnOnce(&mut V),
    {
        let index: usize = self.index(key);
        match self.buckets[index].iter_mut().find(|e| &e.key == key) {
            Some(entry) => {
                f(&mut entry.value);
                Ok(())
            }
            None => Err(HashTableError::KeyNotFound),
        }
    }

    /// Detaches the entry for `key` and hands it back as a pair.
    pub fn remove(&mut self, key: &K) -> Result<(K, V), HashTableError> {
        let index: usize = self.index(key);
        let bucket: &mut Bucket<K, V> = &mut self.buckets[index];
        let position: usize = bucket
            .iter()
            .position(|e| &e.key == key)
            .ok_or(HashTableError::KeyNotFound)?;
        let HashEntry { key, value } = bucket.remove(position);
        self.size -= 1;
        trace!("removed entry from bucket {}", index);
        Ok((key, value))
    }

    /// Every key, bucket-major then chain order. Callers wanting a
    /// meaningful order have to sort.
    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .map(|entry| (&entry.key, &entry.value))
    }

    /// The bucket array, for inspection.
    pub fn contents(&self) -> &[Bucket<K, V>] {
        &self.buckets
    }
}

impl<K, V> Debug for HashTable<K, V>
where
    K: Eq + Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("buckets", &self.buckets)
            .finish()
    }
}
