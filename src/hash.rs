/// A hash function as stored by a [`HashTable`](crate::hash_table::HashTable).
///
/// It must be deterministic: the same key has to produce the same value on
/// every call, otherwise entries become unreachable.
pub type HashFn<K> = fn(&K) -> u64;

/// The multiplier for Fibonacci hashing, equal to 2^64 divided by the golden ratio.
///
/// The golden ratio can be calculated with Python 3 using the following statements:
///
/// ```text
/// from decimal import Decimal
/// golden_ratio = Decimal((Decimal(1.0) + Decimal.sqrt(Decimal(5.0)))/ Decimal(2.0))
/// golden_ratio
/// 1.618033988749894848204586834
/// ```
///
/// For 64-bit values use 2^64 / golden_ratio = 11400714819323198486
pub const HASH_MULTIPLIER: u64 = 11400714819323198486;

/// Seed of the DJBX33A family of string hashes.
pub const DJB_SEED: u64 = 5381;

/// Number of leading characters considered by [`word_hash`].
pub const WORD_PREFIX: usize = 8;

/// The default hash of a key type.
///
/// Every key type a table is created for without an explicit hash function
/// has to say how it hashes; nothing falls back to object identity.
pub trait KeyHash {
    fn key_hash(&self) -> u64;
}

#[inline]
fn fibonacci(key: u64) -> u64 {
    key.wrapping_mul(HASH_MULTIPLIER)
}

macro_rules! fibonacci_key_hash {
    ($($t:ty),*) => {
        $(
            impl KeyHash for $t {
                #[inline]
                fn key_hash(&self) -> u64 {
                    fibonacci(*self as u64)
                }
            }
        )*
    };
}

fibonacci_key_hash!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl KeyHash for char {
    #[inline]
    fn key_hash(&self) -> u64 {
        fibonacci(u64::from(*self))
    }
}

impl KeyHash for bool {
    #[inline]
    fn key_hash(&self) -> u64 {
        fibonacci(u64::from(*self))
    }
}

impl KeyHash for str {
    /// Classic incremental DJBX33A over the UTF-8 bytes, wrapping on overflow.
    fn key_hash(&self) -> u64 {
        self.bytes().fold(DJB_SEED, |h, b| {
            h.wrapping_mul(33).wrapping_add(u64::from(b))
        })
    }
}

impl KeyHash for String {
    #[inline]
    fn key_hash(&self) -> u64 {
        self.as_str().key_hash()
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    #[inline]
    fn key_hash(&self) -> u64 {
        (**self).key_hash()
    }
}

/// Adapter turning [`KeyHash`] into a [`HashFn`].
pub fn default_hash<K: KeyHash>(key: &K) -> u64 {
    key.key_hash()
}

/// Closed-form DJBX33A over at most the first [`WORD_PREFIX`] characters.
///
/// For an effective length `n = min(len, 8)`:
///
/// ```text
/// hash = 5381 * 33^n + sum(codepoint(s[i]) * 33^(n - 1 - i))
/// ```
///
/// Long words cost no more than eight characters. The largest possible value,
/// eight copies of U+10FFFF, stays well inside `u64`.
pub fn word_hash(word: &str) -> u64 {
    let prefix: Vec<u64> = word.chars().take(WORD_PREFIX).map(u64::from).collect();
    let n = prefix.len() as u32;
    let sum: u64 = prefix
        .iter()
        .enumerate()
        .map(|(i, c)| c * 33u64.pow(n - 1 - i as u32))
        .sum();
    DJB_SEED * 33u64.pow(n) + sum
}
