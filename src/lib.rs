//! A separate-chaining hash table with a pluggable hash function, and a text
//! concordance built on top of it.

pub mod concordance;
pub mod error;
pub mod hash;
pub mod hash_table;
pub mod logger;

pub use error::{ConcordanceError, HashTableError};
pub use hash::{word_hash, HashFn, KeyHash};
pub use hash_table::{Bucket, HashEntry, HashTable};
