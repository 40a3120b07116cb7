use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashTableError {
    #[error("key not found")]
    KeyNotFound,
}

#[derive(Error, Debug)]
pub enum ConcordanceError {
    #[error("i/o error")]
    Io(#[from] std::io::Error),
    #[error("hash table error")]
    Table(#[from] HashTableError),
}
