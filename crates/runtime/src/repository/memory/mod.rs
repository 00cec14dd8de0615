mod storage;

pub use storage::InMemoryStorage;
