mod storage;

pub use storage::FileStorage;
