#[cfg(feature = "rocksdb")]
pub mod db;
