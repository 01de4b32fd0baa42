//! Adapters behind the domain ports.

pub mod gateway;
pub mod in_memory;
pub mod mail;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
