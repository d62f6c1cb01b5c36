//! Record Store Client
//!
//! The single write path of the system: append-only inserts of location
//! records into the `locations` collection of a remote document store.

pub mod http;
pub mod memory;
pub mod redis;
pub mod store;

pub use self::http::HttpRecordStore;
pub use self::memory::MemoryRecordStore;
pub use self::redis::RedisRecordStore;
pub use self::store::{RecordId, RecordStore, StoreError};
