//! Persistence layer: best-effort JSON file mirrors.
//!
//! The cache in memory is authoritative for every read; files under the
//! data directory are write-behind mirrors plus the startup seed for the
//! inventory list and the credential table. A persistence failure is
//! logged by its caller and never fails the triggering operation.

pub mod file_store;
pub mod models;

pub use file_store::{FileStore, load_users};
pub use models::{Item, StoredReading};
