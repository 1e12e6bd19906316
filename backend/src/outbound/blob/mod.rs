//! Blob storage outbound adapters.

mod fs_store;

pub use fs_store::FsBlobStore;
