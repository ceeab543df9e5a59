//! Caller-side collaborators around the inventory metrics domain.
//!
//! Storage is an owner-isolated trait seam with an in-memory implementation;
//! there is no transport or authentication here.

pub mod catalog;
pub mod index;
pub mod read_model;


pub use catalog::{ItemCatalog, Page, PageRequest, Pagination, StoredItem};
pub use index::ItemIndex;
pub use read_model::{InMemoryOwnerStore, OwnerStore};
