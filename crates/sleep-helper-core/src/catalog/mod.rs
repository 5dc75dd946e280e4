mod bundled;
mod entry;
pub(crate) mod naming;
mod store;

pub use {
    bundled::bundled_entries,
    entry::{AudioCategory, AudioEntry, AudioSource},
    store::CatalogStore,
};
