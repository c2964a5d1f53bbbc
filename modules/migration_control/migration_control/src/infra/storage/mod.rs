pub mod memory_weight_store;
pub mod status_file;

pub use memory_weight_store::InMemoryWeightStore;
pub use status_file::{FileStatusStore, InMemoryStatusStore};
