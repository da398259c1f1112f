pub mod memory_store;
pub mod recommendation;
pub mod store;
