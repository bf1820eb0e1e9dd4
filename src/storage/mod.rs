pub mod checkpoint;
pub mod segment_store;
pub mod sidecar;
