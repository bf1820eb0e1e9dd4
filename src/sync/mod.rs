pub mod cleanup;
pub mod enumerator;
pub mod link;
pub mod reconciler;
