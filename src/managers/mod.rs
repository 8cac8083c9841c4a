// PocketCSV state managers
// Managers own mutable state kept in sync with storage.

pub mod bookmark_store;
