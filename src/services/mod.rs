// PocketCSV services
// Stateless logic (CSV, search, paging), storage backends and settings.

pub mod csv_codec;
pub mod key_value_store;
pub mod paginator;
pub mod query_engine;
pub mod settings_engine;
