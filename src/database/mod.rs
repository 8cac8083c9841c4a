//! PocketCSV database layer.
//!
//! SQLite connection management and schema migrations. The only table of
//! interest is `kv_store`, used by
//! [`SqliteKeyValueStore`](crate::services::key_value_store::SqliteKeyValueStore).
//!
//! # Usage
//!
//! ```no_run
//! use pocketcsv::database::Database;
//!
//! let db = Database::open("pocketcsv.db").expect("failed to open database");
//! let conn = db.connection();
//! # let _ = conn;
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
