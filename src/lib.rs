//! Carefinder core: search a dataset of Nigerian healthcare facilities
//! and manage patient medical records.
//!
//! The facility dataset is loaded once from CSV and queried in memory;
//! patient accounts and their records live in SQLite. The UI layer sits
//! on top of this crate and owns all rendering and input collection.

pub mod config;
pub mod facility; // dataset loading + query engine
pub mod models;
pub mod db;
pub mod auth; // credentials, tokens, sessions

pub use auth::AuthError;
pub use db::DatabaseError;
pub use facility::DataFormatError;
