//! Backend for the portfolio site's contact form.
//!
//! Exposes `POST /api/contact`, which appends each submission to a JSON
//! document on disk (see [`store`]).

pub mod config;
pub mod http;
pub mod store;

pub use config::ServerConfig;
pub use http::{build_router, AppState};
pub use store::{CorruptStorePolicy, MessageStore, StoreError};
