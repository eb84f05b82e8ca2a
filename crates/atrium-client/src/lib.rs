//! REST client for the Atrium dashboard backend.
//!
//! All endpoints live on a single credential-bearing backend (cookie-based
//! session). The backend is liberal in what it returns — several endpoints
//! answer with either a bare string or a JSON object — so the response
//! normalizers in [`types`] accept every shape the server is known to emit
//! rather than rejecting unexpected ones.

mod chat;
mod client;
mod documents;
mod error;
mod notes;
mod projects;
mod types;
mod users;

pub use client::{ApiClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use reqwest::StatusCode;
pub use types::{
    HistoryEntry, Language, NewUser, Note, Project, SharedNote, UserRecord,
};
