//! Client-side core of the Atrium dashboard: typed state stores, history
//! synchronization, chat-count polling and the message exchange loop.
//!
//! Everything here is headless. Rendering subscribes to
//! [`WorkspaceEvent`]s and reads snapshots; all mutations flow through the
//! [`Workspace`] controller.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::{SyncOptions, Workspace, WorkspaceEvent};
pub use models::{ChatStatus, ChatStore, CountStore, HistoryStore, Message, ProjectRef, Sender};
pub use repositories::{JsonSettingsRepository, RepositoryError, Settings, SettingsRepository};
pub use services::{ChatBackend, ExchangeOutcome};

pub use atrium_client::{
    ApiClient, ApiError, BASE_URL_ENV, DEFAULT_BASE_URL, HistoryEntry, Language, Project,
};
