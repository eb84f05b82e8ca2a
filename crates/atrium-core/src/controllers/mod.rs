pub mod events;
pub mod workspace;

pub use events::WorkspaceEvent;
pub use workspace::{SyncOptions, Workspace};
