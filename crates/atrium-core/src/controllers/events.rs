use crate::models::ChatStatus;

/// Events emitted by the workspace for decoupled rendering.
/// Chat-scoped variants are tagged with `chat_id` so subscribers can
/// filter.
#[derive(Debug, Clone)]
pub enum WorkspaceEvent {
    ProjectSelected { name: String },
    ChatReset { chat_id: u32 },
    HistoryLoaded { chat_id: u32, message_count: usize },
    MessagesAppended { chat_id: u32 },
    StatusChanged { status: ChatStatus },
    CountsUpdated,
}
