pub mod chat_store;
pub mod count_store;
pub mod history_store;
pub mod message;
pub mod project;

pub use chat_store::{ChatStatus, ChatStore};
pub use count_store::CountStore;
pub use history_store::HistoryStore;
pub use message::{Message, Sender};
pub use project::ProjectRef;
