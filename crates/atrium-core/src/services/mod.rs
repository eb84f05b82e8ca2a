pub mod backend;
pub mod count_poller;
pub mod exchange;
pub(crate) mod generation;

pub use backend::{BoxFuture, ChatBackend};
pub use exchange::{ExchangeOutcome, run_exchange};
