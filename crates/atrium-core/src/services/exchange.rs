use atrium_client::{ApiError, Language};
use tracing::{debug, error};

use super::backend::ChatBackend;

/// Bubble text when the backend answers with an empty body.
pub const EMPTY_REPLY_FALLBACK: &str = "No response received";

/// Bubble text for transport-level failures.
pub const TRANSPORT_FAILURE_BUBBLE: &str =
    "Sorry, I couldn't process your request. Please try again.";

/// How one exchange round trip ended. Failures carry both the text shown
/// as a chat bubble and the underlying error for the status line — nothing
/// is thrown to the caller.
#[derive(Debug, Clone)]
pub enum ExchangeOutcome {
    Reply(String),
    Failure { bubble: String, error: String },
}

fn status_bubble(status: u16) -> String {
    format!("Error: {status} - Please try again or check your input.")
}

/// Run one user-submission-to-reply round trip against the inference
/// endpoint. Errors degrade to a visible bubble; this function never
/// fails.
pub async fn run_exchange(
    backend: &dyn ChatBackend,
    language: Language,
    query: &str,
    chat_id: u32,
    project_name: &str,
) -> ExchangeOutcome {
    debug!(chat_id, project = %project_name, ?language, "Dispatching exchange");

    match backend.send_query(language, query, chat_id, project_name).await {
        Ok(reply) => {
            let text = if reply.trim().is_empty() {
                EMPTY_REPLY_FALLBACK.to_string()
            } else {
                reply
            };
            ExchangeOutcome::Reply(text)
        }
        Err(ApiError::Status { status, message }) => {
            error!(chat_id, status = %status, message = %message, "Inference endpoint rejected exchange");
            ExchangeOutcome::Failure {
                bubble: status_bubble(status.as_u16()),
                error: message,
            }
        }
        Err(e) => {
            error!(chat_id, error = %e, "Exchange failed in transit");
            ExchangeOutcome::Failure {
                bubble: TRANSPORT_FAILURE_BUBBLE.to_string(),
                error: e.to_string(),
            }
        }
    }
}
