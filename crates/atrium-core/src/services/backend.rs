//! Backend abstraction for the synchronization layer.
//!
//! The stores and services talk to the dashboard backend through this
//! trait rather than [`ApiClient`] directly, so tests can script responses
//! without a network.

use std::future::Future;
use std::pin::Pin;

use atrium_client::{ApiClient, ApiResult, HistoryEntry, Language};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The three backend calls the chat core depends on.
///
/// Object-safe; used as `Arc<dyn ChatBackend>`.
pub trait ChatBackend: Send + Sync + 'static {
    /// Persisted question/reply pairs for one (chat, project) pair.
    fn fetch_history(
        &self,
        chat_id: u32,
        project_name: &str,
    ) -> BoxFuture<'static, ApiResult<Vec<HistoryEntry>>>;

    /// Per-chat exchange counts for a project.
    fn fetch_counts(&self, project_name: &str) -> BoxFuture<'static, ApiResult<Vec<u64>>>;

    /// One inference round trip.
    fn send_query(
        &self,
        language: Language,
        query: &str,
        chat_id: u32,
        project_name: &str,
    ) -> BoxFuture<'static, ApiResult<String>>;
}

impl ChatBackend for ApiClient {
    fn fetch_history(
        &self,
        chat_id: u32,
        project_name: &str,
    ) -> BoxFuture<'static, ApiResult<Vec<HistoryEntry>>> {
        let client = self.clone();
        let project_name = project_name.to_string();
        Box::pin(async move { client.chat_history(chat_id, &project_name).await })
    }

    fn fetch_counts(&self, project_name: &str) -> BoxFuture<'static, ApiResult<Vec<u64>>> {
        let client = self.clone();
        let project_name = project_name.to_string();
        Box::pin(async move { client.chat_counts(&project_name).await })
    }

    fn send_query(
        &self,
        language: Language,
        query: &str,
        chat_id: u32,
        project_name: &str,
    ) -> BoxFuture<'static, ApiResult<String>> {
        let client = self.clone();
        let query = query.to_string();
        let project_name = project_name.to_string();
        Box::pin(async move {
            client
                .rag_query(language, &query, chat_id, &project_name)
                .await
        })
    }
}
