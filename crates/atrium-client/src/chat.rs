use tracing::debug;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::{self, HistoryEntry, Language};

impl ApiClient {
    /// Fetch the persisted question/reply pairs for one chat, in server
    /// order.
    pub async fn chat_history(
        &self,
        chat_id: u32,
        project_name: &str,
    ) -> ApiResult<Vec<HistoryEntry>> {
        let chat_id = chat_id.to_string();
        let response = self
            .get(
                "/chatHistory",
                &[("chatId", chat_id.as_str()), ("projectName", project_name)],
            )
            .await?;

        let entries: Vec<HistoryEntry> = response.json().await?;
        debug!(chat_id = %chat_id, project = %project_name, count = entries.len(), "Chat history fetched");
        Ok(entries)
    }

    /// Fetch per-chat exchange counts for a project, index-aligned to chat
    /// number. Non-numeric entries coerce to 0; a non-array body yields an
    /// empty list.
    pub async fn chat_counts(&self, project_name: &str) -> ApiResult<Vec<u64>> {
        let response = self
            .get("/chatCount", &[("projectName", project_name)])
            .await?;

        let value: serde_json::Value = response.json().await?;
        Ok(types::counts_from_value(&value))
    }

    /// Ask the retrieval-augmented inference endpoint for a reply,
    /// language-selected by path.
    pub async fn rag_query(
        &self,
        language: Language,
        query: &str,
        chat_id: u32,
        project_name: &str,
    ) -> ApiResult<String> {
        let chat_id = chat_id.to_string();
        let response = self
            .get(
                language.rag_path(),
                &[
                    ("query", query),
                    ("chatId", chat_id.as_str()),
                    ("projectName", project_name),
                ],
            )
            .await?;

        let body = response.text().await?;
        Ok(types::reply_from_body(body))
    }
}
