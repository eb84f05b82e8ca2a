use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::{self, Note, SharedNote};

impl ApiClient {
    /// Fetch the notes attached to a project, tolerating every body shape
    /// the backend emits (array, single object, double-encoded JSON, bare
    /// text).
    pub async fn notes(&self, project_name: &str) -> ApiResult<Vec<Note>> {
        let response = self
            .get("/getNotes", &[("projectName", project_name)])
            .await?;
        let body = response.text().await?;
        Ok(types::notes_from_body(body))
    }

    /// Replace a project's notes. The backend reads the content from the
    /// query string.
    pub async fn update_notes(&self, notes: &str, project_name: &str) -> ApiResult<()> {
        self.put_query(
            "/updateNotes",
            &[("notes", notes), ("projectName", project_name)],
        )
        .await?;
        Ok(())
    }

    /// Share a project's notes with another user by email.
    pub async fn share_notes(&self, project_name: &str, receiver_email: &str) -> ApiResult<()> {
        self.post_query(
            "/shareNotes",
            &[("projectName", project_name), ("receiverEmail", receiver_email)],
        )
        .await?;
        info!(project = %project_name, "Notes shared");
        Ok(())
    }

    /// Notes other users have shared with the current session.
    pub async fn shared_notes(&self) -> ApiResult<Vec<SharedNote>> {
        let response = self.get("/getSharedNotes", &[]).await?;
        let value: serde_json::Value = response.json().await?;
        let notes = match value.as_array() {
            Some(items) => items.iter().map(types::shared_note_from_value).collect(),
            None => Vec::new(),
        };
        Ok(notes)
    }
}
