use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

/// Upload ceiling enforced client-side, matching the backend's limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

impl ApiClient {
    /// List document file names for a project.
    pub async fn documents(&self, project_name: &str) -> ApiResult<Vec<String>> {
        let response = self
            .get("/getDocuments", &[("projectName", project_name)])
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete_document(&self, file_name: &str, project_name: &str) -> ApiResult<()> {
        self.delete(
            "/delete",
            &[("fileName", file_name), ("projectName", project_name)],
        )
        .await?;
        info!(file = %file_name, project = %project_name, "Document deleted");
        Ok(())
    }

    /// Upload one PDF as multipart form data (field name `file`).
    ///
    /// Validation happens before any bytes leave the client: only `.pdf`
    /// files up to 10 MB are accepted.
    pub async fn upload_document(
        &self,
        project_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<()> {
        if !file_name.to_lowercase().ends_with(".pdf") {
            return Err(ApiError::InvalidUpload(
                "Invalid file type. Please upload PDF files only.".to_string(),
            ));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::InvalidUpload(
                "File size exceeds 10MB limit.".to_string(),
            ));
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let form = Form::new().part("file", part);

        self.post_multipart("/upload", &[("projectName", project_name)], form)
            .await?;
        info!(file = %file_name, project = %project_name, "Document uploaded");
        Ok(())
    }
}
