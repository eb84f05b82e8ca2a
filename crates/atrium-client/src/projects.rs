use serde_json::json;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::types::Project;

impl ApiClient {
    /// List the project catalog. The backend returns bare titles; they are
    /// normalized here, once, into [`Project`] values with 1-based ids.
    pub async fn projects(&self) -> ApiResult<Vec<Project>> {
        let response = self.get("/getProjects", &[]).await?;
        let titles: Vec<String> = response.json().await?;
        Ok(Project::from_titles(titles))
    }

    pub async fn create_project(&self, title: &str) -> ApiResult<()> {
        self.post_json("/createProject", &json!({ "projectTitle": title }))
            .await?;
        info!(title = %title, "Project created");
        Ok(())
    }
}
