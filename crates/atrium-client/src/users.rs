use serde_json::json;
use tracing::info;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{self, NewUser, UserRecord};

impl ApiClient {
    /// Display name of the current session's user.
    ///
    /// A 401 means an unauthenticated (guest) session and maps to
    /// `Ok(None)` — never an error, so rendering can degrade instead of
    /// halting.
    pub async fn user_name(&self) -> ApiResult<Option<String>> {
        let response = match self.get("/userName", &[]).await {
            Ok(response) => response,
            Err(e) if e.is_unauthorized() => return Ok(None),
            Err(e) => return Err(e),
        };

        let value: serde_json::Value = response.json().await?;
        Ok(types::display_name_from_value(&value))
    }

    pub async fn user_login(&self, email: &str, password: &str) -> ApiResult<()> {
        self.post_json("/userLogin", &json!({ "email": email, "password": password }))
            .await?;
        info!(email = %email, "User login succeeded");
        Ok(())
    }

    pub async fn admin_login(&self, email: &str, password: &str) -> ApiResult<()> {
        self.post_json("/adminLogin", &json!({ "email": email, "password": password }))
            .await?;
        info!(email = %email, "Admin login succeeded");
        Ok(())
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.get("/logout", &[]).await?;
        info!("Session logged out");
        Ok(())
    }

    /// All users, with the backend's historical field namings normalized
    /// into a single record shape.
    pub async fn all_users(&self) -> ApiResult<Vec<UserRecord>> {
        let response = self.get("/getAllUsers", &[]).await?;
        let value: serde_json::Value = response.json().await?;
        let users = value
            .as_array()
            .ok_or_else(|| ApiError::Parse("expected a user array".to_string()))?
            .iter()
            .map(UserRecord::from_value)
            .collect();
        Ok(users)
    }

    pub async fn roles(&self) -> ApiResult<Vec<String>> {
        let response = self.get("/getRoles", &[]).await?;
        let value: serde_json::Value = response.json().await?;
        Ok(types::labels_from_value(&value))
    }

    pub async fn teams(&self) -> ApiResult<Vec<String>> {
        let response = self.get("/getTeams", &[]).await?;
        let value: serde_json::Value = response.json().await?;
        Ok(types::labels_from_value(&value))
    }

    pub async fn add_user(&self, user: &NewUser) -> ApiResult<()> {
        self.post_json("/addUser", user).await?;
        info!(email = %user.email, "User added");
        Ok(())
    }

    /// Relay a message as email through the backend.
    pub async fn send_email(&self, email_id: &str, subject: &str, body: &str) -> ApiResult<()> {
        self.post_query(
            "/send-email",
            &[("emailId", email_id), ("subject", subject), ("body", body)],
        )
        .await?;
        info!(recipient = %email_id, "Email relayed");
        Ok(())
    }
}
