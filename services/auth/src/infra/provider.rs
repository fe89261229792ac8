use anyhow::Context as _;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use ancora_domain::pagination::PageRequest;

use crate::domain::repository::{CreateIdentityOutcome, IdentityProviderPort, ProviderIdentity};
use crate::error::AuthServiceError;

/// Identity provider admin API over HTTP.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    pub http: Client,
    pub base_url: String,
    pub api_key: String,
}

#[derive(Deserialize)]
struct IdentityBody {
    id: Uuid,
    email: String,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Deserialize)]
struct IdentityListBody {
    #[serde(default)]
    users: Vec<IdentityBody>,
}

impl From<IdentityBody> for ProviderIdentity {
    fn from(body: IdentityBody) -> Self {
        Self {
            id: body.id,
            email: body.email,
            email_verified: body.email_verified,
        }
    }
}

impl IdentityProviderPort for HttpIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreateIdentityOutcome, AuthServiceError> {
        let response = self
            .http
            .post(format!("{}/admin/users", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "email_confirm": false,
            }))
            .send()
            .await
            .context("identity provider create request")?;

        match response.status() {
            status if status.is_success() => {
                let body: IdentityBody = response
                    .json()
                    .await
                    .context("identity provider create response body")?;
                Ok(CreateIdentityOutcome::Created(body.into()))
            }
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                Ok(CreateIdentityOutcome::EmailExists)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow::anyhow!("identity provider create failed: {status}: {body}").into())
            }
        }
    }

    async fn list_identities(
        &self,
        page: PageRequest,
    ) -> Result<Vec<ProviderIdentity>, AuthServiceError> {
        let page = page.clamped();
        let response = self
            .http
            .get(format!("{}/admin/users", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("page", page.page), ("per_page", page.per_page)])
            .send()
            .await
            .context("identity provider list request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("identity provider list failed: {status}: {body}").into());
        }

        let body: IdentityListBody = response
            .json()
            .await
            .context("identity provider list response body")?;
        Ok(body.users.into_iter().map(Into::into).collect())
    }
}
