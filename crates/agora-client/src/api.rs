use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use agora_types::api::{
    BanRequest, BanResponse, CreateReportRequest, CreateTopicRequest, CreateUserRequest,
    ErrorBody, Snapshot,
};
use agora_types::models::{Report, Topic, User};

use crate::error::ClientError;

/// Thin typed wrapper over the forum's JSON API.
pub struct ForumClient {
    http: Client,
    base_url: String,
}

impl ForumClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub async fn snapshot(&self) -> Result<Snapshot, ClientError> {
        self.get("/api/data").await
    }

    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/api/users").await
    }

    pub async fn register(
        &self,
        username: &str,
        avatar: Option<&str>,
    ) -> Result<User, ClientError> {
        let body = CreateUserRequest {
            username: username.to_string(),
            avatar: avatar.map(str::to_string),
        };
        self.post("/api/users", &body).await
    }

    pub async fn create_topic(&self, req: &CreateTopicRequest) -> Result<Topic, ClientError> {
        self.post("/api/topics", req).await
    }

    pub async fn report(&self, req: &CreateReportRequest) -> Result<Report, ClientError> {
        self.post("/api/reports", req).await
    }

    pub async fn ban(&self, user_id: &str) -> Result<BanResponse, ClientError> {
        let body = BanRequest { user_id: user_id.to_string() };
        self.post("/api/admin/ban", &body).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!("GET {}{}", self.base_url, path);
        let resp = self.http.get(format!("{}{}", self.base_url, path)).send().await?;
        decode(resp).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug!("POST {}{}", self.base_url, path);
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };
    Err(ClientError::Api { status: status.as_u16(), message })
}
