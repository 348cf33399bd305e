//! Typed HTTP client for the procurement API.
//!
//! Used by front-end proxies and integration tooling. Transient failures
//! are retried with exponential backoff.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreateMaterialRequest, LoginRequest, LoginResponse, MaterialRequest, Notification, Offer,
    Profile, SubmitOfferRequest,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response could not be decoded: {0}")]
    Decode(String),
}

impl ClientError {
    /// Connect and timeout failures, 408, 429 and 5xx are worth another try.
    /// Every other 4xx is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Status { status, .. } => {
                *status == StatusCode::REQUEST_TIMEOUT
                    || *status == StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error()
            }
            Self::Decode(_) => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// RetryPolicy
///
/// Delay before retry `n` is `base_delay * 2^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_max_times(self.max_retries)
    }
}

/// ProcurementClient
///
/// Holds the base URL and, after `login`, the bearer token sent with every call.
#[derive(Debug, Clone)]
pub struct ProcurementClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl ProcurementClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let (url, method) = (&url, &method);

        let attempt = || async move {
            let mut req = self.http.request(method.clone(), url);
            if let Some(token) = &self.token {
                req = req.bearer_auth(token);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            let resp = req.send().await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ClientError::Status { status, body });
            }
            resp.json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()))
        };

        attempt
            .retry(self.retry.backoff())
            .sleep(tokio::time::sleep)
            .when(ClientError::is_retryable)
            .notify(|err: &ClientError, delay: Duration| {
                tracing::debug!(
                    %url,
                    backoff_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after backoff"
                );
            })
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// Logs in and keeps the issued token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.post("/auth/login", &payload).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    pub async fn me(&self) -> Result<Profile, ClientError> {
        self.get("/me").await
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.get("/notifications").await
    }

    pub async fn list_my_requests(&self) -> Result<Vec<MaterialRequest>, ClientError> {
        self.get("/employee/requests").await
    }

    pub async fn create_request(
        &self,
        request: &CreateMaterialRequest,
    ) -> Result<MaterialRequest, ClientError> {
        self.post("/employee/requests", request).await
    }

    pub async fn list_open_requests(&self) -> Result<Vec<MaterialRequest>, ClientError> {
        self.get("/supplier/requests").await
    }

    pub async fn submit_offer(
        &self,
        request_id: Uuid,
        offer: &SubmitOfferRequest,
    ) -> Result<Offer, ClientError> {
        self.post(&format!("/supplier/requests/{request_id}/offers"), offer)
            .await
    }
}
