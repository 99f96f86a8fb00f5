//! Raw Loops REST contract and its reqwest client.
//!
//! [`LoopsApi`] is the wire-level seam: one method per endpoint, payloads
//! exactly as Loops sends them. Domain translation lives in
//! [`super::LoopsContactDirectory`].
//!
//! # Errors
//!
//! - Non-2xx responses become [`LoopsError::Api`] carrying the directory's message
//! - HTTP 429 becomes [`LoopsError::RateLimited`]
//! - Undecodable bodies become [`LoopsError::Decode`]
//!
//! Nothing is retried.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::LoopsConfig;
use crate::domain::subscription::SubscriptionError;

use super::pagination::{Page, PageRequest};
use super::types::{
    ContactProperty, CreateContactRequest, CreatePropertyRequest, ErrorResponse, LoopsContact,
    LoopsMailingList, LoopsTransactionalEmail, MutationResponse, SendTransactionalRequest,
    UpdateContactRequest,
};

/// Errors talking to the Loops API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopsError {
    #[error("Loops request failed: {0}")]
    Http(String),

    #[error("Loops API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Loops rate limit exceeded")]
    RateLimited,

    #[error("Failed to decode Loops response: {0}")]
    Decode(String),

    #[error("Loops client misconfigured: {0}")]
    Configuration(String),
}

impl From<LoopsError> for SubscriptionError {
    fn from(err: LoopsError) -> Self {
        match err {
            LoopsError::Configuration(details) => SubscriptionError::configuration(details),
            other => SubscriptionError::upstream("loops", other.to_string()),
        }
    }
}

/// One method per Loops endpoint used by the service.
#[async_trait]
pub trait LoopsApi: Send + Sync {
    /// `GET contacts/find?email=`
    async fn find_contacts(&self, email: &str) -> Result<Vec<LoopsContact>, LoopsError>;

    /// `POST contacts/create`, returning the new contact id.
    async fn create_contact(&self, request: &CreateContactRequest) -> Result<String, LoopsError>;

    /// `PUT contacts/update`
    async fn update_contact(&self, request: &UpdateContactRequest) -> Result<(), LoopsError>;

    /// `GET lists`, every list including private ones.
    async fn mailing_lists(&self) -> Result<Vec<LoopsMailingList>, LoopsError>;

    /// `GET transactional`, one page.
    async fn transactional_emails(
        &self,
        request: PageRequest,
    ) -> Result<Page<LoopsTransactionalEmail>, LoopsError>;

    /// `POST transactional`
    async fn send_transactional_email(
        &self,
        request: &SendTransactionalRequest,
    ) -> Result<(), LoopsError>;

    /// `GET contacts/properties?list=custom`
    async fn custom_properties(&self) -> Result<Vec<ContactProperty>, LoopsError>;

    /// `POST contacts/properties`
    async fn create_contact_property(
        &self,
        request: &CreatePropertyRequest,
    ) -> Result<(), LoopsError>;
}

/// reqwest-backed [`LoopsApi`].
pub struct LoopsClient {
    api_key: SecretString,
    base_url: String,
    http_client: reqwest::Client,
}

impl LoopsClient {
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LoopsError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoopsError::Configuration(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &LoopsConfig) -> Result<Self, LoopsError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LoopsError::Configuration("Loops API key not defined".to_string()))?;
        Self::new(api_key, config.base_url.clone(), config.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, self.url(path))
            .bearer_auth(self.api_key.expose_secret())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, LoopsError> {
        let response = request
            .send()
            .await
            .map_err(|e| LoopsError::Http(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(operation, "Loops rate limit exceeded");
            return Err(LoopsError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|error| error.message.or(error.error))
                .unwrap_or(body);
            tracing::error!(operation, status = status.as_u16(), error = %message, "Loops request failed");
            return Err(LoopsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LoopsError::Decode(format!("{}: {}", operation, e)))
    }
}

fn ensure_success(operation: &'static str, response: MutationResponse) -> Result<MutationResponse, LoopsError> {
    if response.success {
        Ok(response)
    } else {
        Err(LoopsError::Api {
            status: 200,
            message: response
                .message
                .unwrap_or_else(|| format!("{} was not successful", operation)),
        })
    }
}

#[async_trait]
impl LoopsApi for LoopsClient {
    async fn find_contacts(&self, email: &str) -> Result<Vec<LoopsContact>, LoopsError> {
        let request = self
            .request(reqwest::Method::GET, "contacts/find")
            .query(&[("email", email)]);
        self.send("find_contacts", request).await
    }

    async fn create_contact(&self, request: &CreateContactRequest) -> Result<String, LoopsError> {
        let builder = self
            .request(reqwest::Method::POST, "contacts/create")
            .json(request);
        let response = ensure_success("create_contact", self.send("create_contact", builder).await?)?;
        response
            .id
            .ok_or_else(|| LoopsError::Decode("create_contact: missing contact id".to_string()))
    }

    async fn update_contact(&self, request: &UpdateContactRequest) -> Result<(), LoopsError> {
        let builder = self
            .request(reqwest::Method::PUT, "contacts/update")
            .json(request);
        ensure_success("update_contact", self.send("update_contact", builder).await?)?;
        Ok(())
    }

    async fn mailing_lists(&self) -> Result<Vec<LoopsMailingList>, LoopsError> {
        let request = self.request(reqwest::Method::GET, "lists");
        self.send("mailing_lists", request).await
    }

    async fn transactional_emails(
        &self,
        request: PageRequest,
    ) -> Result<Page<LoopsTransactionalEmail>, LoopsError> {
        let mut builder = self
            .request(reqwest::Method::GET, "transactional")
            .query(&[("perPage", request.per_page.to_string())]);
        if let Some(cursor) = &request.cursor {
            builder = builder.query(&[("cursor", cursor)]);
        }
        self.send("transactional_emails", builder).await
    }

    async fn send_transactional_email(
        &self,
        request: &SendTransactionalRequest,
    ) -> Result<(), LoopsError> {
        let builder = self
            .request(reqwest::Method::POST, "transactional")
            .json(request);
        ensure_success(
            "send_transactional_email",
            self.send("send_transactional_email", builder).await?,
        )?;
        Ok(())
    }

    async fn custom_properties(&self) -> Result<Vec<ContactProperty>, LoopsError> {
        let request = self
            .request(reqwest::Method::GET, "contacts/properties")
            .query(&[("list", "custom")]);
        self.send("custom_properties", request).await
    }

    async fn create_contact_property(
        &self,
        request: &CreatePropertyRequest,
    ) -> Result<(), LoopsError> {
        let builder = self
            .request(reqwest::Method::POST, "contacts/properties")
            .json(request);
        ensure_success(
            "create_contact_property",
            self.send("create_contact_property", builder).await?,
        )?;
        Ok(())
    }
}
