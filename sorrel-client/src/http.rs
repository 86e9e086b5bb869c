//! HTTP client for network calls against the CRM public API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::api::{
    ContactAck, ContactOutcome, ContactRequest, ErrorBody, EventAck, IdentifyAck, IdentifyRequest,
    MenuResponse, NewsletterAck, NewsletterOutcome, NewsletterRequest, OrderOutcome, OrderReceipt,
};
use shared::menu::MenuItem;
use shared::order::OrderSubmission;
use shared::tracking::TrackingEvent;

/// Message surfaced to the customer when the CRM is unreachable or
/// its response cannot be read.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Fallback rejection messages when the CRM sends no `error` field.
const ORDER_REJECTED_FALLBACK: &str = "Failed to submit order";
const CONTACT_REJECTED_FALLBACK: &str = "Failed to submit form";
const NEWSLETTER_REJECTED_FALLBACK: &str = "Failed to subscribe";

/// HTTP client for making network requests to the CRM
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(Into::into)
    }

    /// POST a form-style request and reduce the response to either a
    /// success body or a user-presentable rejection message.
    ///
    /// Transport failures and unreadable bodies become the generic
    /// network message; a non-success status becomes the CRM's `error`
    /// field (or `fallback` when the CRM sent none). The distinction
    /// survives only in the logs.
    async fn post_outcome<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<serde_json::Value, String> {
        let url = self.url(path);

        let response = match self.client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%url, error = %e, "CRM request failed to send");
                return Err(NETWORK_ERROR_MESSAGE.to_string());
            }
        };

        let status = response.status();
        let value: serde_json::Value = match response.json().await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%url, %status, error = %e, "CRM response body unreadable");
                return Err(NETWORK_ERROR_MESSAGE.to_string());
            }
        };

        if !status.is_success() {
            let message = serde_json::from_value::<ErrorBody>(value)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| fallback.to_string());
            tracing::debug!(%url, %status, %message, "CRM rejected request");
            return Err(message);
        }

        Ok(value)
    }

    // ========== Menu API ==========

    /// Fetch the published menu
    pub async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
        let response: MenuResponse = self.get("api/public/menu").await?;
        Ok(response.items)
    }

    // ========== Orders API ==========

    /// Submit an order. Never fails: every error becomes a rejected
    /// outcome with a message fit for display.
    pub async fn submit_order(&self, order: &OrderSubmission) -> OrderOutcome {
        match self
            .post_outcome("api/public/orders", order, ORDER_REJECTED_FALLBACK)
            .await
        {
            Ok(value) => match serde_json::from_value::<OrderReceipt>(value) {
                Ok(receipt) => OrderOutcome::Accepted {
                    order_id: receipt.order_id,
                    message: receipt.message,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "order receipt unreadable");
                    OrderOutcome::Rejected {
                        message: NETWORK_ERROR_MESSAGE.to_string(),
                    }
                }
            },
            Err(message) => OrderOutcome::Rejected { message },
        }
    }

    // ========== Events API ==========

    /// Post one tracking event
    pub async fn post_event(&self, event: &TrackingEvent) -> ClientResult<EventAck> {
        self.post("api/public/events", event).await
    }

    // ========== Customers API ==========

    /// Link the visitor id to an email address
    pub async fn identify(&self, request: &IdentifyRequest) -> ClientResult<IdentifyAck> {
        self.post("api/public/customers/identify", request).await
    }

    /// Submit the contact form. Same uniform-outcome contract as
    /// [`submit_order`](Self::submit_order).
    pub async fn submit_contact(&self, request: &ContactRequest) -> ContactOutcome {
        match self
            .post_outcome("api/public/contact", request, CONTACT_REJECTED_FALLBACK)
            .await
        {
            Ok(value) => match serde_json::from_value::<ContactAck>(value) {
                Ok(ack) => ContactOutcome::Accepted {
                    message: ack.message,
                    customer_id: ack.customer_id,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "contact ack unreadable");
                    ContactOutcome::Rejected {
                        message: NETWORK_ERROR_MESSAGE.to_string(),
                    }
                }
            },
            Err(message) => ContactOutcome::Rejected { message },
        }
    }

    /// Subscribe an email address to the newsletter.
    pub async fn subscribe_newsletter(&self, request: &NewsletterRequest) -> NewsletterOutcome {
        match self
            .post_outcome("api/public/newsletter", request, NEWSLETTER_REJECTED_FALLBACK)
            .await
        {
            Ok(value) => match serde_json::from_value::<NewsletterAck>(value) {
                Ok(ack) => NewsletterOutcome::Subscribed {
                    message: ack.message,
                    already_subscribed: ack.already_subscribed,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "newsletter ack unreadable");
                    NewsletterOutcome::Rejected {
                        message: NETWORK_ERROR_MESSAGE.to_string(),
                    }
                }
            },
            Err(message) => NewsletterOutcome::Rejected { message },
        }
    }
}
