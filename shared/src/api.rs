//! CRM wire types shared between client and callers
//!
//! Response bodies are parsed leniently: the CRM omits fields freely,
//! so everything optional defaults instead of failing the parse.

use crate::menu::MenuItem;
use crate::tracking::NewsletterSource;
use serde::{Deserialize, Serialize};

// ============================================================================
// Response Bodies
// ============================================================================

/// `GET /api/public/menu` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuResponse {
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// `POST /api/public/orders` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// `POST /api/public/events` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAck {
    /// Session id granted by the CRM, present on the first event of a session
    #[serde(default)]
    pub session_id: Option<String>,
}

/// `POST /api/public/customers/identify` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyAck {
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// `POST /api/public/contact` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// `POST /api/public/newsletter` success body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub already_subscribed: bool,
}

/// Error body the CRM returns with non-2xx statuses: `{"error": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// Request Bodies
// ============================================================================

/// `POST /api/public/customers/identify` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    pub visitor_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `POST /api/public/contact` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
}

/// `POST /api/public/newsletter` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    pub email: String,
    pub source: NewsletterSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
}

// ============================================================================
// Uniform Outcomes
// ============================================================================

/// Result of an order submission. Every failure mode collapses into
/// `Rejected` with a user-presentable message; callers never see a
/// transport error directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderOutcome {
    Accepted {
        order_id: Option<String>,
        message: String,
    },
    Rejected {
        message: String,
    },
}

impl OrderOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, OrderOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            OrderOutcome::Accepted { message, .. } => message,
            OrderOutcome::Rejected { message } => message,
        }
    }
}

/// Result of a contact form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactOutcome {
    Accepted {
        message: String,
        customer_id: Option<String>,
    },
    Rejected {
        message: String,
    },
}

impl ContactOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ContactOutcome::Accepted { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ContactOutcome::Accepted { message, .. } => message,
            ContactOutcome::Rejected { message } => message,
        }
    }
}

/// Result of a newsletter subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NewsletterOutcome {
    Subscribed {
        message: String,
        already_subscribed: bool,
    },
    Rejected {
        message: String,
    },
}

impl NewsletterOutcome {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, NewsletterOutcome::Subscribed { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            NewsletterOutcome::Subscribed { message, .. } => message,
            NewsletterOutcome::Rejected { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_parses_with_missing_fields() {
        let receipt: OrderReceipt = serde_json::from_str("{}").unwrap();
        assert!(receipt.order_id.is_none());
        assert_eq!(receipt.message, "");

        let receipt: OrderReceipt =
            serde_json::from_str(r#"{"orderId":"abc123","message":"ok"}"#).unwrap();
        assert_eq!(receipt.order_id.as_deref(), Some("abc123"));
        assert_eq!(receipt.message, "ok");
    }

    #[test]
    fn test_event_ack_session_is_optional() {
        let ack: EventAck = serde_json::from_str("{}").unwrap();
        assert!(ack.session_id.is_none());

        let ack: EventAck = serde_json::from_str(r#"{"sessionId":"s-9"}"#).unwrap();
        assert_eq!(ack.session_id.as_deref(), Some("s-9"));
    }

    #[test]
    fn test_newsletter_ack_defaults_already_subscribed() {
        let ack: NewsletterAck = serde_json::from_str(r#"{"message":"welcome"}"#).unwrap();
        assert!(!ack.already_subscribed);
    }

    #[test]
    fn test_error_body_tolerates_unexpected_shapes() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Invalid address"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("Invalid address"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"nope"}"#).unwrap();
        assert!(body.error.is_none());
    }

    #[test]
    fn test_newsletter_request_omits_absent_visitor() {
        let req = NewsletterRequest {
            email: "a@b.co".to_string(),
            source: NewsletterSource::Checkout,
            visitor_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["source"], "checkout");
        assert!(json.get("visitorId").is_none());
    }
}
