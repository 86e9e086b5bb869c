//! Visitor Tracking Types
//!
//! Event payloads for `POST /api/public/events` plus the pure
//! classification helpers the storefront needs when it builds them:
//! UTM capture from a landing URL and coarse device detection from a
//! user-agent string.

use serde::{Deserialize, Serialize};

/// Tracking event taxonomy understood by the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    Click,
    FormSubmit,
    MenuView,
    PlanSelect,
    CheckoutStart,
    CheckoutComplete,
    NewsletterSignup,
    ContactSubmit,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::Click => "click",
            EventType::FormSubmit => "form_submit",
            EventType::MenuView => "menu_view",
            EventType::PlanSelect => "plan_select",
            EventType::CheckoutStart => "checkout_start",
            EventType::CheckoutComplete => "checkout_complete",
            EventType::NewsletterSignup => "newsletter_signup",
            EventType::ContactSubmit => "contact_submit",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a newsletter signup originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsletterSource {
    #[default]
    WebsiteFooter,
    Checkout,
    ContactForm,
}

impl NewsletterSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsletterSource::WebsiteFooter => "website_footer",
            NewsletterSource::Checkout => "checkout",
            NewsletterSource::ContactForm => "contact_form",
        }
    }
}

/// The page a tracking event is attributed to.
///
/// The host application reports this once at startup and again on
/// navigation; events default to the most recently reported page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    pub url: String,
    pub title: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

impl PageContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            referrer: None,
            user_agent: None,
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// One tracking event as posted to the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub visitor_id: String,
    /// Absent until the CRM has granted a session id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_data: Option<serde_json::Value>,
    pub page_url: String,
    pub page_title: String,
}

impl TrackingEvent {
    /// Build an event attributed to the given page. The session id is
    /// stamped later, at send time.
    pub fn new(visitor_id: impl Into<String>, event_type: EventType, page: &PageContext) -> Self {
        Self {
            visitor_id: visitor_id.into(),
            session_id: None,
            event_type,
            event_data: None,
            page_url: page.url.clone(),
            page_title: page.title.clone(),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.event_data = Some(data);
        self
    }
}

/// UTM campaign parameters captured from a landing URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
}

impl UtmParams {
    /// Extract recognized `utm_*` query parameters from a URL.
    ///
    /// Unparseable URLs and empty parameter values yield no fields,
    /// never an error.
    pub fn from_url(url: &str) -> Self {
        let mut params = Self::default();
        let Ok(parsed) = url::Url::parse(url) else {
            return params;
        };

        for (key, value) in parsed.query_pairs() {
            if value.is_empty() {
                continue;
            }
            let value = value.to_string();
            match key.as_ref() {
                "utm_source" => params.utm_source = Some(value),
                "utm_medium" => params.utm_medium = Some(value),
                "utm_campaign" => params.utm_campaign = Some(value),
                "utm_content" => params.utm_content = Some(value),
                "utm_term" => params.utm_term = Some(value),
                _ => {}
            }
        }

        params
    }

    pub fn is_empty(&self) -> bool {
        self.utm_source.is_none()
            && self.utm_medium.is_none()
            && self.utm_campaign.is_none()
            && self.utm_content.is_none()
            && self.utm_term.is_none()
    }

    /// Flatten into event-data fields (camelCase keys, set fields only).
    pub fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        let pairs = [
            ("utmSource", &self.utm_source),
            ("utmMedium", &self.utm_medium),
            ("utmCampaign", &self.utm_campaign),
            ("utmContent", &self.utm_content),
            ("utmTerm", &self.utm_term),
        ];
        for (key, value) in pairs {
            if let Some(v) = value {
                fields.insert(key.to_string(), serde_json::Value::String(v.clone()));
            }
        }
        fields
    }
}

/// Coarse device class derived from the user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

/// Tablet markers, checked before the mobile markers so tablet UAs
/// that also advertise "mobile" or "android" classify as tablets.
const TABLET_PATTERNS: [&str; 4] = ["tablet", "ipad", "playbook", "silk"];

const MOBILE_PATTERNS: [&str; 11] = [
    "mobile",
    "iphone",
    "ipod",
    "android",
    "blackberry",
    "opera",
    "mini",
    "windows ce",
    "palm",
    "smartphone",
    "iemobile",
];

impl DeviceType {
    /// Classify a user-agent string. Unknown or empty strings default
    /// to desktop.
    pub fn classify(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if TABLET_PATTERNS.iter().any(|p| ua.contains(p)) {
            return DeviceType::Tablet;
        }
        if MOBILE_PATTERNS.iter().any(|p| ua.contains(p)) {
            return DeviceType::Mobile;
        }
        DeviceType::Desktop
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}
