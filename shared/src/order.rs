//! Order Submission Types
//!
//! Wire payload for `POST /api/public/orders`. Field names follow the
//! CRM's camelCase contract.

use crate::cart::CartItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer details collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
}

/// Requested delivery window within the delivery day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryWindow {
    #[default]
    Morning,
    Afternoon,
    Evening,
}

/// One ordered line, referencing the menu item by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&CartItem> for OrderItemInput {
    fn from(line: &CartItem) -> Self {
        Self {
            menu_item_id: line.menu_item.id.clone(),
            quantity: line.quantity,
            notes: line.notes.clone(),
        }
    }
}

/// Complete order payload posted to the CRM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub customer: OrderCustomer,
    /// ISO-8601 timestamp of the requested delivery day
    pub delivery_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<DeliveryWindow>,
    pub items: Vec<OrderItemInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Durable visitor id, linking the order to the tracking profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<String>,
}
