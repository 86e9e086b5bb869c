//! Menu Model

use serde::{Deserialize, Serialize};

/// A dish as published by the CRM menu endpoint.
///
/// Cart items embed a full copy of this record so the cart stays
/// renderable even if the menu changes between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Category slug (e.g., "bowls", "salads")
    pub category: String,
    /// Price in currency units
    pub price: f64,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    pub image_url: Option<String>,
}
