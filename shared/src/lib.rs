//! Shared types for the Sorrel storefront
//!
//! Common types used across crates: menu and cart models, order
//! submission payloads, visitor tracking events, and the CRM wire
//! formats both sides of the HTTP boundary agree on.

pub mod api;
pub mod cart;
pub mod menu;
pub mod order;
pub mod tracking;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use api::{ContactOutcome, NewsletterOutcome, OrderOutcome};
pub use cart::{Cart, CartItem, CartTotals, SelectedPlan};
pub use menu::MenuItem;
pub use order::{DeliveryWindow, OrderCustomer, OrderItemInput, OrderSubmission};
pub use tracking::{DeviceType, EventType, NewsletterSource, PageContext, TrackingEvent, UtmParams};
