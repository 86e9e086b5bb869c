//! Checkout draft validation and order payload assembly
//!
//! Validation runs entirely client-side, before any network call.
//! Only a draft that passes becomes an [`OrderSubmission`]; the CRM
//! still has final say and can reject the submitted order.

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use shared::cart::Cart;
use shared::order::{DeliveryWindow, OrderCustomer, OrderItemInput, OrderSubmission};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Days between placing an order and the earliest delivery date.
pub const MIN_DELIVERY_LEAD_DAYS: u64 = 2;

/// Why a checkout attempt never reached the CRM.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The draft failed validation; nothing was sent
    #[error("invalid checkout details: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    /// Another submission from this process is still in flight
    #[error("an order submission is already in flight")]
    SubmissionInFlight,
}

/// Checkout form state as collected from the customer.
#[derive(Debug, Clone, Validate)]
pub struct CheckoutDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Delivery address is required"))]
    pub delivery_address: String,

    pub delivery_notes: Option<String>,

    pub neighborhood: Option<String>,

    /// Requested delivery day, at least [`MIN_DELIVERY_LEAD_DAYS`] out
    #[validate(custom(function = validate_delivery_date))]
    pub delivery_date: NaiveDate,

    pub delivery_window: DeliveryWindow,

    /// Order-level notes passed through to the kitchen
    pub notes: Option<String>,
}

/// Earliest date the checkout form should offer.
pub fn min_delivery_date() -> NaiveDate {
    Utc::now().date_naive() + Days::new(MIN_DELIVERY_LEAD_DAYS)
}

fn validate_delivery_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < min_delivery_date() {
        let mut err = ValidationError::new("delivery_too_soon");
        err.message = Some("Delivery date must be at least 2 days from today".into());
        return Err(err);
    }
    Ok(())
}

impl CheckoutDraft {
    /// Assemble the CRM order payload from this draft and the cart.
    ///
    /// The delivery day is sent as midnight UTC of the chosen date.
    pub fn to_submission(&self, cart: &Cart, visitor_id: Option<String>) -> OrderSubmission {
        OrderSubmission {
            customer: OrderCustomer {
                name: self.name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                delivery_address: self.delivery_address.clone(),
                delivery_notes: self.delivery_notes.clone(),
                neighborhood: self.neighborhood.clone(),
            },
            delivery_date: self.delivery_date.and_time(NaiveTime::MIN).and_utc(),
            delivery_window: Some(self.delivery_window),
            items: cart.items.iter().map(OrderItemInput::from).collect(),
            notes: self.notes.clone(),
            visitor_id,
        }
    }
}
