//! Context handles handed to the host UI
//!
//! `CartContext` and `TrackingContext` are the only surfaces an
//! embedding application sees; both are built by the storefront root
//! and cannot be conjured up outside it. Cart state fans out over a
//! `tokio::sync::watch` channel so every observer sees every change,
//! including the submitting flag during checkout.

use std::sync::Arc;

use serde_json::{Value, json};
use shared::api::{ContactOutcome, NewsletterOutcome, OrderOutcome};
use shared::cart::{Cart, CartItem, CartTotals, SelectedPlan};
use shared::menu::MenuItem;
use shared::tracking::{EventType, NewsletterSource, PageContext};
use sorrel_client::HttpClient;
use tokio::sync::watch;
use validator::Validate;

use crate::cart::CartService;
use crate::checkout::{CheckoutDraft, CheckoutError};
use crate::store::StoreResult;
use crate::tracking::{ContactForm, SectionObserver, TrackingService};

/// Cart scope: engine operations plus observable state.
///
/// Mutations run through the cart service (read, modify, persist) and
/// are then published on the watch channel. `submit_checkout` is the
/// one orchestrated operation: validate, single-flight guard, submit,
/// clear on acceptance.
pub struct CartContext {
    service: CartService,
    http: HttpClient,
    tracking: Arc<TrackingService>,
    cart_tx: watch::Sender<Cart>,
    submitting_tx: watch::Sender<bool>,
    /// Held for the duration of one checkout submission
    submit_gate: tokio::sync::Mutex<()>,
}

impl CartContext {
    pub(crate) fn new(service: CartService, http: HttpClient, tracking: Arc<TrackingService>) -> Self {
        let (cart_tx, _) = watch::channel(service.cart());
        let (submitting_tx, _) = watch::channel(false);
        Self {
            service,
            http,
            tracking,
            cart_tx,
            submitting_tx,
            submit_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Observe the cart. The receiver always holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart_tx.subscribe()
    }

    /// Observe the checkout submitting flag.
    pub fn submitting(&self) -> watch::Receiver<bool> {
        self.submitting_tx.subscribe()
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Cart {
        self.cart_tx.borrow().clone()
    }

    /// Totals derived from the current cart.
    pub fn totals(&self) -> CartTotals {
        self.cart_tx.borrow().totals()
    }

    /// Look up a cart line by menu item id.
    pub fn item(&self, menu_item_id: &str) -> Option<CartItem> {
        self.cart_tx.borrow().item(menu_item_id).cloned()
    }

    fn publish(&self, cart: Cart) -> Cart {
        self.cart_tx.send_replace(cart.clone());
        cart
    }

    /// Add a menu item (or bump its quantity if already present).
    pub fn add_item(&self, menu_item: &MenuItem, quantity: i32) -> StoreResult<Cart> {
        Ok(self.publish(self.service.add_item(menu_item, quantity)?))
    }

    /// Set a line's quantity exactly; zero or less removes the line.
    pub fn update_quantity(&self, menu_item_id: &str, quantity: i32) -> StoreResult<Cart> {
        Ok(self.publish(self.service.update_quantity(menu_item_id, quantity)?))
    }

    /// Remove a line entirely.
    pub fn remove_item(&self, menu_item_id: &str) -> StoreResult<Cart> {
        Ok(self.publish(self.service.remove_item(menu_item_id)?))
    }

    /// Select a subscription plan (replaces any previous selection).
    pub fn set_plan(&self, plan: SelectedPlan) -> StoreResult<Cart> {
        Ok(self.publish(self.service.set_plan(plan)?))
    }

    /// Empty the cart and erase the persisted record.
    pub fn clear(&self) -> StoreResult<Cart> {
        Ok(self.publish(self.service.clear()?))
    }

    /// Submit the current cart as an order.
    ///
    /// Validation failures and an already-running submission are
    /// reported without any network traffic. An accepted order clears
    /// the cart and emits a `checkout_complete` event; a rejected one
    /// leaves the cart untouched so the customer can retry.
    pub async fn submit_checkout(&self, draft: &CheckoutDraft) -> Result<OrderOutcome, CheckoutError> {
        draft.validate()?;

        let Ok(_guard) = self.submit_gate.try_lock() else {
            return Err(CheckoutError::SubmissionInFlight);
        };

        self.submitting_tx.send_replace(true);

        let cart = self.cart();
        let totals = cart.totals();
        let submission = draft.to_submission(&cart, Some(self.tracking.visitor_id().to_string()));

        let outcome = self.http.submit_order(&submission).await;

        if let OrderOutcome::Accepted { order_id, .. } = &outcome {
            // 下单成功：购物车立即作废
            match self.service.clear() {
                Ok(cleared) => {
                    self.publish(cleared);
                }
                Err(e) => {
                    tracing::error!("Failed to clear cart after accepted order: {}", e);
                }
            }

            let mut data = serde_json::Map::new();
            if let Some(order_id) = order_id {
                data.insert("orderId".to_string(), json!(order_id));
            }
            data.insert("total".to_string(), json!(totals.total));
            self.tracking.track(EventType::CheckoutComplete, Some(Value::Object(data)));
        }

        self.submitting_tx.send_replace(false);
        Ok(outcome)
    }
}

/// Tracking scope: visitor identity, event reporting, and the
/// section-visibility side effect.
pub struct TrackingContext {
    service: Arc<TrackingService>,
    sections: SectionObserver,
}

impl TrackingContext {
    pub(crate) fn new(service: Arc<TrackingService>) -> Self {
        let sections = SectionObserver::new(service.clone());
        Self { service, sections }
    }

    pub fn visitor_id(&self) -> &str {
        self.service.visitor_id()
    }

    pub fn session_id(&self) -> Option<String> {
        self.service.session_id()
    }

    /// Report the launch page; fires the initial `page_view` carrying
    /// UTM, device, and referrer data.
    pub fn init(&self, page: PageContext) {
        self.service.init(page);
    }

    /// Report a navigation to a new page.
    pub fn page_view(&self, page: PageContext) {
        self.service.page_view(page);
    }

    pub fn click(&self, element: &str, data: Option<serde_json::Map<String, Value>>) {
        self.service.click(element, data);
    }

    pub fn menu_view(&self, item_id: &str, item_name: &str) {
        self.service.menu_view(item_id, item_name);
    }

    pub fn plan_select(&self, plan_name: &str, price: f64) {
        self.service.plan_select(plan_name, price);
    }

    pub fn checkout_start(&self, plan_name: Option<&str>, total: f64) {
        self.service.checkout_start(plan_name, total);
    }

    pub fn track(&self, event_type: EventType, data: Option<Value>) {
        self.service.track(event_type, data);
    }

    /// Report a section's visible ratio; crossing 50% on an
    /// allow-listed section fires a `section_view_<id>` click.
    pub fn report_section(&self, section_id: &str, visible_ratio: f64) {
        self.sections.report(section_id, visible_ratio);
    }

    pub async fn identify(
        &self,
        email: &str,
        name: Option<String>,
        phone: Option<String>,
    ) -> Option<String> {
        self.service.identify(email, name, phone).await
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> ContactOutcome {
        self.service.submit_contact(form).await
    }

    pub async fn subscribe_newsletter(
        &self,
        email: &str,
        source: NewsletterSource,
    ) -> NewsletterOutcome {
        self.service.subscribe_newsletter(email, source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use crate::tracking::SessionCache;
    use chrono::{Days, Utc};
    use shared::order::DeliveryWindow;
    use shared::tracking::TrackingEvent;
    use sorrel_client::ClientConfig;
    use tokio::sync::mpsc;

    fn context() -> (CartContext, mpsc::Receiver<TrackingEvent>) {
        let store = LocalStore::open_in_memory().unwrap();
        let http = HttpClient::new(&ClientConfig::default());
        let (tracking, rx) =
            TrackingService::new(http.clone(), "v-ctx".to_string(), SessionCache::default(), 16);
        let context = CartContext::new(CartService::new(store), http, tracking);
        (context, rx)
    }

    fn menu_item(id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: None,
            category: "bowls".to_string(),
            price,
            dietary_tags: vec![],
            image_url: None,
        }
    }

    #[test]
    fn test_mutations_publish_to_watchers() {
        let (context, _rx) = context();
        let mut watcher = context.subscribe();
        assert!(watcher.borrow_and_update().is_empty());

        context.add_item(&menu_item("m1", 12.0), 2).unwrap();
        assert!(watcher.has_changed().unwrap());
        assert_eq!(watcher.borrow_and_update().items[0].quantity, 2);

        context.clear().unwrap();
        assert!(watcher.has_changed().unwrap());
        assert!(watcher.borrow_and_update().is_empty());
    }

    #[test]
    fn test_totals_follow_plan_selection() {
        let (context, _rx) = context();
        context.add_item(&menu_item("m1", 40.0), 2).unwrap();
        context
            .set_plan(SelectedPlan {
                name: "Family Plan".to_string(),
                price: 65.0,
                meals: 10,
            })
            .unwrap();

        let totals = context.totals();
        assert_eq!(totals.subtotal, 80.0);
        assert_eq!(totals.total, 65.0);
        assert_eq!(totals.discount, 15.0);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected_before_any_state_change() {
        let (context, _rx) = context();
        context.add_item(&menu_item("m1", 12.0), 1).unwrap();

        let draft = CheckoutDraft {
            name: String::new(),
            email: "nope".to_string(),
            phone: None,
            delivery_address: String::new(),
            delivery_notes: None,
            neighborhood: None,
            delivery_date: Utc::now().date_naive() + Days::new(3),
            delivery_window: DeliveryWindow::Morning,
            notes: None,
        };

        let err = context.submit_checkout(&draft).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(_)));
        // Nothing flipped, nothing cleared
        assert!(!*context.submitting().borrow());
        assert_eq!(context.cart().items.len(), 1);
    }
}
