//! Cart service: load-modify-persist cycles over the local store
//!
//! Every mutation reloads the persisted cart, applies one change, and
//! writes the result back before returning it. The store is the only
//! source of truth: two services sharing a store (or two processes
//! sharing a database file) see each other's writes on their next
//! operation, last writer wins.

use crate::store::{LocalStore, StoreResult};
use parking_lot::Mutex;
use shared::cart::{Cart, CartItem, CartTotals, SelectedPlan};
use shared::menu::MenuItem;

/// Cart operations over a [`LocalStore`].
pub struct CartService {
    store: LocalStore,
    /// Serializes load-modify-save cycles within this process
    write_lock: Mutex<()>,
}

impl CartService {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Current cart as persisted.
    pub fn cart(&self) -> Cart {
        self.store.load_cart()
    }

    /// Derived totals for the current cart.
    pub fn totals(&self) -> CartTotals {
        self.store.load_cart().totals()
    }

    /// Look up a cart line by menu item id.
    pub fn item(&self, menu_item_id: &str) -> Option<CartItem> {
        self.store.load_cart().item(menu_item_id).cloned()
    }

    /// Add `quantity` of a menu item, merging with an existing line.
    pub fn add_item(&self, menu_item: &MenuItem, quantity: i32) -> StoreResult<Cart> {
        let _guard = self.write_lock.lock();
        let mut cart = self.store.load_cart();
        cart.add_item(menu_item, quantity);
        self.store.save_cart(&cart)?;
        Ok(cart)
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// An unknown menu item id leaves the cart untouched (nothing is
    /// written) and returns the cart as-is.
    pub fn update_quantity(&self, menu_item_id: &str, quantity: i32) -> StoreResult<Cart> {
        let _guard = self.write_lock.lock();
        let mut cart = self.store.load_cart();
        if cart.update_quantity(menu_item_id, quantity) {
            self.store.save_cart(&cart)?;
        }
        Ok(cart)
    }

    /// Remove a line entirely.
    pub fn remove_item(&self, menu_item_id: &str) -> StoreResult<Cart> {
        self.update_quantity(menu_item_id, 0)
    }

    /// Replace the selected plan, leaving item lines untouched.
    pub fn set_plan(&self, plan: SelectedPlan) -> StoreResult<Cart> {
        let _guard = self.write_lock.lock();
        let mut cart = self.store.load_cart();
        cart.set_plan(plan);
        self.store.save_cart(&cart)?;
        Ok(cart)
    }

    /// Drop the persisted cart, returning the empty state.
    pub fn clear(&self) -> StoreResult<Cart> {
        let _guard = self.write_lock.lock();
        self.store.clear_cart()?;
        Ok(Cart::empty())
    }
}
