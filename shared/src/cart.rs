//! Cart Model
//!
//! Pure cart state and the mutations the storefront applies to it.
//! Persistence and change notification live in `sorrel-storefront`;
//! everything here is side-effect free so it can be unit tested
//! without touching storage.

use crate::menu::MenuItem;
use serde::{Deserialize, Serialize};

/// A single cart line: an embedded menu item snapshot plus quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_item: MenuItem,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Meal plan attached to the cart (overrides itemized pricing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedPlan {
    pub name: String,
    /// Flat plan price in currency units
    pub price: f64,
    /// Meals per week included in the plan
    pub meals: i32,
}

/// The cart as persisted: item lines plus an optional selected plan.
///
/// This is exactly the JSON blob written to local storage, so field
/// names follow the storefront wire convention (camelCase).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_plan: Option<SelectedPlan>,
}

/// Derived cart totals. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line quantities
    pub item_count: i32,
    /// Sum of `price * quantity` over all lines
    pub subtotal: f64,
    /// Itemized value covered by the plan (0 with no plan)
    pub discount: f64,
    /// Amount the customer pays
    pub total: f64,
}

impl Cart {
    /// Empty cart, the state every visitor starts from.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.selected_plan.is_none()
    }

    /// Add `quantity` of a menu item. If a line for the same menu item
    /// id already exists its quantity is increased, otherwise a new
    /// line is appended at the end.
    pub fn add_item(&mut self, menu_item: &MenuItem, quantity: i32) {
        match self.items.iter_mut().find(|i| i.menu_item.id == menu_item.id) {
            Some(line) => line.quantity += quantity,
            None => self.items.push(CartItem {
                menu_item: menu_item.clone(),
                quantity,
                notes: None,
            }),
        }
    }

    /// Set the quantity of an existing line. A quantity of zero or
    /// less removes the line; the relative order of the remaining
    /// lines is preserved.
    ///
    /// Returns `false` when no line matches `menu_item_id`, in which
    /// case the cart is unchanged.
    pub fn update_quantity(&mut self, menu_item_id: &str, quantity: i32) -> bool {
        let Some(index) = self.items.iter().position(|i| i.menu_item.id == menu_item_id) else {
            return false;
        };

        if quantity <= 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = quantity;
        }
        true
    }

    /// Remove a line entirely. Equivalent to setting its quantity to zero.
    pub fn remove_item(&mut self, menu_item_id: &str) -> bool {
        self.update_quantity(menu_item_id, 0)
    }

    /// Replace the selected plan. Item lines are untouched.
    pub fn set_plan(&mut self, plan: SelectedPlan) {
        self.selected_plan = Some(plan);
    }

    /// Look up a line by menu item id.
    pub fn item(&self, menu_item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.menu_item.id == menu_item_id)
    }

    /// Compute derived totals.
    ///
    /// With a plan selected the plan price replaces the itemized
    /// subtotal as the amount due, and the covered subtotal is
    /// reported as the discount (clamped at zero so an underfilled
    /// plan never shows a negative discount).
    pub fn totals(&self) -> CartTotals {
        let item_count = self.items.iter().map(|i| i.quantity).sum();
        let subtotal: f64 = self
            .items
            .iter()
            .map(|i| i.menu_item.price * i.quantity as f64)
            .sum();

        let (total, discount) = match &self.selected_plan {
            Some(plan) => (plan.price, (subtotal - plan.price).max(0.0)),
            None => (subtotal, 0.0),
        };

        CartTotals {
            item_count,
            subtotal,
            discount,
            total,
        }
    }
}
