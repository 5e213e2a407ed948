//! Cart view rendering and control handling.
//!
//! A view is attached once with an explicit [`RenderMode`] (the host knows
//! which container it mounted, so the mode is resolved at attachment and
//! passed down, never re-detected per repaint). Rendering is whole-cart:
//! every interaction mutates the store and then repaints the full markup,
//! trading efficiency for consistency.
//!
//! All interactive controls funnel through one delegated handler,
//! [`CartView::handle`], rather than one listener per rendered line, so
//! repainting the container never leaks listeners.

use askama::Template;
use elysian_core::{Cart, LineItem, PricingPolicy, Totals, compute_totals};
use rust_decimal::Decimal;

#[allow(unused_imports)]
use crate::filters;

use crate::cart::store::CartStore;
use crate::storage::StorageBackend;

/// Which of the two interchangeable cart layouts a view renders.
///
/// Resolved once per view attachment; a page never mounts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Full line-item layout for the cart page.
    Detailed,
    /// Compact mini layout for the slide-out cart.
    Compact,
}

/// Line item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub size: String,
    pub name: String,
    /// Image URL, empty string when the item has none.
    pub image: String,
    pub qty: u32,
    pub line_total: Decimal,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            size: item.size.clone(),
            name: item.name.clone(),
            image: item.image.clone().unwrap_or_default(),
            qty: item.qty,
            line_total: item.line_total(),
        }
    }
}

/// Cart display data for templates: items plus derived totals.
#[derive(Clone)]
pub struct CartViewModel {
    pub items: Vec<CartItemView>,
    pub totals: Totals,
}

impl CartViewModel {
    /// Project a cart snapshot for display.
    ///
    /// The cart page never applies the student discount; that signal only
    /// exists at checkout.
    #[must_use]
    pub fn from_cart(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            totals: compute_totals(cart.items(), false, policy),
        }
    }

    /// Project a cart snapshot against totals the caller already derived,
    /// for surfaces where the discount signal participates.
    #[must_use]
    pub fn with_totals(cart: &Cart, totals: Totals) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            totals,
        }
    }
}

/// Detailed cart layout template.
#[derive(Template)]
#[template(path = "cart/items.html")]
pub struct CartItemsTemplate {
    pub cart: CartViewModel,
}

/// Compact mini-cart layout template.
#[derive(Template)]
#[template(path = "cart/items_mini.html")]
pub struct CartMiniTemplate {
    pub cart: CartViewModel,
}

/// Cart count badge fragment template; renders nothing at zero.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Capability to ask the user to confirm a removal.
///
/// The production host backs this with a real confirmation dialog; tests
/// substitute canned answers.
pub trait RemovalPrompt {
    /// Whether the user confirmed removing `item`.
    fn confirm(&self, item: &LineItem) -> bool;
}

/// Prompt that always confirms. Useful for hosts without a dialog surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl RemovalPrompt for AlwaysConfirm {
    fn confirm(&self, _item: &LineItem) -> bool {
        true
    }
}

/// A control interaction delegated from the rendered container.
#[derive(Debug, Clone)]
pub enum CartControl {
    /// Quantity stepper `+`.
    Increase { id: String, size: String },
    /// Quantity stepper `-`; never drives quantity below 1.
    Decrease { id: String, size: String },
    /// Direct edit of the quantity input; raw text, clamped when invalid.
    QuantityInput {
        id: String,
        size: String,
        raw: String,
    },
    /// Remove button; guarded by the removal prompt.
    Remove { id: String, size: String },
}

/// One attached cart view: a store projection plus its delegated controls.
pub struct CartView<S, P> {
    mode: RenderMode,
    store: CartStore<S>,
    policy: PricingPolicy,
    prompt: P,
}

impl<S: StorageBackend, P: RemovalPrompt> CartView<S, P> {
    /// Attach a view to a store with a fixed rendering mode.
    pub const fn attach(
        store: CartStore<S>,
        mode: RenderMode,
        policy: PricingPolicy,
        prompt: P,
    ) -> Self {
        Self {
            mode,
            store,
            policy,
            prompt,
        }
    }

    /// The mode this view was attached with.
    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Render the current cart state in this view's layout.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render(&self) -> askama::Result<String> {
        let cart = CartViewModel::from_cart(&self.store.get(), &self.policy);
        match self.mode {
            RenderMode::Detailed => CartItemsTemplate { cart }.render(),
            RenderMode::Compact => CartMiniTemplate { cart }.render(),
        }
    }

    /// Render the header counter badge for the current cart state.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_count_badge(&self) -> askama::Result<String> {
        CartCountTemplate {
            count: self.store.total_quantity(),
        }
        .render()
    }

    /// Handle one delegated control interaction, then repaint.
    ///
    /// Mutations go through the store (and so notify every other
    /// subscriber); the returned markup is this view's full re-render.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn handle(&self, control: CartControl) -> askama::Result<String> {
        match control {
            CartControl::Increase { id, size } => {
                if let Some(line) = self.store.get().find(&id, &size) {
                    let next = i64::from(line.qty).saturating_add(1);
                    self.store.set_quantity(&id, &size, next);
                }
            }
            CartControl::Decrease { id, size } => {
                if let Some(line) = self.store.get().find(&id, &size) {
                    // The stepper floors at 1; removal is its own control.
                    let next = i64::from(line.qty.max(2)) - 1;
                    self.store.set_quantity(&id, &size, next);
                }
            }
            CartControl::QuantityInput { id, size, raw } => {
                let qty = raw.trim().parse::<i64>().unwrap_or(1).max(1);
                self.store.set_quantity(&id, &size, qty);
            }
            CartControl::Remove { id, size } => {
                if let Some(line) = self.store.get().find(&id, &size)
                    && self.prompt.confirm(line)
                {
                    self.store.remove(&id, &size);
                }
            }
        }
        self.render()
    }
}
