//! Storefront
//!
//! The orchestrator owning every piece of application state: current view,
//! selected product, search query, session, cart, order ledger, seller
//! listings, the seed catalog and the live product chat. User intents flow
//! in through the methods here; derived views (combined catalog, filtered
//! products, totals) are recomputed on read.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{self, Catalog, CatalogError},
    chat::{AssistantError, ChatError, ChatPrompt, ReplyDisposition, SellerAssistant, SellerChat},
    listings::{ListingError, ListingForm, ListingManager},
    navigation::{self, Navigation, View},
    orders::{CheckoutError, Order, OrderLedger},
    products::{Product, ProductId},
    session::{Credentials, RegistrationForm, Session, User},
};

/// Errors surfaced by storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The referenced product is in neither the listings nor the seed
    /// catalog.
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    /// Wrapped cart error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped checkout error.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Wrapped listing error.
    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Storefront
#[derive(Debug)]
pub struct Storefront {
    view: View,
    selected: Option<ProductId>,
    search_query: String,
    session: Session,
    cart: Cart,
    orders: OrderLedger,
    listings: ListingManager,
    seed: Catalog,
    chat: Option<SellerChat>,
    chat_generation: u64,
}

impl Storefront {
    /// Create a storefront with an empty seed catalog.
    pub fn new(currency: &'static Currency) -> Self {
        Storefront {
            view: View::Home,
            selected: None,
            search_query: String::new(),
            session: Session::new(),
            cart: Cart::new(currency),
            orders: OrderLedger::new(),
            listings: ListingManager::new(currency),
            seed: Catalog::new(currency),
            chat: None,
            chat_generation: 0,
        }
    }

    /// Create a storefront with the given seed catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if any seed product is priced in a
    /// currency other than `currency`.
    pub fn with_catalog(
        seed: Vec<Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut storefront = Storefront::new(currency);
        storefront.seed = Catalog::with_products(seed, currency)?;

        Ok(storefront)
    }

    /// The view currently shown.
    pub fn current_view(&self) -> View {
        self.view
    }

    /// Navigate to a view, applying the authorization gate.
    ///
    /// Gated views requested without an active user land on registration
    /// instead; this is a redirect, not an error. The returned outcome tells
    /// the presentation layer where it landed (and that it should reset the
    /// viewport scroll, which every navigation implies).
    pub fn navigate(&mut self, requested: View) -> Navigation {
        let nav = navigation::resolve(requested, self.session.is_authenticated());

        if let Navigation::RedirectedToRegister { requested } = nav {
            debug!(requested = %requested, "redirected unauthenticated navigation to registration");
        }

        self.set_view(nav.view());

        nav
    }

    fn set_view(&mut self, view: View) {
        // Leaving the product view ends its conversation; a reply that
        // arrives afterwards resolves as stale.
        if view != View::Product {
            self.chat = None;
        }

        self.view = view;
    }

    /// Show a product's detail view and open a fresh seller conversation.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] if the id matches neither
    /// a listing nor a seed product.
    pub fn open_product(&mut self, id: &ProductId) -> Result<(), StorefrontError> {
        let product = self
            .find_product(id)
            .cloned()
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;

        self.selected = Some(product.id.clone());
        self.chat_generation = self.chat_generation.wrapping_add(1);
        self.chat = Some(SellerChat::open(&product, self.chat_generation));
        self.view = View::Product;

        Ok(())
    }

    /// The product backing the detail view, if one is selected.
    pub fn selected_product(&self) -> Option<&Product> {
        self.selected.as_ref().and_then(|id| self.find_product(id))
    }

    /// Replace the search query and show the results view.
    pub fn search(&mut self, query: impl Into<String>) -> Navigation {
        self.search_query = query.into();

        self.navigate(View::Search)
    }

    /// The current search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The combined catalog: the seller's own listings first, then the seed
    /// catalog, both in their own insertion order.
    pub fn catalog(&self) -> impl Iterator<Item = &Product> {
        self.listings.listings().iter().chain(self.seed.products())
    }

    /// The combined catalog filtered by the current query. Order is
    /// preserved; there is no ranking.
    pub fn filtered_products(&self) -> Vec<&Product> {
        self.catalog()
            .filter(|product| catalog::matches_query(product, &self.search_query))
            .collect()
    }

    /// Look up a product anywhere in the combined catalog.
    pub fn find_product(&self, id: &ProductId) -> Option<&Product> {
        self.listings.find(id).or_else(|| self.seed.find(id))
    }

    /// Add one unit of a product to the cart, then show the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::UnknownProduct`] for an id outside the
    /// combined catalog, or a wrapped [`CartError`].
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<Navigation, StorefrontError> {
        let product = self
            .find_product(id)
            .cloned()
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;

        self.cart.add(product)?;

        Ok(self.navigate(View::Cart))
    }

    /// Remove a cart line. Removing an absent id is a no-op.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove(id);
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a quantity of zero.
    pub fn set_cart_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<(), CartError> {
        self.cart.set_quantity(id, quantity)
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Total units in the cart (the navbar badge).
    pub fn cart_count(&self) -> u32 {
        self.cart.total_quantity()
    }

    /// Register a new user, make it the active session and go home.
    pub fn register(&mut self, form: RegistrationForm) -> Navigation {
        self.session.register(form);

        self.navigate(View::Home)
    }

    /// Log in (a mock that always succeeds) and go home.
    pub fn login(&mut self, credentials: Credentials) -> Navigation {
        self.session.login(credentials);

        self.navigate(View::Home)
    }

    /// Clear the active session and go home.
    pub fn logout(&mut self) -> Navigation {
        self.session.logout();

        self.navigate(View::Home)
    }

    /// The active user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    /// Create a listing from the sell form, then show the seller dashboard.
    ///
    /// The active user, when present, is recorded as the listing's seller.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`ListingError`] when required fields are missing
    /// or the price does not parse; the listing set is left unchanged.
    pub fn create_listing(&mut self, form: ListingForm) -> Result<ProductId, StorefrontError> {
        let id = self.listings.create(form, self.session.current_user())?;

        self.navigate(View::SellerDashboard);

        Ok(id)
    }

    /// The seller's own listings, most recent first.
    pub fn my_listings(&self) -> &[Product] {
        self.listings.listings()
    }

    /// Convert the cart into a placed order, clear the cart and show the
    /// orders view.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotAuthenticated`] without an active user,
    /// [`CheckoutError::EmptyCart`] for an empty cart; the cart is left
    /// unchanged on error.
    pub fn checkout(&mut self, payment_method: &str) -> Result<Order, StorefrontError> {
        let customer = self
            .session
            .current_user()
            .cloned()
            .ok_or(CheckoutError::NotAuthenticated)?;

        let order = self.orders.place(&self.cart, &customer, payment_method)?;

        self.cart.clear();
        self.navigate(View::Orders);

        Ok(order)
    }

    /// Placed orders, most recent first.
    pub fn orders(&self) -> &[Order] {
        self.orders.orders()
    }

    /// The conversation attached to the current product view, if any.
    pub fn chat(&self) -> Option<&SellerChat> {
        self.chat.as_ref()
    }

    /// Submit a question to the current product's seller conversation and
    /// return the prompt for the assistant call.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NoActiveChat`] outside a product view, plus the
    /// submission errors of [`SellerChat::compose`].
    pub fn compose_question(&mut self, message: &str) -> Result<ChatPrompt, ChatError> {
        self.chat
            .as_mut()
            .ok_or(ChatError::NoActiveChat)?
            .compose(message)
    }

    /// Apply the outcome of an assistant call.
    ///
    /// A prompt whose conversation has been closed or replaced (the user
    /// navigated away while the call was in flight) is discarded as
    /// [`ReplyDisposition::Stale`] and mutates nothing.
    pub fn apply_seller_reply(
        &mut self,
        prompt: &ChatPrompt,
        outcome: Result<String, AssistantError>,
    ) -> ReplyDisposition {
        self.chat
            .as_mut()
            .map_or(ReplyDisposition::Stale, |chat| {
                chat.resolve(prompt, outcome)
            })
    }

    /// Ask the seller assistant about the current product, driving the call
    /// to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] if the message cannot be submitted; assistant
    /// failures become fallback transcript turns, never errors.
    pub async fn ask_seller<A>(
        &mut self,
        assistant: &A,
        message: &str,
    ) -> Result<ReplyDisposition, ChatError>
    where
        A: SellerAssistant + ?Sized,
    {
        let prompt = self.compose_question(message)?;

        let outcome = assistant
            .converse(prompt.product_title(), prompt.message(), prompt.history())
            .await;

        Ok(self.apply_seller_reply(&prompt, outcome))
    }
}
