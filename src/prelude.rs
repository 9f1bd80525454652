//! Feira prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartItem},
    catalog::{Catalog, CatalogError, matches_query},
    chat::{
        AssistantError, ChatError, ChatPrompt, ChatRole, ChatState, ChatTurn, ReplyDisposition,
        SellerAssistant, SellerChat,
    },
    fixtures::{Fixture, FixtureError},
    listings::{ListingError, ListingForm, ListingManager},
    navigation::{Capability, Navigation, View},
    orders::{CheckoutError, Order, OrderLedger, OrderStatus},
    products::{Condition, Product, ProductId},
    session::{Credentials, RegistrationForm, Session, User},
    storefront::{Storefront, StorefrontError},
};
