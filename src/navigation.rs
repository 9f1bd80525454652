//! Navigation
//!
//! The single current-view selector and its authorization gate. The gate is a
//! declarative capability table: each view names the capability it requires,
//! and [`resolve`] checks it in one place. An unauthenticated attempt to
//! reach a restricted view is a redirect to registration, never an error.

use std::fmt;

/// The closed set of views the storefront can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Landing page with the combined catalog.
    Home,

    /// Detail page for the selected product.
    Product,

    /// The cart contents.
    Cart,

    /// The new-listing form.
    Sell,

    /// Search results for the current query.
    Search,

    /// Registration form, also the redirect target for gated views.
    Register,

    /// Login form.
    Login,

    /// The seller's own listings.
    SellerDashboard,

    /// Payment and shipping confirmation.
    Checkout,

    /// Placed orders, most recent first.
    Orders,
}

impl View {
    /// The capability required to show this view.
    #[must_use]
    pub fn required_capability(self) -> Capability {
        match self {
            View::Sell | View::SellerDashboard | View::Checkout => Capability::Authenticated,
            _ => Capability::Public,
        }
    }

    /// Stable label used in logs and route-like identifiers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Product => "product",
            View::Cart => "cart",
            View::Sell => "sell",
            View::Search => "search",
            View::Register => "register",
            View::Login => "login",
            View::SellerDashboard => "dashboard-seller",
            View::Checkout => "checkout",
            View::Orders => "orders",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a view requires of the session before it can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Shown to anyone.
    Public,

    /// Requires an active user.
    Authenticated,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The requested view became current.
    Shown(View),

    /// The requested view was gated; registration became current instead.
    RedirectedToRegister {
        /// The view that was originally requested.
        requested: View,
    },
}

impl Navigation {
    /// The view that actually became current.
    #[must_use]
    pub fn view(self) -> View {
        match self {
            Navigation::Shown(view) => view,
            Navigation::RedirectedToRegister { .. } => View::Register,
        }
    }

    /// Whether the request was redirected.
    #[must_use]
    pub fn is_redirect(self) -> bool {
        matches!(self, Navigation::RedirectedToRegister { .. })
    }
}

/// Decide where a navigation request actually lands.
#[must_use]
pub fn resolve(requested: View, authenticated: bool) -> Navigation {
    match requested.required_capability() {
        Capability::Authenticated if !authenticated => {
            Navigation::RedirectedToRegister { requested }
        }
        Capability::Public | Capability::Authenticated => Navigation::Shown(requested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATED: [View; 3] = [View::Sell, View::SellerDashboard, View::Checkout];

    #[test]
    fn gated_views_require_authentication() {
        for view in GATED {
            assert_eq!(
                view.required_capability(),
                Capability::Authenticated,
                "{view} should be gated"
            );
        }
    }

    #[test]
    fn public_views_require_nothing() {
        for view in [
            View::Home,
            View::Product,
            View::Cart,
            View::Search,
            View::Register,
            View::Login,
            View::Orders,
        ] {
            assert_eq!(
                view.required_capability(),
                Capability::Public,
                "{view} should be public"
            );
        }
    }

    #[test]
    fn unauthenticated_gated_navigation_redirects_to_register() {
        for view in GATED {
            let nav = resolve(view, false);

            assert_eq!(nav, Navigation::RedirectedToRegister { requested: view });
            assert_eq!(nav.view(), View::Register);
            assert!(nav.is_redirect());
        }
    }

    #[test]
    fn authenticated_gated_navigation_is_shown() {
        for view in GATED {
            let nav = resolve(view, true);

            assert_eq!(nav, Navigation::Shown(view));
            assert_eq!(nav.view(), view);
            assert!(!nav.is_redirect());
        }
    }

    #[test]
    fn public_navigation_is_shown_either_way() {
        for authenticated in [false, true] {
            let nav = resolve(View::Cart, authenticated);

            assert_eq!(nav.view(), View::Cart);
        }
    }

    #[test]
    fn view_labels_are_stable() {
        assert_eq!(View::SellerDashboard.as_str(), "dashboard-seller");
        assert_eq!(View::Home.to_string(), "home");
    }
}
