//! Storefront Session Example
//!
//! This example walks a scripted shopping session through the storefront
//! core: browse the seed catalog, bounce off the checkout gate, log in,
//! search, chat with the seller assistant, fill the cart and place an order.
//!
//! Use `-c` to load a catalog fixture by name
//! Use `-q` to change the search query
//! Use `-p` to change the recorded payment method

use std::io;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use feira::{
    chat::{AssistantError, ChatTurn, SellerAssistant},
    fixtures::Fixture,
    navigation::View,
    session::Credentials,
    utils::DemoSessionArgs,
};

/// Canned assistant so the walkthrough runs offline.
#[derive(Debug)]
struct CannedAssistant;

#[async_trait]
impl SellerAssistant for CannedAssistant {
    async fn converse(
        &self,
        product_title: &str,
        message: &str,
        _history: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        Ok(format!(
            "Sobre \"{product_title}\": {message} Pode comprar tranquilo, respondo rápido!"
        ))
    }
}

/// Storefront walkthrough
#[expect(clippy::print_stdout, reason = "Example code")]
#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = DemoSessionArgs::parse();

    let mut store = Fixture::new().storefront(&args.catalog)?;

    println!("Catalog ({} products):", store.catalog().count());
    for product in store.catalog() {
        println!("  {} — {}", product.title, product.price);
    }

    let gate = store.navigate(View::Checkout);
    println!(
        "\nCheckout before login landed on: {} (redirect: {})",
        gate.view(),
        gate.is_redirect()
    );

    store.login(Credentials {
        email: "demo@feira.dev".to_string(),
        password: "qualquer".to_string(),
    });

    store.search(args.query.clone());
    println!("\nResults for {:?}:", args.query);
    for product in store.filtered_products() {
        println!("  {} — {}", product.title, product.price);
    }

    let picked = store
        .filtered_products()
        .first()
        .map(|product| product.id.clone());

    if let Some(id) = picked {
        store.open_product(&id)?;
        store.ask_seller(&CannedAssistant, "Ainda está disponível?").await?;

        if let Some(chat) = store.chat() {
            println!("\nSeller chat for {}:", chat.product_title());
            for turn in chat.transcript() {
                println!("  [{:?}] {}", turn.role(), turn.text());
            }
        }

        store.add_to_cart(&id)?;
        store.add_to_cart(&id)?;
    }

    println!(
        "\nCart: {} unit(s), subtotal {}",
        store.cart_count(),
        store.cart().subtotal()?
    );

    let order = store.checkout(&args.payment)?;

    println!();
    let stdout = io::stdout();
    order.write_summary(stdout.lock())?;

    Ok(())
}
