//! Utils

use clap::Parser;

/// Arguments for the storefront walkthrough example
#[derive(Debug, Parser)]
pub struct DemoSessionArgs {
    /// Catalog fixture to seed the storefront with
    #[clap(short, long, default_value = "default")]
    pub catalog: String,

    /// Search query used during the walkthrough
    #[clap(short, long, default_value = "tênis")]
    pub query: String,

    /// Payment method recorded on the placed order
    #[clap(short, long, default_value = "pix")]
    pub payment: String,
}
