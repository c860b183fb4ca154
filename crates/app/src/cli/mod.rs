use clap::{Parser, Subcommand};
use storefront_app::{
    config::{ApiConfig, LoggingConfig, PricingConfig},
    context::AppContext,
};

mod cart;
mod checkout;
mod coupon;
mod orders;
mod products;
mod render;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// Storefront API settings.
    #[command(flatten)]
    api: ApiConfig,

    /// Shipping, tax and currency settings.
    #[command(flatten)]
    pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Orders(orders::OrdersCommand),
    Products(products::ProductsCommand),
    Coupon(coupon::CouponCommand),
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::load(&self.api, &self.pricing)
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Cart(command) => cart::run(&context, command).await,
            Commands::Orders(command) => orders::run(&context, command).await,
            Commands::Products(command) => products::run(&context, command).await,
            Commands::Coupon(command) => coupon::run(&context, command).await,
            Commands::Checkout(args) => checkout::run(&context, args).await,
        }
    }
}
