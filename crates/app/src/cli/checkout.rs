use clap::Args;
use storefront_app::{
    context::AppContext,
    domain::orders::models::{OrderDraft, ShippingAddress},
};

use super::render;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// First address line
    #[arg(long)]
    address: String,

    /// Second address line
    #[arg(long)]
    address_line2: Option<String>,

    /// City
    #[arg(long)]
    city: String,

    /// State or region
    #[arg(long, default_value = "")]
    state: String,

    /// ZIP or postal code
    #[arg(long)]
    zip_code: String,

    /// Country
    #[arg(long)]
    country: String,

    /// Payment method reference from the payment provider
    #[arg(long, env = "STOREFRONT_PAYMENT_METHOD", hide_env_values = true)]
    payment_method: String,

    /// Coupon code to apply
    #[arg(long)]
    coupon: Option<String>,
}

impl From<CheckoutArgs> for OrderDraft {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            shipping_address: ShippingAddress {
                address_line1: args.address,
                address_line2: args.address_line2,
                city: args.city,
                state: args.state,
                zip_code: args.zip_code,
                country: args.country,
            },
            payment_method_id: args.payment_method,
            coupon_code: None,
        }
    }
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    context
        .cart
        .fetch_cart()
        .await
        .map_err(|error| format!("failed to fetch cart: {error}"))?;

    if let Some(code) = args.coupon.as_deref() {
        context
            .apply_coupon(code)
            .await
            .map_err(|error| format!("failed to apply coupon: {error}"))?;
    }

    if let Err(error) = context.coupon_discount() {
        println!("coupon not applied: {error}");
    }

    println!(
        "{}",
        render::summary_table(&context.checkout_summary(), &context.pricing)
    );

    let order = context
        .checkout(args.into())
        .await
        .map_err(|error| format!("failed to place order: {error}"))?;

    println!("order placed: {}", order.reference());
    println!("{}", render::order_table(&order, context.pricing.currency()));

    Ok(())
}
