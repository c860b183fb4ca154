use clap::{Args, Subcommand};
use storefront_app::context::AppContext;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Price a coupon against the current cart
    Apply {
        /// Coupon code
        code: String,
    },
}

pub(crate) async fn run(context: &AppContext, command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Apply { code } => {
            context
                .cart
                .fetch_cart()
                .await
                .map_err(|error| format!("failed to fetch cart: {error}"))?;

            let applied = context
                .apply_coupon(&code)
                .await
                .map_err(|error| format!("failed to apply coupon: {error}"))?;

            println!("coupon: {} {}", applied.code, applied.description);
            println!(
                "{}",
                render::summary_table(&context.checkout_summary(), &context.pricing)
            );
        }
    }

    Ok(())
}
