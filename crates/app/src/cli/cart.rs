use clap::{Args, Subcommand};
use storefront_app::{
    context::AppContext,
    domain::{carts::models::CartItemId, catalog::models::ProductId},
};

use super::render;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its price summary
    Show,

    /// Add a product to the cart
    Add {
        /// Product id
        product: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set the quantity of a cart line
    Update {
        /// Cart item id
        item: CartItemId,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },

    /// Remove a cart line
    Remove {
        /// Cart item id
        item: CartItemId,
    },

    /// Empty the cart
    Clear,
}

pub(crate) async fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let cart = &context.cart;

    match command.command {
        CartSubcommand::Show => {
            cart.fetch_cart()
                .await
                .map_err(|error| format!("failed to fetch cart: {error}"))?;
        }
        CartSubcommand::Add { product, quantity } => {
            let product = context
                .catalog
                .fetch_product(product)
                .await
                .map_err(|error| format!("failed to fetch product: {error}"))?;

            cart.add_to_cart(&product, quantity)
                .await
                .map_err(|error| format!("failed to add to cart: {error}"))?;
        }
        CartSubcommand::Update { item, quantity } => {
            cart.fetch_cart()
                .await
                .map_err(|error| format!("failed to fetch cart: {error}"))?;

            cart.update_cart_item(item, quantity)
                .await
                .map_err(|error| format!("failed to update cart: {error}"))?;
        }
        CartSubcommand::Remove { item } => {
            cart.fetch_cart()
                .await
                .map_err(|error| format!("failed to fetch cart: {error}"))?;

            cart.remove_from_cart(item)
                .await
                .map_err(|error| format!("failed to remove from cart: {error}"))?;
        }
        CartSubcommand::Clear => {
            cart.clear_cart()
                .await
                .map_err(|error| format!("failed to clear cart: {error}"))?;
        }
    }

    if cart.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    let currency = context.pricing.currency();

    println!("{}", render::cart_table(&cart.cart(), currency));
    println!("{}", render::summary_table(&context.cart_summary(), &context.pricing));

    Ok(())
}
