use clap::{Args, Subcommand};
use storefront_app::{context::AppContext, domain::orders::models::OrderId};

use super::render;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List your orders
    List {
        /// Page number
        #[arg(short, long)]
        page: Option<u32>,
    },

    /// Show one order with its items and timeline
    Show {
        /// Order id
        order: OrderId,
    },
}

pub(crate) async fn run(context: &AppContext, command: OrdersCommand) -> Result<(), String> {
    let currency = context.pricing.currency();

    match command.command {
        OrdersSubcommand::List { page } => {
            let result = match page {
                Some(page) => context.orders.fetch_orders_page(page).await,
                None => context.orders.fetch_orders().await,
            };

            let orders = result.map_err(|error| format!("failed to fetch orders: {error}"))?;

            if orders.is_empty() {
                println!("no orders found");
                return Ok(());
            }

            println!("{}", render::orders_table(&orders, currency));

            let pagination = context.orders.pagination();

            println!("{} orders", pagination.count);

            if pagination.has_next() {
                println!("more orders: --page {}", page.unwrap_or(1) + 1);
            }
        }
        OrdersSubcommand::Show { order } => {
            let order = context
                .orders
                .fetch_order_by_id(order)
                .await
                .map_err(|error| format!("failed to fetch order: {error}"))?;

            println!("order: {}", order.reference());
            println!("status: {}", order.status.label());
            println!("placed: {}", order.created_at);
            println!("{}", render::timeline(&order.timeline()));
            println!("{}", render::order_table(&order, currency));
        }
    }

    Ok(())
}
