use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storefront_app::{
    context::AppContext,
    domain::catalog::models::{CategoryId, ProductFilters, ProductId},
};

use super::render;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products
    List(ListProductsArgs),

    /// Show one product with its reviews
    Show {
        /// Product id
        product: ProductId,
    },
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Search term
    #[arg(short, long)]
    search: Option<String>,

    /// Category id
    #[arg(short, long)]
    category: Option<CategoryId>,

    /// Minimum price
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum price
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only products in stock
    #[arg(long)]
    in_stock: bool,

    /// Sort order, for example `price` or `-created_at`
    #[arg(short, long, default_value = ProductFilters::DEFAULT_ORDERING)]
    ordering: String,

    /// Page number
    #[arg(short, long)]
    page: Option<u32>,
}

impl From<ListProductsArgs> for ProductFilters {
    fn from(args: ListProductsArgs) -> Self {
        Self {
            search: args.search,
            category: args.category,
            min_price: args.min_price,
            max_price: args.max_price,
            in_stock: args.in_stock,
            ordering: args.ordering,
            page: args.page,
        }
    }
}

pub(crate) async fn run(context: &AppContext, command: ProductsCommand) -> Result<(), String> {
    let currency = context.pricing.currency();

    match command.command {
        ProductsSubcommand::List(args) => {
            let products = context
                .catalog
                .fetch_products(args.into())
                .await
                .map_err(|error| format!("failed to fetch products: {error}"))?;

            if products.is_empty() {
                println!("no products found");
                return Ok(());
            }

            println!("{}", render::products_table(&products, currency));
            println!("{} products", context.catalog.pagination().count);
        }
        ProductsSubcommand::Show { product } => {
            let product = context
                .catalog
                .fetch_product(product)
                .await
                .map_err(|error| format!("failed to fetch product: {error}"))?;

            println!("{}", render::products_table(std::slice::from_ref(&product), currency));

            for review in &product.reviews {
                println!(
                    "{}/5 {}: {}",
                    review.rating,
                    review.user_name,
                    if review.title.is_empty() {
                        &review.comment
                    } else {
                        &review.title
                    }
                );
            }
        }
    }

    Ok(())
}
