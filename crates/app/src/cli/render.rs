use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use storefront::prelude::{PricingPolicy, Summary, Timeline, to_money};
use storefront_app::domain::{carts::models::Cart, catalog::models::Product, orders::models::Order};
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Display an exact amount in minor units, falling back to the raw decimal.
pub(crate) fn money(amount: Decimal, currency: &'static Currency) -> String {
    to_money(amount, currency).map_or_else(|_| amount.to_string(), |money| money.to_string())
}

fn finish(builder: Builder, numeric: std::ops::Range<usize>) -> String {
    let mut table: Table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(numeric), Alignment::right());

    table.to_string()
}

pub(crate) fn cart_table(cart: &Cart, currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Product", "Price", "Qty", "Total"]);

    for item in cart.items() {
        builder.push_record([
            item.id.to_string(),
            item.product.name.clone(),
            money(item.product.price, currency),
            item.quantity.to_string(),
            money(item.product.price * Decimal::from(item.quantity), currency),
        ]);
    }

    finish(builder, 2..5)
}

pub(crate) fn summary_table(summary: &Summary, policy: &PricingPolicy) -> String {
    let currency = policy.currency();
    let mut builder = Builder::default();

    builder.push_record(["Subtotal".to_string(), money(summary.subtotal, currency)]);
    builder.push_record([
        "Shipping".to_string(),
        if summary.has_free_shipping() {
            "FREE".to_string()
        } else {
            money(summary.shipping, currency)
        },
    ]);
    builder.push_record(["Tax".to_string(), money(summary.tax, currency)]);

    if !summary.discount.is_zero() {
        builder.push_record([
            "Discount".to_string(),
            format!("-{}", money(summary.discount, currency)),
        ]);
    }

    builder.push_record(["Total".to_string(), money(summary.grand_total, currency)]);

    let mut rendered = finish(builder, 1..2);

    let remaining = policy.amount_until_free_shipping(summary.subtotal);

    if !remaining.is_zero() {
        rendered.push_str(&format!(
            "\nAdd {} more to get free shipping",
            money(remaining, currency)
        ));
    }

    rendered
}

pub(crate) fn orders_table(orders: &[Order], currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Order", "Status", "Placed", "Total"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.reference(),
            order.status.label().to_string(),
            order.created_at.strftime("%Y-%m-%d").to_string(),
            money(order.total_amount, currency),
        ]);
    }

    finish(builder, 4..5)
}

pub(crate) fn order_table(order: &Order, currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Price", "Qty", "Total"]);

    for item in &order.items {
        builder.push_record([
            item.product_name.clone(),
            money(item.price, currency),
            item.quantity.to_string(),
            money(item.price * Decimal::from(item.quantity), currency),
        ]);
    }

    builder.push_record([
        "Shipping".to_string(),
        String::new(),
        String::new(),
        money(order.shipping_cost, currency),
    ]);
    builder.push_record([
        "Tax".to_string(),
        String::new(),
        String::new(),
        money(order.tax_amount, currency),
    ]);

    if !order.discount_amount.is_zero() {
        builder.push_record([
            "Discount".to_string(),
            String::new(),
            String::new(),
            format!("-{}", money(order.discount_amount, currency)),
        ]);
    }

    builder.push_record([
        "Total".to_string(),
        String::new(),
        String::new(),
        money(order.total_amount, currency),
    ]);

    finish(builder, 1..4)
}

pub(crate) fn products_table(products: &[Product], currency: &'static Currency) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Product", "Category", "Price", "Was", "Stock", "Rating"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category_name.clone().unwrap_or_default(),
            money(product.price, currency),
            product
                .original_price
                .filter(|_| product.discount_percent().is_some())
                .map(|price| money(price, currency))
                .unwrap_or_default(),
            if product.in_stock() {
                product.stock.to_string()
            } else {
                "out of stock".to_string()
            },
            product
                .rating
                .map(|rating| format!("{rating} ({})", product.review_count))
                .unwrap_or_default(),
        ]);
    }

    finish(builder, 3..7)
}

/// One line per stage: `[x]` reached, `[>]` current, `[ ]` ahead.
pub(crate) fn timeline(timeline: &Timeline) -> String {
    timeline
        .stages()
        .iter()
        .map(|stage| {
            let mark = if stage.current {
                ">"
            } else if stage.completed {
                "x"
            } else {
                " "
            };

            format!("[{mark}] {}", stage.status.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use rusty_money::iso::{GBP, USD};
    use storefront::prelude::OrderStatus;

    use super::*;

    #[test]
    fn money_rounds_to_minor_units() {
        assert_eq!(money(dec!(4.999), USD), "$5.00");
        assert_eq!(money(dec!(12.5), GBP), "£12.50");
    }

    #[test]
    fn summary_mentions_free_shipping_gap() {
        let policy = PricingPolicy::default();
        let rendered = summary_table(&Summary::calculate(&policy, dec!(40), dec!(0)), &policy);

        assert!(rendered.contains("$10.00"), "{rendered}");
        assert!(
            rendered.contains("Add $10.00 more to get free shipping"),
            "{rendered}"
        );

        let rendered = summary_table(&Summary::calculate(&policy, dec!(60), dec!(5)), &policy);

        assert!(rendered.contains("FREE"), "{rendered}");
        assert!(rendered.contains("-$5.00"), "{rendered}");
        assert!(!rendered.contains("more to get free shipping"), "{rendered}");
    }

    #[test]
    fn cancelled_timeline_marks_only_placement() {
        let rendered = timeline(&Timeline::for_status(OrderStatus::Cancelled));

        assert_eq!(
            rendered,
            "[x] Order Pending\n[ ] Processing\n[ ] Shipped\n[ ] Delivered"
        );
    }
}
