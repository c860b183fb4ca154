//! Cart and checkout summaries priced through the same engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use storefront::prelude::*;

#[test]
fn adding_an_item_crosses_the_free_shipping_threshold() -> TestResult {
    let policy = PricingPolicy::default();

    let before = [Line::new(dec!(20), 2)];
    let cart = Summary::for_lines(&policy, &before, Decimal::ZERO);

    assert_eq!(cart.subtotal, dec!(40));
    assert_eq!(cart.shipping, dec!(10));
    assert_eq!(policy.amount_until_free_shipping(cart.subtotal), dec!(10));

    let after = [Line::new(dec!(20), 2), Line::new(dec!(15), 1)];
    let checkout = Summary::for_lines(&policy, &after, Decimal::ZERO);

    assert_eq!(checkout.subtotal, dec!(55.00));
    assert!(checkout.has_free_shipping());
    assert_eq!(checkout.tax, dec!(5.5));
    assert_eq!(checkout.grand_total, dec!(60.50));
    assert_eq!(
        to_money(checkout.grand_total, USD)?,
        Money::from_minor(60_50, USD)
    );

    Ok(())
}

#[test]
fn coupon_discount_flows_into_grand_total() -> TestResult {
    let policy = PricingPolicy::default();
    let lines = [Line::new(dec!(30), 2)];
    let subtotal = subtotal(&lines);

    let coupon = Coupon {
        discount: CouponDiscount::Percentage(dec!(10)),
        min_purchase: dec!(50),
    };

    let discount = calculate_discount(&coupon, subtotal)?;
    let summary = Summary::calculate(&policy, subtotal, discount);

    assert_eq!(summary.discount, dec!(6));
    assert_eq!(summary.grand_total, dec!(60));

    Ok(())
}

#[test]
fn cart_and_checkout_never_diverge() {
    let policy = PricingPolicy::default();
    let lines = [Line::new(dec!(12.49), 3), Line::new(dec!(3.25), 4)];

    let from_lines = Summary::for_lines(&policy, &lines, dec!(2));
    let from_subtotal = Summary::calculate(&policy, subtotal(&lines), dec!(2));

    assert_eq!(from_lines, from_subtotal);
    assert_eq!(
        from_lines.grand_total,
        policy.grand_total(from_lines.subtotal, dec!(2))
    );
}
