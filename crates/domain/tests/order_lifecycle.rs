//! Cross-module domain tests: products, orders, and the status machine
//! working together.

use domain::{Money, Order, OrderItem, OrderStatus, Product, ProductKind};

fn menu_product(stock: u32, price_cents: i64) -> Product {
    Product::new(
        "Iced Latte",
        Money::from_cents(price_cents),
        stock,
        ProductKind::Drink {
            cold: true,
            size: Some("Medium".to_string()),
        },
    )
    .unwrap()
}

#[test]
fn order_against_product_stock() {
    let mut product = menu_product(5, 10);

    // Order 3 units: stock drops to 2, total is 30.
    product.decrease_stock(3).unwrap();
    let order = Order::new(
        Some("table 4".to_string()),
        None,
        vec![OrderItem::snapshot_of(&product, 3, None)],
    )
    .unwrap();
    assert_eq!(product.stock, 2);
    assert_eq!(order.total().cents(), 30);
    assert_eq!(order.status(), OrderStatus::Pending);

    // A second order for 3 more fails closed with the remaining quantity.
    let err = product.decrease_stock(3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "insufficient stock for 'Iced Latte': requested 3, available 2"
    );

    // Cancelling the first order returns its items to stock.
    let mut order = order;
    order.transition_to(OrderStatus::Cancelled).unwrap();
    for item in order.items() {
        product.increase_stock(item.quantity);
    }
    assert_eq!(product.stock, 5);
}

#[test]
fn cancelled_order_cannot_be_revived() {
    let product = menu_product(10, 100);
    let mut order = Order::new(None, None, vec![OrderItem::snapshot_of(&product, 1, None)]).unwrap();

    order.transition_to(OrderStatus::Cancelled).unwrap();

    for target in [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        assert!(order.clone().transition_to(target).is_err());
    }
}
