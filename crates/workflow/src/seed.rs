//! Starter menu loaded into an empty catalog on boot.

use domain::{Money, Product, ProductKind};
use store::CafeStore;

use crate::error::WorkflowError;

fn food(vegetarian: bool) -> ProductKind {
    ProductKind::Food { vegetarian }
}

fn drink(cold: bool) -> ProductKind {
    ProductKind::Drink { cold, size: None }
}

fn menu() -> Result<Vec<Product>, WorkflowError> {
    let entries: [(&str, i64, u32, ProductKind, &str); 9] = [
        (
            "Butter Croissant",
            25000,
            50,
            food(false),
            "Flaky, buttery croissant baked fresh every morning",
        ),
        (
            "Veggie Wrap",
            45000,
            30,
            food(true),
            "Grilled vegetables and hummus in a whole wheat wrap",
        ),
        (
            "Grilled Chicken Sandwich",
            55000,
            25,
            food(false),
            "Chicken breast with lettuce, tomato, and garlic aioli",
        ),
        (
            "Caesar Salad",
            48000,
            20,
            food(true),
            "Crisp romaine, parmesan, croutons, and caesar dressing",
        ),
        (
            "Chocolate Cake",
            35000,
            15,
            food(true),
            "Rich dark chocolate layer cake",
        ),
        (
            "Espresso",
            20000,
            100,
            drink(false),
            "Double shot of our house blend",
        ),
        (
            "Iced Caramel Latte",
            38000,
            75,
            drink(true),
            "Espresso, milk, and caramel over ice",
        ),
        (
            "Hot Chocolate",
            32000,
            60,
            drink(false),
            "Steamed milk with melted dark chocolate",
        ),
        (
            "Iced Matcha Latte",
            42000,
            45,
            drink(true),
            "Ceremonial grade matcha with milk over ice",
        ),
    ];

    let mut products = Vec::with_capacity(entries.len());
    for (name, cents, stock, kind, description) in entries {
        let mut product = Product::new(name, Money::from_cents(cents), stock, kind)?;
        product.description = Some(description.to_string());
        product.image_url = Some(format!(
            "https://images.smartcafe.example/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        ));
        products.push(product);
    }
    Ok(products)
}

/// Inserts the starter menu if the catalog is empty. A non-empty catalog is
/// left untouched, so restarting the service never duplicates products.
pub async fn seed_products<S: CafeStore>(store: &S) -> Result<usize, WorkflowError> {
    if store.count_products().await? > 0 {
        tracing::debug!("catalog already populated, skipping seed");
        return Ok(0);
    }

    let products = menu()?;
    for product in &products {
        store.insert_product(product).await?;
    }
    tracing::info!(count = products.len(), "seeded starter menu");
    Ok(products.len())
}
