use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{self, Errors, Field, Rule};

/// Stored catalog entry. `image` is an opaque reference into whatever
/// asset store the web layer uses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
    pub category_id: Uuid,
    pub created_at: OffsetDateTime,
}

impl Product {
    /// The stored minor units viewed as money.
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Catalog input. A saveable product needs a name, a quantity, a price and
/// a category reference; description and image stay optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<Money>,
    pub category_id: Option<Uuid>,
}

impl NewProduct {
    fn rules(&self) -> Vec<Rule<'_>> {
        vec![
            Rule::Presence {
                field: "name",
                value: Field::Text(self.name.as_deref()),
            },
            Rule::Presence {
                field: "quantity",
                value: Field::Number(self.quantity),
            },
            Rule::Monetary {
                field: "price",
                value: self.price,
            },
            Rule::Presence {
                field: "category",
                value: Field::Reference(self.category_id.is_some()),
            },
        ]
    }

    /// Run the field checks. Referential existence of the category is the
    /// store's foreign key's job.
    pub fn validate(&self) -> Errors {
        validation::run(&self.rules())
    }
}
