use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::validation::{self, Errors, Rule};

/// Product grouping. A category outlives the products it owns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    // No failing checks on categories today; the empty rule list keeps the
    // save path uniform with the other entities.
    fn rules(&self) -> Vec<Rule<'_>> {
        Vec::new()
    }

    pub fn validate(&self) -> Errors {
        validation::run(&self.rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_name_is_valid() {
        let category = NewCategory {
            name: "Apparel".into(),
        };
        assert!(category.validate().is_empty());
    }
}
