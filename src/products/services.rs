use anyhow::Context;
use tracing::{info, warn};

use super::model::{NewProduct, Product};
use super::store::{ProductRow, ProductStore};
use crate::validation::SaveOutcome;

/// Validate and persist a catalog entry. A rejected product never reaches
/// the store.
pub async fn create(
    store: &dyn ProductStore,
    new_product: &NewProduct,
) -> anyhow::Result<SaveOutcome<Product>> {
    let errors = new_product.validate();
    if !errors.is_empty() {
        warn!(messages = errors.full_messages().len(), "rejected product save");
        return Ok(SaveOutcome::Rejected(errors));
    }

    let (Some(name), Some(quantity), Some(price), Some(category_id)) = (
        new_product.name.as_deref(),
        new_product.quantity,
        new_product.price,
        new_product.category_id,
    ) else {
        anyhow::bail!("presence checks let a partial product through");
    };

    let product = store
        .insert(ProductRow {
            name: name.to_string(),
            description: new_product.description.clone(),
            image: new_product.image.clone(),
            quantity,
            price_cents: price.cents,
            category_id,
        })
        .await
        .context("persist product")?;
    info!(product_id = %product.id, category_id = %product.category_id, "product created");
    Ok(SaveOutcome::Saved(product))
}
