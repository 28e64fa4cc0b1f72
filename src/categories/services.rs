use anyhow::Context;
use tracing::info;

use super::model::{Category, NewCategory};
use super::store::CategoryStore;
use crate::validation::SaveOutcome;

/// Validate and persist a category.
pub async fn create(
    store: &dyn CategoryStore,
    new_category: &NewCategory,
) -> anyhow::Result<SaveOutcome<Category>> {
    let errors = new_category.validate();
    if !errors.is_empty() {
        return Ok(SaveOutcome::Rejected(errors));
    }

    let category = store
        .insert(&new_category.name)
        .await
        .context("persist category")?;
    info!(category_id = %category.id, name = %category.name, "category created");
    Ok(SaveOutcome::Saved(category))
}
