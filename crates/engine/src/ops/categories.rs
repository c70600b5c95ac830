use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, categories, expenses,
    util::{normalize_display_name, normalize_name_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a category.
    ///
    /// Names are unique case-insensitively; a duplicate is rejected with
    /// [`EngineError::ExistingKey`].
    pub async fn new_category(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_display_name(name, "category")?;
        let name_norm = normalize_name_key(&name);

        let category = Category {
            id: Uuid::new_v4(),
            name,
        };
        let entry = categories::ActiveModel::from(&category);

        with_tx!(self, |db_tx| {
            let exists = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(category.name));
            }

            entry.insert(&db_tx).await?;
            info!(category_id = %category.id, "category created");
            Ok(category.id)
        })
    }

    /// Delete a category together with all expenses it owns.
    ///
    /// The schema declares `ON DELETE CASCADE`, but the expense rows are also
    /// deleted explicitly inside the same DB transaction so the ownership
    /// rule holds on connections where the FK pragma is off.
    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

            expenses::Entity::delete_many()
                .filter(expenses::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;

            model.delete(&db_tx).await?;
            info!(%category_id, "category and owned expenses deleted");
            Ok(())
        })
    }

    /// Return one category by id.
    pub async fn category(&self, category_id: Uuid) -> ResultEngine<Category> {
        let model = categories::Entity::find_by_id(category_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        Ok(Category::from(model))
    }

    /// All categories, alphabetically (case-insensitive).
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }
}
