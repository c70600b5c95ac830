use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{
    EngineError, Expense, MoneyCents, ResultEngine, categories, expenses,
    util::normalize_display_name,
};

use super::{Engine, with_tx};

/// Input for [`Engine::add_expense`].
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub title: String,
    pub amount: MoneyCents,
    pub spent_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
}

/// Partial update for [`Engine::update_expense`]. `None` fields keep their
/// stored value; `category` distinguishes "keep" from "clear".
#[derive(Clone, Debug, Default)]
pub struct UpdateExpense {
    pub title: Option<String>,
    pub amount: Option<MoneyCents>,
    pub spent_at: Option<DateTime<Utc>>,
    pub category: Option<Option<Uuid>>,
}

impl Engine {
    /// Record a new expense.
    ///
    /// The title is trimmed and must not be empty; the amount must be
    /// positive; the category, when given, must exist.
    pub async fn add_expense(&self, new: NewExpense) -> ResultEngine<Uuid> {
        let title = normalize_display_name(&new.title, "expense")?;
        let expense = Expense::new(title, new.amount, new.spent_at, new.category_id)?;

        with_tx!(self, |db_tx| {
            if let Some(category_id) = expense.category_id {
                categories::Entity::find_by_id(category_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            }

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            info!(expense_id = %expense.id, "expense recorded");
            Ok(expense.id)
        })
    }

    /// Update the title, amount, date or category of an existing expense.
    ///
    /// The derived view does not observe store edits by itself; refresh it
    /// from [`list_expenses`](Engine::list_expenses) afterwards.
    pub async fn update_expense(&self, expense_id: Uuid, update: UpdateExpense) -> ResultEngine<()> {
        let title = update
            .title
            .as_deref()
            .map(|t| normalize_display_name(t, "expense"))
            .transpose()?;
        if let Some(amount) = update.amount
            && !amount.is_positive()
        {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

            if let Some(Some(category_id)) = update.category {
                categories::Entity::find_by_id(category_id)
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
            }

            let active = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id),
                title: ActiveValue::Set(title.unwrap_or(model.title)),
                amount_cents: ActiveValue::Set(
                    update.amount.map_or(model.amount_cents, MoneyCents::cents),
                ),
                spent_at: ActiveValue::Set(update.spent_at.unwrap_or(model.spent_at)),
                category_id: ActiveValue::Set(update.category.unwrap_or(model.category_id)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            info!(%expense_id, "expense updated");
            Ok(())
        })
    }

    /// Delete an expense from the store.
    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        let result = expenses::Entity::delete_by_id(expense_id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        info!(%expense_id, "expense deleted");
        Ok(())
    }

    /// Return one expense by id.
    pub async fn expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(expense_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        Ok(Expense::from(model))
    }

    /// The store's sorted read-all query.
    ///
    /// Newest first by `spent_at`; expenses sharing an instant keep insertion
    /// order (`created_at ASC`). This is the input the grouping engine
    /// expects.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_desc(expenses::Column::SpentAt)
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }

    /// Expenses belonging to one category, newest first.
    pub async fn expenses_for_category(&self, category_id: Uuid) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::CategoryId.eq(category_id))
            .order_by_desc(expenses::Column::SpentAt)
            .order_by_asc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Expense::from).collect())
    }
}
