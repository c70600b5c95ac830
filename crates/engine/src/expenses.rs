//! Expense primitives.
//!
//! An `Expense` is a single recorded transaction: a title, an amount in
//! cents, the instant it happened and an optional category reference.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount: MoneyCents,
    pub spent_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    /// Insertion instant; tiebreak for expenses sharing `spent_at`.
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        title: String,
        amount: MoneyCents,
        spent_at: DateTime<Utc>,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            amount,
            spent_at,
            category_id,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub amount_cents: i64,
    pub spent_at: DateTimeUtc,
    pub category_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id),
            title: ActiveValue::Set(expense.title.clone()),
            amount_cents: ActiveValue::Set(expense.amount.cents()),
            spent_at: ActiveValue::Set(expense.spent_at),
            category_id: ActiveValue::Set(expense.category_id),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            amount: MoneyCents::new(model.amount_cents),
            spent_at: model.spent_at,
            category_id: model.category_id,
            created_at: model.created_at,
        }
    }
}
