use chrono::{Duration, Utc};
use sea_orm::Database;

use engine::{Engine, EngineError, MoneyCents, NewExpense, UpdateExpense};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn expense(title: &str, cents: i64, hours_ago: i64) -> NewExpense {
    NewExpense {
        title: title.to_string(),
        amount: MoneyCents::new(cents),
        spent_at: Utc::now() - Duration::hours(hours_ago),
        category_id: None,
    }
}

#[tokio::test]
async fn list_returns_newest_first() {
    let engine = engine_with_db().await;

    engine.add_expense(expense("Rent", 120_000, 48)).await.unwrap();
    engine.add_expense(expense("Coffee", 350, 2)).await.unwrap();
    engine.add_expense(expense("Lunch", 1200, 24)).await.unwrap();

    let titles: Vec<String> = engine
        .list_expenses()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["Coffee", "Lunch", "Rent"]);
}

#[tokio::test]
async fn same_instant_keeps_insertion_order() {
    let engine = engine_with_db().await;
    let spent_at = Utc::now();

    for title in ["first", "second", "third"] {
        engine
            .add_expense(NewExpense {
                title: title.to_string(),
                amount: MoneyCents::new(100),
                spent_at,
                category_id: None,
            })
            .await
            .unwrap();
    }

    let titles: Vec<String> = engine
        .list_expenses()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["first", "second", "third"]);
}

#[tokio::test]
async fn add_expense_validates_input() {
    let engine = engine_with_db().await;

    let err = engine.add_expense(expense("   ", 100, 0)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let err = engine.add_expense(expense("Coffee", 0, 0)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .add_expense(NewExpense {
            category_id: Some(uuid::Uuid::new_v4()),
            ..expense("Coffee", 100, 0)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn title_is_trimmed_on_insert() {
    let engine = engine_with_db().await;

    let id = engine.add_expense(expense("  Coffee ", 350, 0)).await.unwrap();
    assert_eq!(engine.expense(id).await.unwrap().title, "Coffee");
}

#[tokio::test]
async fn update_expense_edits_fields() {
    let engine = engine_with_db().await;
    let id = engine.add_expense(expense("Coffee", 350, 0)).await.unwrap();

    let new_date = Utc::now() - Duration::days(3);
    engine
        .update_expense(
            id,
            UpdateExpense {
                title: Some("Espresso".to_string()),
                amount: Some(MoneyCents::new(250)),
                spent_at: Some(new_date),
                category: None,
            },
        )
        .await
        .unwrap();

    let updated = engine.expense(id).await.unwrap();
    assert_eq!(updated.title, "Espresso");
    assert_eq!(updated.amount, MoneyCents::new(250));
    assert_eq!(updated.spent_at.date_naive(), new_date.date_naive());
}

#[tokio::test]
async fn update_expense_can_clear_category() {
    let engine = engine_with_db().await;
    let category_id = engine.new_category("Food").await.unwrap();
    let id = engine
        .add_expense(NewExpense {
            category_id: Some(category_id),
            ..expense("Lunch", 1200, 0)
        })
        .await
        .unwrap();

    engine
        .update_expense(
            id,
            UpdateExpense {
                category: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(engine.expense(id).await.unwrap().category_id, None);
}

#[tokio::test]
async fn delete_expense_removes_row() {
    let engine = engine_with_db().await;
    let id = engine.add_expense(expense("Coffee", 350, 0)).await.unwrap();

    engine.delete_expense(id).await.unwrap();
    assert!(engine.list_expenses().await.unwrap().is_empty());

    let err = engine.delete_expense(id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let engine = engine_with_db().await;

    engine.new_category("Groceries").await.unwrap();
    let err = engine.new_category("  groceries ").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn delete_category_cascades_to_expenses() {
    let engine = engine_with_db().await;
    let food = engine.new_category("Food").await.unwrap();
    let other = engine.new_category("Other").await.unwrap();

    engine
        .add_expense(NewExpense {
            category_id: Some(food),
            ..expense("Lunch", 1200, 1)
        })
        .await
        .unwrap();
    engine
        .add_expense(NewExpense {
            category_id: Some(food),
            ..expense("Dinner", 2500, 2)
        })
        .await
        .unwrap();
    let kept = engine
        .add_expense(NewExpense {
            category_id: Some(other),
            ..expense("Bus", 180, 3)
        })
        .await
        .unwrap();

    engine.delete_category(food).await.unwrap();

    let remaining = engine.list_expenses().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept);
    assert!(engine.category(food).await.is_err());
}

#[tokio::test]
async fn categories_list_alphabetically() {
    let engine = engine_with_db().await;
    engine.new_category("transport").await.unwrap();
    engine.new_category("Food").await.unwrap();

    let names: Vec<String> = engine
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Food", "transport"]);
}

#[tokio::test]
async fn expenses_for_category_filters() {
    let engine = engine_with_db().await;
    let food = engine.new_category("Food").await.unwrap();

    engine
        .add_expense(NewExpense {
            category_id: Some(food),
            ..expense("Lunch", 1200, 1)
        })
        .await
        .unwrap();
    engine.add_expense(expense("Bus", 180, 2)).await.unwrap();

    let for_food = engine.expenses_for_category(food).await.unwrap();
    assert_eq!(for_food.len(), 1);
    assert_eq!(for_food[0].title, "Lunch");
}
