//! Persisted employee record.
//!
//! The same `Model` is stored as a row by the SeaORM adapter and as a JSON
//! document by the in-process stores, so it carries serde derives as well.
use sea_orm::{entity::prelude::*, sea_query::OnConflict, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Persisted form of an employee.
pub type Employee = Model;

/// Insert the row, or overwrite the mutable columns when the id already exists.
pub async fn upsert(db: &DatabaseConnection, model: Model) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(model.id.clone()),
        first_name: Set(model.first_name.clone()),
        last_name: Set(model.last_name.clone()),
        email: Set(model.email.clone()),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns([Column::FirstName, Column::LastName, Column::Email])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(model)
}

pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id.to_owned()).one(db).await?)
}

/// Returns the number of rows removed; zero when the id was unknown.
pub async fn hard_delete(db: &DatabaseConnection, id: &str) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(id.to_owned()).exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn delete_all(db: &DatabaseConnection) -> Result<u64, ModelError> {
    let res = Entity::delete_many().exec(db).await?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;

    fn sample(id: &str) -> Model {
        Model {
            id: id.into(),
            first_name: "Dasha".into(),
            last_name: "Petrova".into(),
            email: "dasha@gmail.com".into(),
        }
    }

    #[test]
    fn document_shape_uses_field_names() {
        let v = serde_json::to_value(sample("12345")).unwrap();
        assert_eq!(v["id"], "12345");
        assert_eq!(v["first_name"], "Dasha");
        assert_eq!(v["last_name"], "Petrova");
        assert_eq!(v["email"], "dasha@gmail.com");
    }

    #[tokio::test]
    async fn upsert_find_delete_against_postgres() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = match crate::db::connect().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return Ok(());
            }
        };
        migration::Migrator::up(&db, None).await?;

        let id = format!("model-test-{}", std::process::id());
        let created = upsert(&db, sample(&id)).await?;
        assert_eq!(find(&db, &id).await?, Some(created.clone()));

        let mut changed = created.clone();
        changed.email = "dasha@example.com".into();
        upsert(&db, changed.clone()).await?;
        assert_eq!(find(&db, &id).await?.map(|m| m.email), Some("dasha@example.com".to_string()));

        assert_eq!(hard_delete(&db, &id).await?, 1);
        assert_eq!(hard_delete(&db, &id).await?, 0);
        assert!(find(&db, &id).await?.is_none());
        Ok(())
    }
}
