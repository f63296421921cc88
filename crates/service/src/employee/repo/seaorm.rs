use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::debug;

use crate::employee::repository::{assign_id, EmployeeRepository, EmployeeStream};
use crate::errors::ServiceError;
use models::employee::{self, Employee};
use models::errors::ModelError;

/// Postgres-backed store. `find_all` streams rows off the cursor instead of
/// loading the table.
#[derive(Clone)]
pub struct SeaOrmEmployeeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn upsert(&self, record: Employee) -> Result<Employee, ServiceError> {
        let stored = employee::upsert(&self.db, assign_id(record)).await?;
        debug!(employee_id = %stored.id, "db upsert");
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, ServiceError> {
        Ok(employee::find(&self.db, id).await?)
    }

    fn find_all(&self) -> EmployeeStream {
        let db = self.db.clone();
        stream! {
            let rows = match employee::Entity::find().stream(&db).await {
                Ok(rows) => rows,
                Err(e) => {
                    yield Err(ServiceError::from(ModelError::from(e)));
                    return;
                }
            };
            futures::pin_mut!(rows);
            while let Some(row) = rows.next().await {
                let item: Result<Employee, ServiceError> = row.map_err(|e| ModelError::from(e).into());
                let failed = item.is_err();
                yield item;
                if failed {
                    break;
                }
            }
        }
        .boxed()
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
        let removed = employee::hard_delete(&self.db, id).await?;
        debug!(employee_id = %id, removed, "db delete");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ServiceError> {
        employee::delete_all(&self.db).await?;
        Ok(())
    }
}
