use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use futures::{stream, StreamExt};
use tracing::{debug, info};

use crate::employee::repository::{assign_id, EmployeeRepository, EmployeeStream};
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;
use models::employee::Employee;

/// Employee documents kept in a single JSON file, keyed by id.
#[derive(Clone)]
pub struct JsonFileEmployeeRepository {
    store: Arc<JsonMapStore<String, Employee>>,
}

impl JsonFileEmployeeRepository {
    /// Open the file, creating an empty one if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let path = path.into();
        let store = JsonMapStore::<String, Employee>::new(path.clone()).await?;
        info!(path = %path.display(), documents = store.len().await, "employee file store ready");
        Ok(Self { store })
    }
}

#[async_trait]
impl EmployeeRepository for JsonFileEmployeeRepository {
    async fn upsert(&self, employee: Employee) -> Result<Employee, ServiceError> {
        let employee = assign_id(employee);
        self.store.insert(employee.id.clone(), employee.clone()).await?;
        debug!(employee_id = %employee.id, "file upsert");
        Ok(employee)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, ServiceError> {
        Ok(self.store.get(&id.to_owned()).await)
    }

    fn find_all(&self) -> EmployeeStream {
        let store = Arc::clone(&self.store);
        stream::once(async move {
            let ids = store.keys().await;
            stream::iter(ids).filter_map(move |id| {
                let store = Arc::clone(&store);
                async move { store.get(&id).await.map(Ok::<_, ServiceError>) }
            })
        })
        .flatten()
        .boxed()
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
        let existed = self.store.remove(&id.to_owned()).await?;
        debug!(employee_id = %id, existed, "file delete");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ServiceError> {
        self.store.clear().await
    }
}
