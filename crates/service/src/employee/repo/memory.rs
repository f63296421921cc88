use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::{future, stream, StreamExt};
use tracing::debug;

use crate::employee::repository::{assign_id, EmployeeRepository, EmployeeStream};
use crate::errors::ServiceError;
use models::employee::Employee;

/// Process-local document store. Default backend and the test double.
#[derive(Clone, Default)]
pub struct InMemoryEmployeeRepository {
    docs: Arc<DashMap<String, Employee>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn upsert(&self, employee: Employee) -> Result<Employee, ServiceError> {
        let employee = assign_id(employee);
        let replaced = self.docs.insert(employee.id.clone(), employee.clone()).is_some();
        debug!(employee_id = %employee.id, replaced, "memory upsert");
        Ok(employee)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, ServiceError> {
        Ok(self.docs.get(id).map(|doc| doc.value().clone()))
    }

    fn find_all(&self) -> EmployeeStream {
        // Snapshot the keys only; each record is read when the consumer asks
        // for it, and records removed in between are skipped.
        let docs = Arc::clone(&self.docs);
        let ids: Vec<String> = docs.iter().map(|doc| doc.key().clone()).collect();
        stream::iter(ids)
            .filter_map(move |id| future::ready(docs.get(&id).map(|doc| Ok::<_, ServiceError>(doc.value().clone()))))
            .boxed()
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
        let existed = self.docs.remove(id).is_some();
        debug!(employee_id = %id, existed, "memory delete");
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), ServiceError> {
        self.docs.clear();
        Ok(())
    }
}
