use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::employee::Employee;

/// Records yielded one at a time by [`EmployeeRepository::find_all`].
pub type EmployeeStream = BoxStream<'static, Result<Employee, ServiceError>>;

/// Document store keyed by employee id.
///
/// Every method is non-blocking. Implementations do their own concurrency
/// control, if any; callers get no ordering guarantee for concurrent writes to
/// the same id.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert when the id is empty or unknown, replace when known. Returns the
    /// stored record with its id populated.
    async fn upsert(&self, employee: Employee) -> Result<Employee, ServiceError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, ServiceError>;

    /// Stream every stored record. An empty store yields an empty stream.
    fn find_all(&self) -> EmployeeStream;

    /// Succeeds whether or not a record existed.
    async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError>;

    async fn delete_all(&self) -> Result<(), ServiceError>;
}

/// Give the record a generated id if the caller left it empty.
pub fn assign_id(mut employee: Employee) -> Employee {
    if employee.id.is_empty() {
        employee.id = Uuid::new_v4().simple().to_string();
    }
    employee
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Employee {
        Employee { id: String::new(), first_name: "A".into(), last_name: "B".into(), email: "a@b.com".into() }
    }

    #[test]
    fn generates_hex_id_when_empty() {
        let e = assign_id(blank());
        assert_eq!(e.id.len(), 32);
        assert!(e.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(assign_id(blank()).id, e.id);
    }

    #[test]
    fn keeps_client_id() {
        let e = assign_id(Employee { id: "X".into(), ..blank() });
        assert_eq!(e.id, "X");
    }
}
