use std::sync::Arc;

use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use tracing::instrument;

use super::dto::EmployeeDto;
use super::mapper;
use super::repository::EmployeeRepository;
use crate::errors::ServiceError;

/// Employee operations composed from store calls and DTO mapping.
///
/// Holds nothing but the store handle, so one instance is built at startup
/// and shared by every request. Store faults are returned as-is; a missing
/// record is `Ok(None)`, never an error.
pub struct EmployeeService<R: EmployeeRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: EmployeeRepository + ?Sized> Clone for EmployeeService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: EmployeeRepository + ?Sized> EmployeeService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    /// Store the employee, creating or replacing it by id.
    ///
    /// # Examples
    /// ```
    /// use service::employee::{EmployeeDto, EmployeeService, repo::InMemoryEmployeeRepository};
    /// use std::sync::Arc;
    /// let svc = EmployeeService::new(Arc::new(InMemoryEmployeeRepository::new()));
    /// let dto = EmployeeDto { id: String::new(), first_name: "Michael".into(), last_name: "Royf".into(), email: "michael@gmail.com".into() };
    /// let saved = tokio_test::block_on(svc.save(dto)).unwrap();
    /// assert!(!saved.id.is_empty());
    /// ```
    #[instrument(skip(self, dto), fields(employee_id = %dto.id))]
    pub async fn save(&self, dto: EmployeeDto) -> Result<EmployeeDto, ServiceError> {
        let stored = self.repo.upsert(mapper::to_entity(dto)).await?;
        Ok(mapper::to_dto(stored))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<EmployeeDto>, ServiceError> {
        Ok(self.repo.find_by_id(id).await?.map(mapper::to_dto))
    }

    /// Every stored employee, mapped as the store yields them.
    pub fn list(&self) -> BoxStream<'static, Result<EmployeeDto, ServiceError>> {
        self.repo.find_all().map_ok(mapper::to_dto).boxed()
    }

    /// Overwrite names and email of an existing employee. The target is
    /// always `id`; `dto.id` is ignored. Nothing is written when `id` is unknown.
    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: &str, dto: EmployeeDto) -> Result<Option<EmployeeDto>, ServiceError> {
        let Some(mut existing) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };
        existing.first_name = dto.first_name;
        existing.last_name = dto.last_name;
        existing.email = dto.email;
        let stored = self.repo.upsert(existing).await?;
        Ok(Some(mapper::to_dto(stored)))
    }

    /// Idempotent: deleting an unknown id succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::repo::InMemoryEmployeeRepository;
    use crate::employee::repository::EmployeeStream;
    use crate::employee::Employee;
    use async_trait::async_trait;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::{mpsc, Notify};

    fn dto(id: &str, first: &str, last: &str, email: &str) -> EmployeeDto {
        EmployeeDto { id: id.into(), first_name: first.into(), last_name: last.into(), email: email.into() }
    }

    fn michael() -> EmployeeDto {
        dto("", "Michael", "Royf", "michael@gmail.com")
    }

    fn service() -> EmployeeService<InMemoryEmployeeRepository> {
        EmployeeService::new(Arc::new(InMemoryEmployeeRepository::new()))
    }

    #[tokio::test]
    async fn save_assigns_stable_identity() -> Result<(), ServiceError> {
        let svc = service();
        let saved = svc.save(michael()).await?;
        assert!(!saved.id.is_empty());

        let fetched = svc.get(&saved.id).await?.expect("saved employee is readable");
        assert_eq!(fetched, saved);
        assert_eq!(fetched.first_name, "Michael");
        assert_eq!(fetched.last_name, "Royf");
        assert_eq!(fetched.email, "michael@gmail.com");
        // a second read sees the same id
        assert_eq!(svc.get(&saved.id).await?.map(|d| d.id), Some(saved.id));
        Ok(())
    }

    #[tokio::test]
    async fn save_keeps_client_supplied_id() -> Result<(), ServiceError> {
        let svc = service();
        let saved = svc.save(dto("12345", "Dasha", "Petrova", "dasha@gmail.com")).await?;
        assert_eq!(saved.id, "12345");
        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_id_is_absent_not_error() -> Result<(), ServiceError> {
        assert_eq!(service().get("nonexistent").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn list_empty_store_is_empty_stream() -> Result<(), ServiceError> {
        let all: Vec<EmployeeDto> = service().list().try_collect().await?;
        assert!(all.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_returns_every_saved_employee() -> Result<(), ServiceError> {
        let svc = service();
        let a = svc.save(michael()).await?;
        let b = svc.save(dto("employeeId1", "Anna", "White", "anna@gmail.com")).await?;
        let mut all: Vec<EmployeeDto> = svc.list().try_collect().await?;
        all.sort_by(|x, y| x.id.cmp(&y.id));
        let mut expected = vec![a, b];
        expected.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(all, expected);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_id() -> Result<(), ServiceError> {
        let svc = service();
        svc.save(dto("X", "A", "B", "a@b.com")).await?;

        let updated = svc
            .update("X", dto("ignored", "AA", "BB", "aa@bb.com"))
            .await?
            .expect("X exists");
        assert_eq!(updated, dto("X", "AA", "BB", "aa@bb.com"));
        assert_eq!(svc.get("X").await?, Some(dto("X", "AA", "BB", "aa@bb.com")));
        assert_eq!(svc.get("ignored").await?, None);
        assert_eq!(svc.repository().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_id_writes_nothing() -> Result<(), ServiceError> {
        let svc = service();
        assert_eq!(svc.update("nonexistent", michael()).await?, None);
        assert!(svc.repository().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent() -> Result<(), ServiceError> {
        let svc = service();
        let saved = svc.save(michael()).await?;
        svc.delete(&saved.id).await?;
        svc.delete(&saved.id).await?;
        svc.delete("never-existed").await?;
        assert_eq!(svc.get(&saved.id).await?, None);
        Ok(())
    }

    /// Store whose every call fails.
    struct BrokenRepository;

    #[async_trait]
    impl EmployeeRepository for BrokenRepository {
        async fn upsert(&self, _: Employee) -> Result<Employee, ServiceError> {
            Err(ServiceError::Storage("connection refused".into()))
        }
        async fn find_by_id(&self, _: &str) -> Result<Option<Employee>, ServiceError> {
            Err(ServiceError::Storage("connection refused".into()))
        }
        fn find_all(&self) -> EmployeeStream {
            stream::iter([Err::<Employee, _>(ServiceError::Storage("connection refused".into()))]).boxed()
        }
        async fn delete_by_id(&self, _: &str) -> Result<(), ServiceError> {
            Err(ServiceError::Storage("connection refused".into()))
        }
        async fn delete_all(&self) -> Result<(), ServiceError> {
            Err(ServiceError::Storage("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_faults_propagate_unchanged() {
        let repo: Arc<dyn EmployeeRepository> = Arc::new(BrokenRepository);
        let svc = EmployeeService::new(repo);
        let is_storage = |e: &ServiceError| matches!(e, ServiceError::Storage(m) if m == "connection refused");

        assert!(is_storage(&svc.save(michael()).await.unwrap_err()));
        assert!(is_storage(&svc.get("X").await.unwrap_err()));
        assert!(is_storage(&svc.update("X", michael()).await.unwrap_err()));
        assert!(is_storage(&svc.delete("X").await.unwrap_err()));
        let first = svc.list().next().await.expect("one item");
        assert!(is_storage(&first.unwrap_err()));
    }

    /// Lookups wait on a gate; upserts are counted.
    #[derive(Default)]
    struct GatedRepository {
        inner: InMemoryEmployeeRepository,
        gate: Notify,
        upserts: AtomicUsize,
    }

    #[async_trait]
    impl EmployeeRepository for GatedRepository {
        async fn upsert(&self, e: Employee) -> Result<Employee, ServiceError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(e).await
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<Employee>, ServiceError> {
            self.gate.notified().await;
            self.inner.find_by_id(id).await
        }
        fn find_all(&self) -> EmployeeStream {
            self.inner.find_all()
        }
        async fn delete_by_id(&self, id: &str) -> Result<(), ServiceError> {
            self.inner.delete_by_id(id).await
        }
        async fn delete_all(&self) -> Result<(), ServiceError> {
            self.inner.delete_all().await
        }
    }

    #[tokio::test]
    async fn dropped_update_schedules_no_write() -> Result<(), ServiceError> {
        let repo = Arc::new(GatedRepository::default());
        repo.inner.upsert(Employee { id: "X".into(), first_name: "A".into(), last_name: "B".into(), email: "a@b.com".into() }).await?;
        let svc = EmployeeService::new(Arc::clone(&repo));

        let res = tokio::time::timeout(Duration::from_millis(20), svc.update("X", dto("", "AA", "BB", "aa@bb.com"))).await;
        assert!(res.is_err(), "lookup is still gated, so the update must time out");

        repo.gate.notify_waiters();
        tokio::task::yield_now().await;
        assert_eq!(repo.upserts.load(Ordering::SeqCst), 0);
        assert_eq!(repo.inner.find_by_id("X").await?.map(|e| e.first_name).as_deref(), Some("A"));
        Ok(())
    }

    /// Store whose `find_all` yields whatever is pushed into a channel.
    struct ChannelRepository {
        rx: Mutex<Option<mpsc::UnboundedReceiver<Employee>>>,
    }

    #[async_trait]
    impl EmployeeRepository for ChannelRepository {
        async fn upsert(&self, e: Employee) -> Result<Employee, ServiceError> { Ok(e) }
        async fn find_by_id(&self, _: &str) -> Result<Option<Employee>, ServiceError> { Ok(None) }
        fn find_all(&self) -> EmployeeStream {
            let rx = self.rx.lock().unwrap().take().expect("find_all called once");
            stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|e| (Ok::<_, ServiceError>(e), rx)) }).boxed()
        }
        async fn delete_by_id(&self, _: &str) -> Result<(), ServiceError> { Ok(()) }
        async fn delete_all(&self) -> Result<(), ServiceError> { Ok(()) }
    }

    #[tokio::test]
    async fn list_emits_before_store_finishes() -> Result<(), ServiceError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let svc = EmployeeService::new(Arc::new(ChannelRepository { rx: Mutex::new(Some(rx)) }));
        let mut all = svc.list();

        tx.send(Employee { id: "1".into(), first_name: "A".into(), last_name: "B".into(), email: "a@b.com".into() }).unwrap();
        let first = all.next().await.expect("first element")?;
        assert_eq!(first.id, "1");

        tx.send(Employee { id: "2".into(), first_name: "C".into(), last_name: "D".into(), email: "c@d.com".into() }).unwrap();
        drop(tx);
        let rest: Vec<EmployeeDto> = all.try_collect().await?;
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, "2");
        Ok(())
    }
}
