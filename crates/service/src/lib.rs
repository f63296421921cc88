//! Service layer providing the employee operations on top of the stores.
//! - `employee::service` orchestrates store calls and mapping, never blocking.
//! - `employee::repo` holds the store adapters (memory, JSON file, SeaORM).
//! - Faults surface as `ServiceError`; absence surfaces as `Ok(None)`.

pub mod errors;
pub mod employee;
pub mod storage;
