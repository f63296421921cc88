//! Employee module: wire DTO, entity mapping, store contract and the service
//! that composes them.

pub mod dto;
pub mod mapper;
pub mod repository;
pub mod repo;
pub mod service;

pub use dto::EmployeeDto;
pub use models::employee::Employee;
pub use repository::{EmployeeRepository, EmployeeStream};
pub use service::EmployeeService;
