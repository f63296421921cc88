//! Store adapters behind [`EmployeeRepository`](super::repository::EmployeeRepository).

pub mod memory;
pub mod json_file;
pub mod seaorm;

pub use json_file::JsonFileEmployeeRepository;
pub use memory::InMemoryEmployeeRepository;
pub use seaorm::SeaOrmEmployeeRepository;
