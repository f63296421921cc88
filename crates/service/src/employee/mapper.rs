//! Lossless conversion between the stored record and the wire DTO.
//!
//! Both directions are plain field copies with no validation and no I/O.

use super::dto::EmployeeDto;
use models::employee::Employee;

/// DTO to persisted form. An empty id is carried through for the store to fill.
pub fn to_entity(dto: EmployeeDto) -> Employee {
    Employee {
        id: dto.id,
        first_name: dto.first_name,
        last_name: dto.last_name,
        email: dto.email,
    }
}

pub fn to_dto(entity: Employee) -> EmployeeDto {
    EmployeeDto {
        id: entity.id,
        first_name: entity.first_name,
        last_name: entity.last_name,
        email: entity.email,
    }
}

impl From<Employee> for EmployeeDto {
    fn from(entity: Employee) -> Self { to_dto(entity) }
}

impl From<EmployeeDto> for Employee {
    fn from(dto: EmployeeDto) -> Self { to_entity(dto) }
}
