use serde::{Deserialize, Deserializer, Serialize};

/// Wire form of an employee.
///
/// Field-for-field the same as the persisted record today; kept separate so
/// the JSON contract can change without touching storage. `id` may be empty
/// or omitted on create, in which case the store assigns one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}
