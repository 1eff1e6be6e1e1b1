use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Read representation of an attendance row. `employee_name` and
/// `employee_id_code` are denormalized from the employees table so callers
/// never join manually.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee": 1,
        "date": "2024-01-10",
        "status": "present",
        "employee_name": "Jane Doe",
        "employee_id_code": "E-001"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,

    /// Owning employee's numeric id.
    #[schema(example = 1)]
    pub employee: i64,

    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "present")]
    pub status: String,

    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    #[schema(example = "E-001")]
    pub employee_id_code: String,
}
