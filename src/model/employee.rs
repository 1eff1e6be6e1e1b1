use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "E-001",
        "full_name": "Jane Doe",
        "email": "jane.doe@company.com",
        "created_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    /// Externally assigned code, stored trimmed and uppercased.
    #[schema(example = "E-001")]
    pub employee_id: String,

    #[schema(example = "Jane Doe")]
    pub full_name: String,

    /// Stored trimmed and lowercased.
    #[schema(example = "jane.doe@company.com")]
    pub email: String,

    #[schema(
        example = "2024-01-01T09:00:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,
}
