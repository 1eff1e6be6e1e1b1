use crate::model::attendance::AttendanceRecord;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

const DUPLICATE_MESSAGE: &str = "Attendance for this employee on this date already exists.";

const SELECT_RECORDS: &str = r#"
SELECT
    a.id,
    a.employee,
    a.date,
    a.status,
    e.full_name   AS employee_name,
    e.employee_id AS employee_id_code
FROM attendance a
JOIN employees e ON e.id = a.employee
"#;

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    fn as_str(&self) -> &str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "present" => Some(AttendanceStatus::Present),
            "absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateAttendance {
    /// Owning employee's numeric id.
    #[schema(example = 1, value_type = i64)]
    pub employee: Option<i64>,
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub date: Option<String>,
    #[schema(example = "present", value_type = String)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceFilter {
    /// Filter by employee numeric id
    pub employee: Option<i64>,
    /// Filter by exact date (YYYY-MM-DD)
    #[param(value_type = String, format = "date")]
    pub date: Option<NaiveDate>,
    /// Filter by status (present | absent)
    pub status: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    I64(i64),
    Str(&'a str),
    Date(NaiveDate),
}

/// List Attendance
///
/// Filters are independently optional and combined with AND.
#[utoipa::path(
    get,
    path = "/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = Vec<AttendanceRecord>),
        (status = 400, description = "Status filter outside the enumeration", body = Object, example = json!({
            "status": ["\"late\" is not a valid choice."]
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<HttpResponse> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee) = query.employee {
        where_sql.push_str(" AND a.employee = ?");
        args.push(FilterValue::I64(employee));
    }

    if let Some(date) = query.date {
        where_sql.push_str(" AND a.date = ?");
        args.push(FilterValue::Date(date));
    }

    if let Some(status) = query.status.as_deref() {
        if AttendanceStatus::parse(status).is_none() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "status": [format!("\"{status}\" is not a valid choice.")]
            })));
        }
        where_sql.push_str(" AND a.status = ?");
        args.push(FilterValue::Str(status));
    }

    let sql = format!("{SELECT_RECORDS}{where_sql} ORDER BY a.date DESC");

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&sql);
    for arg in args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s.to_string()),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch attendance list");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}

// The pre-create existence check is advisory; the UNIQUE (employee, date)
// constraint is the source of truth, so a race loser lands here and gets the
// same message instead of a raw storage error.
fn map_create_error(err: sqlx::Error) -> actix_web::Result<HttpResponse> {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "non_field_errors": [DUPLICATE_MESSAGE]
            })));
        }
        if db_err.is_foreign_key_violation() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "employee": ["Employee does not exist."]
            })));
        }
    }

    error!(error = %err, "Failed to create attendance record");
    Err(actix_web::error::ErrorInternalServerError(
        "Internal Server Error",
    ))
}

/// Create Attendance
///
/// Rejected when a record already exists for the same employee and date.
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance record created", body = AttendanceRecord),
        (status = 400, description = "Validation error", body = Object, example = json!({
            "non_field_errors": ["Attendance for this employee on this date already exists."]
        }))
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateAttendance>,
) -> actix_web::Result<HttpResponse> {
    let mut errors = Map::new();

    let employee = match payload.employee {
        Some(id) => Some(id),
        None => {
            errors.insert("employee".to_string(), json!(["This field is required."]));
            None
        }
    };

    let date = match payload.date.as_deref() {
        None => {
            errors.insert("date".to_string(), json!(["This field is required."]));
            None
        }
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                errors.insert(
                    "date".to_string(),
                    json!(["Date has wrong format. Expected YYYY-MM-DD."]),
                );
                None
            }
        },
    };

    let status = match payload.status.as_deref() {
        None => {
            errors.insert("status".to_string(), json!(["This field is required."]));
            None
        }
        Some(raw) => match AttendanceStatus::parse(raw) {
            Some(s) => Some(s),
            None => {
                errors.insert(
                    "status".to_string(),
                    json!([format!("\"{raw}\" is not a valid choice.")]),
                );
                None
            }
        },
    };

    let (Some(employee), Some(date), Some(status)) = (employee, date, status) else {
        return Ok(HttpResponse::BadRequest().json(Value::Object(errors)));
    };

    // Fast-path duplicate check before hitting the unique constraint
    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE employee = ? AND date = ?",
    )
    .bind(employee)
    .bind(date)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee, "Duplicate pre-check failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if existing > 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "non_field_errors": [DUPLICATE_MESSAGE]
        })));
    }

    let result = sqlx::query("INSERT INTO attendance (employee, date, status) VALUES (?, ?, ?)")
        .bind(employee)
        .bind(date)
        .bind(status.as_str())
        .execute(pool.get_ref())
        .await;

    let result = match result {
        Ok(r) => r,
        Err(e) => return map_create_error(e),
    };

    let record = sqlx::query_as::<_, AttendanceRecord>(&format!("{SELECT_RECORDS} WHERE a.id = ?"))
        .bind(result.last_insert_rowid())
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created attendance record");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(record))
}

/// List Attendance by Employee
///
/// An unknown employee id yields an empty array, not a 404.
#[utoipa::path(
    get,
    path = "/attendance/employee/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Employee numeric id")
    ),
    responses(
        (status = 200, description = "Attendance records for the employee, newest date first", body = Vec<AttendanceRecord>)
    ),
    tag = "Attendance"
)]
pub async fn list_by_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<HttpResponse> {
    let employee_id = path.into_inner();

    let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
        "{SELECT_RECORDS} WHERE a.employee = ? ORDER BY a.date DESC"
    ))
    .bind(employee_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch attendance for employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}
