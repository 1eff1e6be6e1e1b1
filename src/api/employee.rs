use crate::model::employee::Employee;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E-001", value_type = String)]
    pub employee_id: Option<String>,
    #[schema(example = "Jane Doe", value_type = String)]
    pub full_name: Option<String>,
    #[schema(example = "jane.doe@company.com", format = "email", value_type = String)]
    pub email: Option<String>,
}

// Reports a per-field error and yields None, or passes the value through.
fn require<'a>(
    errors: &mut Map<String, Value>,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value {
        None => {
            errors.insert(field.to_string(), json!(["This field is required."]));
            None
        }
        Some(s) if s.trim().is_empty() => {
            errors.insert(field.to_string(), json!(["This field may not be blank."]));
            None
        }
        Some(s) => Some(s),
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "All employee records", body = Vec<Employee>)
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let employees = sqlx::query_as::<_, Employee>(
        "SELECT id, employee_id, full_name, email, created_at FROM employees ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Create Employee
///
/// `email` is trimmed + lowercased and `employee_id` trimmed + uppercased
/// before storage. `created_at` is always system-assigned; a caller-supplied value
/// is ignored.
#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Per-field validation errors", body = Object, example = json!({
            "email": ["Enter a valid email address."]
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let mut errors = Map::new();

    let employee_id = require(&mut errors, "employee_id", payload.employee_id.as_deref())
        .map(|s| s.trim().to_uppercase());
    let full_name =
        require(&mut errors, "full_name", payload.full_name.as_deref()).map(str::to_string);
    let email =
        require(&mut errors, "email", payload.email.as_deref()).map(|s| s.trim().to_lowercase());

    if let Some(email) = &email {
        if !looks_like_email(email) {
            errors.insert("email".to_string(), json!(["Enter a valid email address."]));
        }
    }

    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(Value::Object(errors)));
    }

    // All three are Some once validation passed
    let (employee_id, full_name, email) = (
        employee_id.unwrap_or_default(),
        full_name.unwrap_or_default(),
        email.unwrap_or_default(),
    );
    let created_at = Utc::now();

    let result = sqlx::query(
        "INSERT INTO employees (employee_id, full_name, email, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&employee_id)
    .bind(&full_name)
    .bind(&email)
    .bind(created_at)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let employee = Employee {
        id: result.last_insert_rowid(),
        employee_id,
        full_name,
        email,
        created_at,
    };

    Ok(HttpResponse::Created().json(employee))
}

/// Delete Employee
///
/// Cascades to every attendance record referencing the employee.
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(
        ("id" = i64, Path, description = "Employee numeric id")
    ),
    responses(
        (status = 204, description = "Employee and associated attendance deleted"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to delete employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::{db, routes};
    use actix_web::middleware::NormalizePath;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn create_normalizes_employee_id_and_email() {
        let pool = db::test_pool().await;
        let app = test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(pool))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees/")
            .set_json(json!({
                "employee_id": " e-001 ",
                "full_name": "Jane Doe",
                "email": " JANE@X.COM "
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["employee_id"], "E-001");
        assert_eq!(body["email"], "jane@x.com");
        assert_eq!(body["full_name"], "Jane Doe");
        assert!(body["id"].is_i64());
        assert!(body["created_at"].is_string());
    }

    #[actix_web::test]
    async fn create_ignores_caller_supplied_created_at() {
        let pool = db::test_pool().await;
        let app = test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(pool))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees/")
            .set_json(json!({
                "employee_id": "E-002",
                "full_name": "John Doe",
                "email": "john@x.com",
                "created_at": "1999-01-01T00:00:00Z"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_ne!(body["created_at"], "1999-01-01T00:00:00Z");
    }

    #[actix_web::test]
    async fn create_reports_errors_per_field() {
        let pool = db::test_pool().await;
        let app = test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(pool))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees/")
            .set_json(json!({
                "employee_id": "  ",
                "email": "not-an-email"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["employee_id"][0], "This field may not be blank.");
        assert_eq!(body["full_name"][0], "This field is required.");
        assert_eq!(body["email"][0], "Enter a valid email address.");
    }

    #[actix_web::test]
    async fn list_returns_all_employees_in_storage_order() {
        let pool = db::test_pool().await;
        let app = test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(pool))
                .configure(routes::configure),
        )
        .await;

        for (code, name, email) in [
            ("E-001", "Jane Doe", "jane@x.com"),
            ("E-002", "John Doe", "john@x.com"),
        ] {
            let req = test::TestRequest::post()
                .uri("/employees/")
                .set_json(json!({
                    "employee_id": code,
                    "full_name": name,
                    "email": email
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/employees/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["employee_id"], "E-001");
        assert_eq!(list[1]["employee_id"], "E-002");
    }

    #[actix_web::test]
    async fn delete_returns_204_then_404() {
        let pool = db::test_pool().await;
        let app = test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(pool))
                .configure(routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees/")
            .set_json(json!({
                "employee_id": "E-001",
                "full_name": "Jane Doe",
                "email": "jane@x.com"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_i64().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/employees/{id}/"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/employees/{id}/"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
