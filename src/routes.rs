use crate::api::{attendance, employee};
use actix_web::{HttpResponse, web};
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Deserialization failures come back as structured JSON, not plain text
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "message": message })),
        )
        .into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "message": message })),
        )
        .into()
    }));

    cfg.service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employees/{id}
            .service(web::resource("/{id}").route(web::delete().to(employee::delete_employee))),
    );

    cfg.service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::create_attendance)),
            )
            // /attendance/employee/{employee_id}
            .service(
                web::resource("/employee/{employee_id}")
                    .route(web::get().to(attendance::list_by_employee)),
            ),
    );
}
