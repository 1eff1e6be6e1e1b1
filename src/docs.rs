use crate::api::attendance::{AttendanceStatus, CreateAttendance};
use crate::api::employee::CreateEmployee;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Stores employee records and daily attendance statuses.

### Key Features
- **Employee Directory**
  - List, create, and delete employee records
- **Attendance Ledger**
  - One record per employee per day, filterable by employee, date, and status

### Response Format
- JSON-based RESTful responses
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::list_by_employee,
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            AttendanceRecord,
            CreateAttendance,
            AttendanceStatus
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance ledger APIs"),
    )
)]
pub struct ApiDoc;
