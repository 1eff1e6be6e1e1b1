use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

const CREATE_EMPLOYEES: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id TEXT NOT NULL,
    full_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    created_at  TEXT NOT NULL
)
"#;

const CREATE_ATTENDANCE: &str = r#"
CREATE TABLE IF NOT EXISTS attendance (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    employee INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    date     TEXT NOT NULL,
    status   TEXT NOT NULL,
    UNIQUE (employee, date)
)
"#;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true)
        // ON DELETE CASCADE is a no-op unless foreign_keys is on for the connection
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    init_schema(&pool)
        .await
        .expect("Failed to initialize schema");

    pool
}

pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_EMPLOYEES).execute(pool).await?;
    sqlx::query(CREATE_ATTENDANCE).execute(pool).await?;
    Ok(())
}

/// In-memory pool for handler tests. Single connection so every statement
/// sees the same memory database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    init_schema(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();
    }

    #[actix_web::test]
    async fn unique_constraint_rejects_second_row_for_same_employee_and_date() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO employees (employee_id, full_name, email, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind("E-001")
        .bind("Jane Doe")
        .bind("jane@x.com")
        .bind("2024-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .unwrap();

        let insert = "INSERT INTO attendance (employee, date, status) VALUES (1, '2024-01-10', 'present')";
        sqlx::query(insert).execute(&pool).await.unwrap();

        let err = sqlx::query(insert).execute(&pool).await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn deleting_employee_cascades_to_attendance() {
        let pool = test_pool().await;

        sqlx::query(
            "INSERT INTO employees (employee_id, full_name, email, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind("E-001")
        .bind("Jane Doe")
        .bind("jane@x.com")
        .bind("2024-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO attendance (employee, date, status) VALUES (1, '2024-01-10', 'present')")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM employees WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
