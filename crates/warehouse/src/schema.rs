//! Star-schema table definitions.
//!
//! Three dimension tables, one fact table referencing them, and one
//! pre-aggregated summary table. Setup is destructive: every run drops and
//! recreates the full schema, so there is no migration surface.

use crate::client::WarehouseClient;
use etl_core::{Error, Result};
use tracing::info;

/// SQL for creating the user dimension.
pub const CREATE_DIM_USERS: &str = r#"
CREATE TABLE dim_users (
    user_id INTEGER PRIMARY KEY,
    user_name VARCHAR(100)
)
"#;

/// SQL for creating the project dimension.
pub const CREATE_DIM_PROJECTS: &str = r#"
CREATE TABLE dim_projects (
    project_id INTEGER PRIMARY KEY,
    project_name VARCHAR(100)
)
"#;

/// SQL for creating the priority dimension.
pub const CREATE_DIM_PRIORITIES: &str = r#"
CREATE TABLE dim_priorities (
    priority_id INTEGER PRIMARY KEY,
    priority_name VARCHAR(50)
)
"#;

/// SQL for creating the fact table.
///
/// One row per enriched record; resolution columns are nullable because
/// only closed tickets carry them.
pub const CREATE_FACT_TICKETS: &str = r#"
CREATE TABLE fact_tickets (
    ticket_id INTEGER PRIMARY KEY,
    user_id INTEGER REFERENCES dim_users(user_id),
    project_id INTEGER REFERENCES dim_projects(project_id),
    priority_id INTEGER REFERENCES dim_priorities(priority_id),
    ticket_title VARCHAR(255),
    status VARCHAR(50),
    created_date DATE,
    resolution_date DATE,
    resolution_days INTEGER
)
"#;

/// SQL for creating the pre-aggregated summary table.
pub const CREATE_TICKET_SUMMARY: &str = r#"
CREATE TABLE ticket_summary (
    project_id INTEGER,
    status VARCHAR(50),
    priority_id INTEGER,
    ticket_count INTEGER,
    avg_resolution_days FLOAT,
    PRIMARY KEY (project_id, status, priority_id)
)
"#;

/// Drop statements, fact and summary before the dimensions they reference.
pub fn drop_statements() -> Vec<&'static str> {
    vec![
        "DROP TABLE IF EXISTS fact_tickets",
        "DROP TABLE IF EXISTS ticket_summary",
        "DROP TABLE IF EXISTS dim_users",
        "DROP TABLE IF EXISTS dim_projects",
        "DROP TABLE IF EXISTS dim_priorities",
    ]
}

/// Create statements, dimensions before the fact table that references them.
pub fn create_statements() -> Vec<&'static str> {
    vec![
        CREATE_DIM_USERS,
        CREATE_DIM_PROJECTS,
        CREATE_DIM_PRIORITIES,
        CREATE_FACT_TICKETS,
        CREATE_TICKET_SUMMARY,
    ]
}

/// Drops and recreates the full star schema in one transaction.
///
/// Idempotent: running it twice leaves the same empty schema. Any DDL
/// failure rolls the transaction back and is fatal to the run.
pub async fn recreate_schema(client: &WarehouseClient) -> Result<()> {
    let mut tx = client
        .pool()
        .begin()
        .await
        .map_err(|e| Error::connection(format!("failed to open schema transaction: {}", e)))?;

    for sql in drop_statements().into_iter().chain(create_statements()) {
        sqlx::query(sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::schema(format!("DDL failed: {}: {}", first_line(sql), e)))?;
    }

    tx.commit()
        .await
        .map_err(|e| Error::schema(format!("failed to commit schema: {}", e)))?;

    info!("Recreated star schema (3 dimensions, fact, summary)");
    Ok(())
}

fn first_line(sql: &str) -> &str {
    sql.trim().lines().next().unwrap_or_default()
}
