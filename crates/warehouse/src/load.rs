//! Transactional load of dimensions, facts, and summary rows.
//!
//! Insert order follows the foreign-key dependencies: all three dimension
//! tables, then facts, then the summary. Everything runs inside a single
//! transaction with one commit at the end, so a constraint violation leaves
//! the store at its post-drop state with nothing committed.

use etl_core::{DimensionRow, Dimensions, Error, Result, SummaryRow, TicketRecord};
use sqlx::PgConnection;
use tracing::{debug, info};

use crate::client::WarehouseClient;

const INSERT_DIM_USERS: &str = "INSERT INTO dim_users (user_id, user_name) VALUES ($1, $2)";
const INSERT_DIM_PROJECTS: &str =
    "INSERT INTO dim_projects (project_id, project_name) VALUES ($1, $2)";
const INSERT_DIM_PRIORITIES: &str =
    "INSERT INTO dim_priorities (priority_id, priority_name) VALUES ($1, $2)";
const INSERT_FACT_TICKETS: &str = "\
INSERT INTO fact_tickets \
(ticket_id, user_id, project_id, priority_id, ticket_title, status, created_date, resolution_date, resolution_days) \
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)";
const INSERT_TICKET_SUMMARY: &str = "\
INSERT INTO ticket_summary \
(project_id, status, priority_id, ticket_count, avg_resolution_days) \
VALUES ($1, $2, $3, $4, $5)";

/// Row counts committed by a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounts {
    pub dimension_rows: usize,
    pub fact_rows: usize,
    pub summary_rows: usize,
}

impl LoadCounts {
    pub fn total(&self) -> usize {
        self.dimension_rows + self.fact_rows + self.summary_rows
    }
}

/// Loads the full run output into the warehouse and commits once.
pub async fn load_all(
    client: &WarehouseClient,
    dimensions: &Dimensions,
    facts: &[TicketRecord],
    summary: &[SummaryRow],
) -> Result<LoadCounts> {
    let mut tx = client
        .pool()
        .begin()
        .await
        .map_err(|e| Error::connection(format!("failed to open load transaction: {}", e)))?;

    let mut counts = LoadCounts::default();
    counts.dimension_rows +=
        insert_dimension(&mut tx, "dim_users", INSERT_DIM_USERS, &dimensions.users).await?;
    counts.dimension_rows += insert_dimension(
        &mut tx,
        "dim_projects",
        INSERT_DIM_PROJECTS,
        &dimensions.projects,
    )
    .await?;
    counts.dimension_rows += insert_dimension(
        &mut tx,
        "dim_priorities",
        INSERT_DIM_PRIORITIES,
        &dimensions.priorities,
    )
    .await?;
    counts.fact_rows = insert_facts(&mut tx, facts).await?;
    counts.summary_rows = insert_summary(&mut tx, summary).await?;

    tx.commit()
        .await
        .map_err(|e| Error::connection(format!("failed to commit load: {}", e)))?;

    info!(
        dimension_rows = counts.dimension_rows,
        fact_rows = counts.fact_rows,
        summary_rows = counts.summary_rows,
        "Load committed"
    );
    Ok(counts)
}

async fn insert_dimension(
    conn: &mut PgConnection,
    table: &'static str,
    sql: &str,
    rows: &[DimensionRow],
) -> Result<usize> {
    for row in rows {
        sqlx::query(sql)
            .bind(row.key)
            .bind(&row.name)
            .execute(&mut *conn)
            .await
            .map_err(|e| Error::load(table, format!("key {}: {}", row.key, e)))?;
    }
    debug!(table = table, count = rows.len(), "Inserted dimension rows");
    Ok(rows.len())
}

async fn insert_facts(conn: &mut PgConnection, facts: &[TicketRecord]) -> Result<usize> {
    for record in facts {
        sqlx::query(INSERT_FACT_TICKETS)
            .bind(record.ticket_id)
            .bind(record.user_id)
            .bind(record.project_id)
            .bind(record.priority_id)
            .bind(&record.ticket_title)
            .bind(record.status.as_str())
            .bind(record.created_date)
            .bind(record.resolution_date)
            .bind(record.resolution_days)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                Error::load("fact_tickets", format!("ticket {}: {}", record.ticket_id, e))
            })?;
    }
    debug!(count = facts.len(), "Inserted fact rows");
    Ok(facts.len())
}

async fn insert_summary(conn: &mut PgConnection, summary: &[SummaryRow]) -> Result<usize> {
    for row in summary {
        sqlx::query(INSERT_TICKET_SUMMARY)
            .bind(row.project_id)
            .bind(row.status.as_str())
            .bind(row.priority_id)
            .bind(row.ticket_count)
            .bind(row.avg_resolution_days)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                Error::load(
                    "ticket_summary",
                    format!(
                        "group ({}, {}, {}): {}",
                        row.project_id,
                        row.status.as_str(),
                        row.priority_id,
                        e
                    ),
                )
            })?;
    }
    debug!(count = summary.len(), "Inserted summary rows");
    Ok(summary.len())
}
