//! Read-only analytics over the loaded star schema.
//!
//! Four fixed queries, run in order after the load commits:
//! 1. Open-ticket aging past a threshold, by project
//! 2. Per-user average resolution ranking over closed tickets
//! 3. Priority/status distribution per project
//! 4. Monthly ticket creation trend per project
//!
//! No transform logic lives here; these consume only the schema contract.

use etl_core::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::debug;

use crate::client::WarehouseClient;

/// Tunable analytics parameters.
///
/// Defaults match the traditional report: tickets open for more than 30
/// days count as aged, and the productivity ranking only considers users
/// with more than one closed ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsParams {
    #[serde(default = "default_aging_threshold_days")]
    pub aging_threshold_days: i32,
    #[serde(default = "default_min_closed_tickets")]
    pub min_closed_tickets: i64,
}

fn default_aging_threshold_days() -> i32 {
    30
}

fn default_min_closed_tickets() -> i64 {
    1
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            aging_threshold_days: default_aging_threshold_days(),
            min_closed_tickets: default_min_closed_tickets(),
        }
    }
}

/// Open tickets older than the aging threshold, per project.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectAging {
    pub project_name: String,
    pub aged_tickets: i64,
}

/// Per-user resolution performance over closed tickets.
#[derive(Debug, Clone, FromRow)]
pub struct UserProductivity {
    pub user_name: String,
    pub total_tickets: i64,
    pub avg_resolution_days: f64,
    pub resolution_rank: i64,
}

/// Ticket count per (project, priority, status) cell.
#[derive(Debug, Clone, FromRow)]
pub struct PriorityDistribution {
    pub project_name: String,
    pub priority_name: String,
    pub status: String,
    pub ticket_count: i64,
}

/// Tickets created per project and calendar month.
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyTrend {
    pub project_name: String,
    pub year: i32,
    pub month: i32,
    pub ticket_count: i64,
}

/// All four result sets of one analytics run, in report order.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsReport {
    pub aging: Vec<ProjectAging>,
    pub productivity: Vec<UserProductivity>,
    pub distribution: Vec<PriorityDistribution>,
    pub monthly_trend: Vec<MonthlyTrend>,
}

/// Counts open tickets older than the threshold, grouped by project.
pub async fn open_ticket_aging(
    client: &WarehouseClient,
    threshold_days: i32,
) -> Result<Vec<ProjectAging>> {
    let rows = sqlx::query_as::<_, ProjectAging>(
        r#"
        SELECT p.project_name, COUNT(*) AS aged_tickets
        FROM fact_tickets t
        JOIN dim_projects p ON t.project_id = p.project_id
        WHERE t.status = 'Open'
        AND CURRENT_DATE - t.created_date > $1
        GROUP BY p.project_name
        ORDER BY aged_tickets DESC
        "#,
    )
    .bind(threshold_days)
    .fetch_all(client.pool())
    .await
    .map_err(|e| Error::query(format!("ticket aging: {}", e)))?;

    debug!(rows = rows.len(), "Ran ticket aging query");
    Ok(rows)
}

/// Ranks users by average resolution time over closed tickets, fastest
/// first, restricted to users with more than `min_closed_tickets` closed
/// tickets. Top 5 only.
pub async fn user_productivity(
    client: &WarehouseClient,
    min_closed_tickets: i64,
) -> Result<Vec<UserProductivity>> {
    let rows = sqlx::query_as::<_, UserProductivity>(
        r#"
        SELECT u.user_name,
               COUNT(t.ticket_id) AS total_tickets,
               AVG(t.resolution_days)::float8 AS avg_resolution_days,
               RANK() OVER (ORDER BY AVG(t.resolution_days) ASC) AS resolution_rank
        FROM fact_tickets t
        JOIN dim_users u ON t.user_id = u.user_id
        WHERE t.status = 'Closed'
        GROUP BY u.user_name
        HAVING COUNT(t.ticket_id) > $1
        ORDER BY resolution_rank
        LIMIT 5
        "#,
    )
    .bind(min_closed_tickets)
    .fetch_all(client.pool())
    .await
    .map_err(|e| Error::query(format!("user productivity: {}", e)))?;

    debug!(rows = rows.len(), "Ran user productivity query");
    Ok(rows)
}

/// Full priority/status distribution per project.
pub async fn priority_distribution(
    client: &WarehouseClient,
) -> Result<Vec<PriorityDistribution>> {
    let rows = sqlx::query_as::<_, PriorityDistribution>(
        r#"
        SELECT p.project_name, pr.priority_name, t.status, COUNT(*) AS ticket_count
        FROM fact_tickets t
        JOIN dim_projects p ON t.project_id = p.project_id
        JOIN dim_priorities pr ON t.priority_id = pr.priority_id
        GROUP BY p.project_name, pr.priority_name, t.status
        ORDER BY p.project_name, pr.priority_name, t.status
        "#,
    )
    .fetch_all(client.pool())
    .await
    .map_err(|e| Error::query(format!("priority distribution: {}", e)))?;

    debug!(rows = rows.len(), "Ran priority distribution query");
    Ok(rows)
}

/// Monthly ticket creation counts per project.
pub async fn monthly_trend(client: &WarehouseClient) -> Result<Vec<MonthlyTrend>> {
    let rows = sqlx::query_as::<_, MonthlyTrend>(
        r#"
        SELECT p.project_name,
               EXTRACT(YEAR FROM t.created_date)::int AS year,
               EXTRACT(MONTH FROM t.created_date)::int AS month,
               COUNT(*) AS ticket_count
        FROM fact_tickets t
        JOIN dim_projects p ON t.project_id = p.project_id
        GROUP BY p.project_name, EXTRACT(YEAR FROM t.created_date), EXTRACT(MONTH FROM t.created_date)
        ORDER BY p.project_name, year, month
        "#,
    )
    .fetch_all(client.pool())
    .await
    .map_err(|e| Error::query(format!("monthly trend: {}", e)))?;

    debug!(rows = rows.len(), "Ran monthly trend query");
    Ok(rows)
}

/// Runs the full battery in report order.
pub async fn run_all(
    client: &WarehouseClient,
    params: &AnalyticsParams,
) -> Result<AnalyticsReport> {
    Ok(AnalyticsReport {
        aging: open_ticket_aging(client, params.aging_threshold_days).await?,
        productivity: user_productivity(client, params.min_closed_tickets).await?,
        distribution: priority_distribution(client).await?,
        monthly_trend: monthly_trend(client).await?,
    })
}
