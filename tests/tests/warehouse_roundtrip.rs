//! Live-database round trip: schema recreate, load, analytics.
//!
//! Requires a reachable PostgreSQL instance and is skipped unless
//! `TICKET_ETL_TEST_DATABASE` names a database the default credentials (or
//! the `TICKET_ETL_TEST_PG_*` overrides) can reach. The schema in that
//! database is dropped and recreated.

use etl_core::{build_dimensions, summarize, Error};
use integration_tests::fixtures;
use warehouse_client::{analytics, load, schema, AnalyticsParams, WarehouseClient, WarehouseConfig};

fn test_config() -> Option<WarehouseConfig> {
    let database = std::env::var("TICKET_ETL_TEST_DATABASE").ok()?;
    let mut config = WarehouseConfig {
        database,
        ..WarehouseConfig::default()
    };
    if let Ok(host) = std::env::var("TICKET_ETL_TEST_PG_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("TICKET_ETL_TEST_PG_PORT") {
        config.port = port.parse().expect("valid test port");
    }
    if let Ok(username) = std::env::var("TICKET_ETL_TEST_PG_USERNAME") {
        config.username = username;
    }
    if let Ok(password) = std::env::var("TICKET_ETL_TEST_PG_PASSWORD") {
        config.password = password;
    }
    Some(config)
}

async fn count(client: &WarehouseClient, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(client.pool())
        .await
        .expect("count query")
}

#[tokio::test]
async fn test_full_roundtrip() {
    let Some(config) = test_config() else {
        eprintln!("TICKET_ETL_TEST_DATABASE not set; skipping live warehouse test");
        return;
    };
    let client = WarehouseClient::connect(config).await.expect("connect");

    // Schema setup is idempotent: a second recreate leaves the same empty schema.
    schema::recreate_schema(&client).await.expect("first recreate");
    schema::recreate_schema(&client).await.expect("second recreate");
    for table in ["dim_users", "dim_projects", "dim_priorities", "fact_tickets", "ticket_summary"] {
        assert_eq!(count(&client, table).await, 0, "{} not empty", table);
    }

    let records = fixtures::enriched_batch(42);
    let dimensions = build_dimensions(&records);
    let summary = summarize(&records);

    let counts = load::load_all(&client, &dimensions, &records, &summary)
        .await
        .expect("load");
    assert_eq!(counts.fact_rows, records.len());
    assert_eq!(count(&client, "fact_tickets").await, records.len() as i64);
    assert_eq!(count(&client, "ticket_summary").await, summary.len() as i64);

    // Reloading the same facts without a recreate violates the fact PK and
    // commits nothing.
    let before = count(&client, "fact_tickets").await;
    let err = load::load_all(&client, &dimensions, &records, &summary)
        .await
        .expect_err("duplicate load must fail");
    assert!(matches!(err, Error::Load { table: "dim_users", .. }));
    assert_eq!(count(&client, "fact_tickets").await, before);

    // Analytics battery runs over the committed schema.
    let report = analytics::run_all(&client, &AnalyticsParams::default())
        .await
        .expect("analytics");
    let distributed: i64 = report.distribution.iter().map(|r| r.ticket_count).sum();
    assert_eq!(distributed, records.len() as i64);

    client.close().await;
}
