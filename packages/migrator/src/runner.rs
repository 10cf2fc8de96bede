//! Table-by-table migration driver.
//!
//! Tenants and content types are enumerated in a fixed order and each table
//! is processed inside its own transaction. A row that fails to update is
//! logged and counted, and the table carries on; a table that fails to read
//! is rolled back and contributes nothing. Only the initial connection
//! failure is fatal to the job as a whole.

use common::rewrite::{rewrite_content_blocks, rewrite_image_array};
use common::{ContentType, FieldValue, Tenant, UrlNormalizer};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, QueryResult,
    Statement, TransactionTrait, Value,
};
use serde_json::Value as JsonValue;
use tracing::{debug, error, info, warn};

/// Counters for a single table.
#[derive(Debug, Default)]
pub struct TableOutcome {
    pub rows: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Aggregated counters for the whole job.
#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub tables: usize,
    pub skipped_tables: usize,
    pub rows: usize,
    pub updated: usize,
    pub failed: usize,
}

impl MigrationSummary {
    fn absorb(&mut self, outcome: &TableOutcome) {
        self.tables += 1;
        self.rows += outcome.rows;
        self.updated += outcome.updated;
        self.failed += outcome.failed;
    }
}

/// Runs the migration across every tenant × content-type table, strictly
/// sequentially.
pub async fn run(db: &DatabaseConnection, normalizer: &UrlNormalizer) -> MigrationSummary {
    let mut summary = MigrationSummary::default();

    for tenant in Tenant::ALL {
        info!(tenant = %tenant, "Processing tenant");

        for content_type in ContentType::ALL {
            if !content_type.exists_for(tenant) {
                continue;
            }
            let table = content_type.table_name(tenant);

            match migrate_table(db, normalizer, &table, content_type).await {
                Ok(outcome) => {
                    info!(
                        table = %table,
                        rows = outcome.rows,
                        updated = outcome.updated,
                        failed = outcome.failed,
                        "Table done"
                    );
                    summary.absorb(&outcome);
                }
                Err(e) => {
                    error!(table = %table, error = %e, "Table failed, rolled back");
                    summary.skipped_tables += 1;
                }
            }
        }
    }

    summary
}

async fn migrate_table(
    db: &DatabaseConnection,
    normalizer: &UrlNormalizer,
    table: &str,
    content_type: ContentType,
) -> Result<TableOutcome, DbErr> {
    let txn = db.begin().await?;

    match process_table(&txn, normalizer, table, content_type).await {
        Ok(outcome) => {
            txn.commit().await?;
            Ok(outcome)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(table = %table, error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

async fn process_table(
    txn: &DatabaseTransaction,
    normalizer: &UrlNormalizer,
    table: &str,
    content_type: ContentType,
) -> Result<TableOutcome, DbErr> {
    let select = format!("SELECT id, content_blocks, images FROM {table}");
    let rows = txn
        .query_all_raw(Statement::from_string(DbBackend::Postgres, select.as_str()))
        .await?;

    let mut outcome = TableOutcome {
        rows: rows.len(),
        ..TableOutcome::default()
    };

    for row in &rows {
        let id: i64 = row.try_get("", "id")?;
        let blocks = field_value(row, "content_blocks");
        let images = field_value(row, "images");

        let new_blocks = blocks
            .as_ref()
            .and_then(|field| rewrite_content_blocks(normalizer, field, content_type));
        let new_images = images
            .as_ref()
            .and_then(|field| rewrite_image_array(normalizer, field, content_type));

        if new_blocks.is_none() && new_images.is_none() {
            continue;
        }

        // Each row is attempted exactly once; a failure is counted and the
        // table carries on.
        let update = update_statement(table, id, new_blocks.as_ref(), new_images.as_ref());
        match txn.execute_raw(update).await {
            Ok(_) => {
                debug!(table = %table, id, "Row updated");
                outcome.updated += 1;
            }
            Err(e) => {
                warn!(table = %table, id, error = %e, "Row update failed");
                outcome.failed += 1;
            }
        }
    }

    Ok(outcome)
}

/// Reads a document column that may arrive as jsonb or as JSON-bearing
/// text. `None` for SQL null (or a column of neither shape), which the
/// rewriters treat as nothing to do.
fn field_value(row: &QueryResult, column: &str) -> Option<FieldValue> {
    if let Ok(Some(value)) = row.try_get::<Option<JsonValue>>("", column) {
        return Some(FieldValue::Json(value));
    }
    if let Ok(Some(text)) = row.try_get::<Option<String>>("", column) {
        return Some(FieldValue::Text(text));
    }
    None
}

/// Builds the write-back statement for one row, covering only the columns
/// that actually changed.
fn update_statement(
    table: &str,
    id: i64,
    blocks: Option<&FieldValue>,
    images: Option<&FieldValue>,
) -> Statement {
    let mut assignments = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(field) = blocks {
        values.push(bind_value(field));
        assignments.push(format!("content_blocks = ${}", values.len()));
    }
    if let Some(field) = images {
        values.push(bind_value(field));
        assignments.push(format!("images = ${}", values.len()));
    }
    values.push(id.into());

    let sql = format!(
        "UPDATE {table} SET {} WHERE id = ${}",
        assignments.join(", "),
        values.len()
    );
    Statement::from_sql_and_values(DbBackend::Postgres, sql.as_str(), values)
}

/// Binds a field back in the representation it was read in.
fn bind_value(field: &FieldValue) -> Value {
    match field {
        FieldValue::Text(text) => text.clone().into(),
        FieldValue::Json(json) => Value::Json(Some(Box::new(json.clone()))),
    }
}
