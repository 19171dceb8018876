use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::{ColumnInfo, DataType, Schema, TableSchema};
use crate::error::SchemaError;

/// Builds a schema snapshot from a live SQLite database
pub async fn introspect(pool: &SqlitePool) -> Result<Schema, SchemaError> {
    let table_names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT name FROM sqlite_master
        WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut schema = Schema::new();
    for name in table_names {
        let table = introspect_table(pool, &name).await?;
        debug!(
            "Introspected table {} ({} columns, {} unique keys)",
            name,
            table.columns.len(),
            table.unique_keys.len()
        );
        schema = schema.table(table);
    }

    Ok(schema)
}

async fn introspect_table(pool: &SqlitePool, name: &str) -> Result<TableSchema, SchemaError> {
    let mut table = TableSchema::new(name);

    let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_identifier(name)))
        .fetch_all(pool)
        .await?;

    for row in rows {
        let column: String = row.try_get("name")?;
        let declared: String = row.try_get("type")?;
        let not_null: i64 = row.try_get("notnull")?;
        let default: Option<String> = row.try_get("dflt_value")?;
        let primary_key: i64 = row.try_get("pk")?;

        let (data_type, max_length) = DataType::from_declared(&declared);
        let mut info = ColumnInfo::new(data_type);
        info.not_null = not_null != 0;
        info.default = default;
        info.max_length = max_length;
        // INTEGER PRIMARY KEY aliases the rowid
        info.auto_increment =
            primary_key == 1 && declared.trim().eq_ignore_ascii_case("integer");

        table = table.column(&column, info);
    }

    let indexes = sqlx::query(&format!("PRAGMA index_list({})", quote_identifier(name)))
        .fetch_all(pool)
        .await?;

    for index in indexes {
        let unique: i64 = index.try_get("unique")?;
        let origin: String = index.try_get("origin")?;
        if unique == 0 || origin == "pk" {
            continue;
        }

        let index_name: String = index.try_get("name")?;
        let mut key_columns = sqlx::query(&format!(
            "PRAGMA index_info({})",
            quote_identifier(&index_name)
        ))
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| {
            let seqno: i64 = row.try_get("seqno")?;
            let column: Option<String> = row.try_get("name")?;
            Ok((seqno, column))
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        key_columns.sort_by_key(|(seqno, _)| *seqno);
        // Expression indexes have no column name and cannot back a unique key
        let columns: Option<Vec<String>> =
            key_columns.into_iter().map(|(_, column)| column).collect();
        if let Some(columns) = columns {
            table = table.unique(columns);
        }
    }

    Ok(table)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
