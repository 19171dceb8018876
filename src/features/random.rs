use async_trait::async_trait;
use tracing::{debug, warn};

use super::RandomColumnSpec;
use crate::error::{Error, Result};
use crate::hooks::{Listener, ModelContext};
use crate::record::RecordState;
use crate::value::Value;

/// Fills random-string columns on records that are not yet persisted
///
/// Columns covered by a single-column unique key are probed against the
/// table until a value is found that no existing row uses, up to
/// `Settings::random_max_attempts` candidates.
pub struct SetRandomStrings;

impl SetRandomStrings {
    async fn generate_unique(
        &self,
        ctx: &ModelContext<'_>,
        column: &str,
        spec: RandomColumnSpec,
    ) -> Result<String> {
        let services = ctx.services;
        let max_attempts = ctx.settings.random_max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let candidate = services.random.generate(spec.length, spec.charset);
            let sql = format!(
                "SELECT {column} FROM {table} WHERE {column} = '{value}'",
                column = column,
                table = ctx.table,
                value = services.database.escape_string(&candidate)
            );

            if services.database.query(&sql).await?.returned_rows() == 0 {
                return Ok(candidate);
            }

            debug!(
                "Random value for {}.{} collided (attempt {}/{})",
                ctx.class, column, attempt, max_attempts
            );
            if attempt == max_attempts / 2 {
                warn!(
                    "Half of the attempts to find a unique value for {}.{} collided; the keyspace of {} {} characters may be nearly exhausted",
                    ctx.class, column, spec.length, spec.charset
                );
            }
        }

        Err(Error::RandomExhausted {
            class: ctx.class.to_string(),
            column: column.to_string(),
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl Listener for SetRandomStrings {
    fn name(&self) -> &str {
        "column_features::set_random_strings"
    }

    fn description(&self) -> &str {
        "Generates random strings for random columns of new records"
    }

    async fn execute(&self, ctx: &ModelContext<'_>, state: &mut RecordState) -> Result<()> {
        if ctx.exists {
            return Ok(());
        }

        let columns = ctx.features.random_columns(ctx.class);
        if columns.is_empty() {
            return Ok(());
        }
        let unique_keys = ctx.services.schema.unique_keys(&ctx.table)?;

        for (column, spec) in columns {
            state.remember(column);

            let is_unique = unique_keys
                .iter()
                .any(|key| key.len() == 1 && key[0] == column);
            let value = if is_unique {
                self.generate_unique(ctx, column, spec).await?
            } else {
                ctx.services.random.generate(spec.length, spec.charset)
            };

            state.set(column, Value::Text(value));
        }
        Ok(())
    }
}
