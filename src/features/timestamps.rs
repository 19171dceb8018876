//! Date created / date updated columns.

use async_trait::async_trait;

use crate::error::Result;
use crate::hooks::{Listener, ModelContext};
use crate::record::RecordState;
use crate::schema::FeatureTag;
use crate::value::{Value, TIMESTAMP_FORMAT};

fn current_timestamp(ctx: &ModelContext<'_>, column: &str) -> Value {
    let now = ctx.services.clock.now().format(TIMESTAMP_FORMAT).to_string();
    ctx.services.objectifier.objectify(&ctx.table, column, &now)
}

/// Stamps date created columns on records that are not yet persisted
pub struct SetDateCreated;

#[async_trait]
impl Listener for SetDateCreated {
    fn name(&self) -> &str {
        "column_features::set_date_created"
    }

    fn description(&self) -> &str {
        "Sets date created columns to the current time when a new record is saved"
    }

    async fn execute(&self, ctx: &ModelContext<'_>, state: &mut RecordState) -> Result<()> {
        if ctx.exists {
            return Ok(());
        }

        for column in ctx.features.columns_with(ctx.class, FeatureTag::DateCreated) {
            state.remember(column);
            state.set(column, current_timestamp(ctx, column));
        }
        Ok(())
    }
}

/// Stamps date updated columns on every save
pub struct SetDateUpdated;

#[async_trait]
impl Listener for SetDateUpdated {
    fn name(&self) -> &str {
        "column_features::set_date_updated"
    }

    fn description(&self) -> &str {
        "Sets date updated columns to the current time whenever a record is saved"
    }

    async fn execute(&self, ctx: &ModelContext<'_>, state: &mut RecordState) -> Result<()> {
        // Old values accumulate here instead of being overwritten
        for column in ctx.features.columns_with(ctx.class, FeatureTag::DateUpdated) {
            state.remember_history(column);
            state.set(column, current_timestamp(ctx, column));
        }
        Ok(())
    }
}
