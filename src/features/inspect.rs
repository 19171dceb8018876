use crate::error::Result;
use crate::hooks::{InspectOverride, ModelContext};
use crate::schema::ColumnInfo;

/// Column metadata including the feature configured on the column
pub struct InspectColumn;

impl InspectOverride for InspectColumn {
    fn name(&self) -> &str {
        "column_features::inspect"
    }

    fn inspect(&self, ctx: &ModelContext<'_>, column: &str) -> Result<ColumnInfo> {
        let mut info = ctx.services.schema.column_info(&ctx.table, column)?;
        info.feature = ctx.features.feature(ctx.class, column).map(|kind| kind.tag());
        Ok(info)
    }
}
