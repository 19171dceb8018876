use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;
use crate::hooks::{Listener, ModelContext};
use crate::record::RecordState;
use crate::schema::FeatureTag;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"(?i)^[a-z0-9\.'_\-\+]+@(?:[a-z0-9\-]+\.)+[a-z]{2,}$").unwrap();
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Validates every email column of the class
pub struct ValidateEmailColumns;

#[async_trait]
impl Listener for ValidateEmailColumns {
    fn name(&self) -> &str {
        "column_features::validate_emails"
    }

    fn description(&self) -> &str {
        "Adds a validation message for each email column that is not an email address"
    }

    async fn execute(&self, ctx: &ModelContext<'_>, state: &mut RecordState) -> Result<()> {
        for column in ctx.features.columns_with(ctx.class, FeatureTag::Email) {
            let value = state.value(column);
            if !value.is_stringlike() || is_valid_email(&value.to_string()) {
                continue;
            }
            state.validation_messages.push(format!(
                "{}: Please enter an email address in the form name@example.com",
                ctx.column_name(column)
            ));
        }
        Ok(())
    }
}
