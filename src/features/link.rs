//! Link columns: display preparation and format validation.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;
use crate::hooks::{Listener, ModelContext, PrepareOverride};
use crate::html;
use crate::record::RecordState;
use crate::schema::FeatureTag;
use crate::value::Value;

lazy_static! {
    /// A scheme-less domain such as `example.com` or `www.example.com/page`
    static ref BARE_DOMAIN: Regex = Regex::new(r"(?i)^([a-z0-9\-]+\.)+[a-z]{2,}(/|$)").unwrap();
    static ref LINK: Regex = Regex::new(r"(?i)^(https?://|/|([a-z0-9\-]+\.)+[a-z]{2,})").unwrap();
}

/// Adds `http://` to bare domains
pub fn normalize_link(value: &str) -> String {
    if BARE_DOMAIN.is_match(value) {
        format!("http://{}", value)
    } else {
        value.to_string()
    }
}

pub fn is_valid_link(value: &str) -> bool {
    LINK.is_match(value)
}

/// Prepares a link so it works inside an `href`
pub struct PrepareLinkColumn;

impl PrepareOverride for PrepareLinkColumn {
    fn name(&self) -> &str {
        "column_features::prepare_link"
    }

    fn prepare(&self, _ctx: &ModelContext<'_>, column: &str, state: &RecordState) -> Result<Value> {
        let value = state.value(column);
        if value.is_empty() {
            return Ok(value.clone());
        }

        Ok(Value::Text(html::prepare(&normalize_link(&value.to_string()))))
    }
}

/// Validates every link column of the class
pub struct ValidateLinkColumns;

#[async_trait]
impl Listener for ValidateLinkColumns {
    fn name(&self) -> &str {
        "column_features::validate_links"
    }

    fn description(&self) -> &str {
        "Adds a validation message for each link column that does not look like a link"
    }

    async fn execute(&self, ctx: &ModelContext<'_>, state: &mut RecordState) -> Result<()> {
        for column in ctx.features.columns_with(ctx.class, FeatureTag::Link) {
            let value = state.value(column);
            if !value.is_stringlike() || is_valid_link(&value.to_string()) {
                continue;
            }
            state.validation_messages.push(format!(
                "{}: Please enter a link in the form http://www.example.com",
                ctx.column_name(column)
            ));
        }
        Ok(())
    }
}
