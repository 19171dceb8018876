//! Configuration entry points, one per feature kind.

use std::sync::Arc;

use tracing::info;

use super::{
    label_for, FeatureKind, InspectColumn, PrepareLinkColumn, RandomColumnSpec, SetDateCreated,
    SetDateUpdated, SetRandomStrings, ValidateEmailColumns, ValidateLinkColumns, STRING_TYPES,
};
use crate::error::ConfigurationError;
use crate::hooks::{InspectOverride, ListenerPoint, OverrideSlot, PrepareOverride};
use crate::model::ModelRegistry;
use crate::random::Charset;
use crate::schema::{DataType, FeatureTag};

impl ModelRegistry {
    /// Fills `column` with the current time when a new record is saved
    pub fn configure_date_created_column(
        &mut self,
        class: &str,
        column: &str,
    ) -> Result<(), ConfigurationError> {
        self.configure_feature(class, column, FeatureKind::DateCreated)
    }

    /// Fills `column` with the current time on every save
    pub fn configure_date_updated_column(
        &mut self,
        class: &str,
        column: &str,
    ) -> Result<(), ConfigurationError> {
        self.configure_feature(class, column, FeatureKind::DateUpdated)
    }

    /// Validates `column` as an email address
    pub fn configure_email_column(
        &mut self,
        class: &str,
        column: &str,
    ) -> Result<(), ConfigurationError> {
        self.configure_feature(class, column, FeatureKind::Email)
    }

    /// Validates `column` as a link and prepares it for use in an `href`
    pub fn configure_link_column(
        &mut self,
        class: &str,
        column: &str,
    ) -> Result<(), ConfigurationError> {
        self.configure_feature(class, column, FeatureKind::Link)
    }

    /// Fills `column` with a random string of `length` characters from
    /// `charset` (one of `alphanumeric`, `alpha`, `numeric`, `hexadecimal`)
    /// when a new record is validated
    pub fn configure_random_column(
        &mut self,
        class: &str,
        column: &str,
        charset: &str,
        length: i64,
    ) -> Result<(), ConfigurationError> {
        self.check_data_type(class, column, STRING_TYPES, label_for(FeatureTag::Random))?;

        let charset: Charset = charset.parse()?;
        if length < 1 {
            return Err(ConfigurationError::InvalidLength { length });
        }
        let length = usize::try_from(length)
            .map_err(|_| ConfigurationError::InvalidLength { length })?;

        self.configure_feature(
            class,
            column,
            FeatureKind::Random(RandomColumnSpec { charset, length }),
        )
    }

    fn configure_feature(
        &mut self,
        class: &str,
        column: &str,
        kind: FeatureKind,
    ) -> Result<(), ConfigurationError> {
        self.check_data_type(class, column, kind.allowed_types(), kind.label())?;

        if let Some(existing) = self.features.feature(class, column) {
            if existing.tag() != kind.tag() {
                return Err(ConfigurationError::FeatureConflict {
                    class: class.to_string(),
                    column: column.to_string(),
                    existing: existing.tag().as_str(),
                    requested: kind.tag().as_str(),
                });
            }
        }

        // Both slots are checked before anything is registered
        self.hooks
            .check_override(class, column, OverrideSlot::Inspect, InspectColumn.name())?;
        if matches!(kind, FeatureKind::Link) {
            self.hooks.check_override(
                class,
                column,
                OverrideSlot::Prepare,
                PrepareLinkColumn.name(),
            )?;
        }

        self.ensure_class(class);
        self.hooks
            .set_inspect_override(class, column, Arc::new(InspectColumn))?;

        match kind {
            FeatureKind::DateCreated => {
                self.hooks
                    .add_listener(class, ListenerPoint::PostBeginStore, Arc::new(SetDateCreated));
            }
            FeatureKind::DateUpdated => {
                self.hooks
                    .add_listener(class, ListenerPoint::PostBeginStore, Arc::new(SetDateUpdated));
            }
            FeatureKind::Email => {
                self.hooks.add_listener(
                    class,
                    ListenerPoint::PostValidate,
                    Arc::new(ValidateEmailColumns),
                );
            }
            FeatureKind::Link => {
                self.hooks
                    .set_prepare_override(class, column, Arc::new(PrepareLinkColumn))?;
                self.hooks.add_listener(
                    class,
                    ListenerPoint::PostValidate,
                    Arc::new(ValidateLinkColumns),
                );
            }
            FeatureKind::Random(_) => {
                self.hooks
                    .add_listener(class, ListenerPoint::PreValidate, Arc::new(SetRandomStrings));
            }
        }

        self.features.record(class, column, kind);
        info!("Configured {}.{} as {} column", class, column, kind.tag());
        Ok(())
    }

    fn check_data_type(
        &self,
        class: &str,
        column: &str,
        allowed: &[DataType],
        feature: &'static str,
    ) -> Result<(), ConfigurationError> {
        let table = self.table_for(class);
        let data_type = self.services.schema.column_info(&table, column)?.data_type;

        if !allowed.contains(&data_type) {
            return Err(ConfigurationError::IncompatibleColumnType {
                column: column.to_string(),
                data_type,
                allowed: allowed
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                feature,
            });
        }
        Ok(())
    }
}
