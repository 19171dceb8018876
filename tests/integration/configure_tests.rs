//! Integration tests for feature configuration
//!
//! Column type checks, random-string settings, conflicts and the hooks
//! each feature registers.

use anyhow::Result;
use std::sync::Arc;

use column_features::error::{ConfigurationError, HookError};
use column_features::hooks::{
    InspectOverride, ListenerPoint, ModelContext, OverrideSlot, PrepareOverride,
};
use column_features::schema::{ColumnInfo, DataType};
use column_features::{ModelRegistry, RecordState, Value};

use crate::common::{default_registry, typed_columns};

type Configure = fn(&mut ModelRegistry, &str, &str) -> Result<(), ConfigurationError>;

fn configure_random_alpha(
    registry: &mut ModelRegistry,
    class: &str,
    column: &str,
) -> Result<(), ConfigurationError> {
    registry.configure_random_column(class, column, "alpha", 8)
}

const DATE_TYPES: [DataType; 3] = [DataType::Date, DataType::Time, DataType::Timestamp];
const STRING_TYPES: [DataType; 3] = [DataType::Varchar, DataType::Char, DataType::Text];

#[test]
fn test_date_features_reject_every_other_type() -> Result<()> {
    let features: [(&str, Configure); 2] = [
        ("date created", ModelRegistry::configure_date_created_column),
        ("date updated", ModelRegistry::configure_date_updated_column),
    ];

    for (label, configure) in features {
        for (column, data_type) in typed_columns() {
            let mut registry = default_registry();
            let result = configure(&mut registry, "User", column);
            if DATE_TYPES.contains(&data_type) {
                assert!(result.is_ok(), "{} on {} should be accepted", label, data_type);
                continue;
            }

            let err = result.unwrap_err();
            assert!(
                matches!(err, ConfigurationError::IncompatibleColumnType { .. }),
                "{} on {} should be rejected",
                label,
                data_type
            );
            assert!(err.to_string().contains("date, time, timestamp"));
            assert!(err.to_string().contains(&format!("a {} column", label)));
        }
    }

    Ok(())
}

#[test]
fn test_string_features_reject_every_other_type() -> Result<()> {
    let features: [(&str, Configure); 3] = [
        ("email", ModelRegistry::configure_email_column),
        ("link", ModelRegistry::configure_link_column),
        ("random", configure_random_alpha),
    ];

    for (label, configure) in features {
        for (column, data_type) in typed_columns() {
            let mut registry = default_registry();
            let result = configure(&mut registry, "User", column);
            if STRING_TYPES.contains(&data_type) {
                assert!(result.is_ok(), "{} on {} should be accepted", label, data_type);
                continue;
            }

            let err = result.unwrap_err();
            assert!(
                matches!(err, ConfigurationError::IncompatibleColumnType { .. }),
                "{} on {} should be rejected",
                label,
                data_type
            );
            assert!(err.to_string().contains("varchar, char, text"));
        }
    }

    Ok(())
}

#[test]
fn test_features_accept_allowed_columns() -> Result<()> {
    let mut registry = default_registry();

    registry.configure_date_created_column("User", "created_at")?;
    registry.configure_date_created_column("User", "created_on")?;
    registry.configure_date_updated_column("User", "updated_at")?;
    registry.configure_email_column("User", "email")?;
    registry.configure_email_column("User", "backup_email")?;
    registry.configure_link_column("User", "homepage")?;
    registry.configure_random_column("User", "token", "alphanumeric", 8)?;

    assert_eq!(registry.features().registrations().len(), 7);
    Ok(())
}

#[test]
fn test_random_rejects_invalid_charset() {
    let mut registry = default_registry();

    let err = registry
        .configure_random_column("User", "token", "base64", 8)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidCharset { .. }));
    assert!(registry.features().feature("User", "token").is_none());
}

#[test]
fn test_random_rejects_non_positive_length() {
    let mut registry = default_registry();

    for length in [0, -1, -50] {
        let err = registry
            .configure_random_column("User", "token", "numeric", length)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidLength { length: l } if l == length));
    }
    assert!(registry.hooks().listeners("User", ListenerPoint::PreValidate).is_empty());
}

#[test]
fn test_random_checks_column_type_first() {
    let mut registry = default_registry();

    let err = registry
        .configure_random_column("User", "age", "base64", 0)
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::IncompatibleColumnType { .. }));
}

#[test]
fn test_unknown_column_is_configuration_error() {
    let mut registry = default_registry();

    let err = registry.configure_email_column("User", "phone").unwrap_err();
    assert!(matches!(err, ConfigurationError::Schema(_)));

    let err = registry.configure_email_column("Account", "email").unwrap_err();
    assert!(matches!(err, ConfigurationError::Schema(_)));
}

#[test]
fn test_second_feature_on_column_is_rejected() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;

    let err = registry.configure_link_column("User", "email").unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::FeatureConflict {
            existing: "email",
            requested: "link",
            ..
        }
    ));

    // The rejected feature left nothing behind
    let caps = registry.hooks().capabilities("User", "email").unwrap();
    assert!(caps.prepare.is_none());
    assert!(registry
        .hooks()
        .listeners("User", ListenerPoint::PostValidate)
        .iter()
        .all(|l| l.name() != "column_features::validate_links"));
    Ok(())
}

#[test]
fn test_reconfiguring_random_overwrites_settings() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_random_column("User", "token", "alpha", 4)?;
    registry.configure_random_column("User", "token", "hexadecimal", 8)?;

    let columns = registry.features().random_columns("User");
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].1.length, 8);
    assert_eq!(columns[0].1.charset.as_str(), "hexadecimal");
    assert_eq!(
        registry
            .hooks()
            .listeners("User", ListenerPoint::PreValidate)
            .len(),
        1
    );
    Ok(())
}

#[test]
fn test_registered_hooks_per_feature() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_date_created_column("User", "created_at")?;
    registry.configure_date_updated_column("User", "updated_at")?;
    registry.configure_email_column("User", "email")?;
    registry.configure_email_column("User", "backup_email")?;
    registry.configure_link_column("User", "homepage")?;
    registry.configure_random_column("User", "token", "numeric", 6)?;

    let hooks = registry.hooks();
    let names = |point| -> Vec<String> {
        hooks
            .listeners("User", point)
            .iter()
            .map(|l| l.name().to_string())
            .collect()
    };

    assert_eq!(
        names(ListenerPoint::PostBeginStore),
        vec![
            "column_features::set_date_created",
            "column_features::set_date_updated"
        ]
    );
    assert_eq!(
        names(ListenerPoint::PreValidate),
        vec!["column_features::set_random_strings"]
    );
    // Email validation is registered once for both email columns
    assert_eq!(
        names(ListenerPoint::PostValidate),
        vec![
            "column_features::validate_emails",
            "column_features::validate_links"
        ]
    );

    for column in ["created_at", "updated_at", "email", "backup_email", "homepage", "token"] {
        let caps = hooks.capabilities("User", column).unwrap();
        assert!(caps.inspect.is_some(), "{} should have an inspect override", column);
        assert_eq!(caps.prepare.is_some(), column == "homepage");
    }

    let description = hooks.describe("User");
    assert!(description.contains(&"replace::inspectCreatedAt() -> column_features::inspect".to_string()));
    assert!(description.contains(&"replace::prepareHomepage() -> column_features::prepare_link".to_string()));
    Ok(())
}

struct ForeignInspect;

impl InspectOverride for ForeignInspect {
    fn name(&self) -> &str {
        "someone_else"
    }

    fn inspect(
        &self,
        _ctx: &ModelContext<'_>,
        _column: &str,
    ) -> column_features::Result<ColumnInfo> {
        Ok(ColumnInfo::new(DataType::Text))
    }
}

#[test]
fn test_foreign_override_conflicts_with_feature() -> Result<()> {
    let mut registry = default_registry();
    registry
        .hooks_mut()
        .set_inspect_override("User", "email", Arc::new(ForeignInspect))?;

    let err = registry.configure_email_column("User", "email").unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::Hook(HookError::OverrideConflict { .. })
    ));
    Ok(())
}

#[test]
fn test_classes_are_isolated() -> Result<()> {
    let mut registry = default_registry();
    registry.map_class("Member", "users");
    registry.configure_email_column("User", "email")?;
    registry.configure_link_column("Member", "email")?;

    assert_eq!(
        registry.features().feature("User", "email").map(|k| k.tag().as_str()),
        Some("email")
    );
    assert_eq!(
        registry.features().feature("Member", "email").map(|k| k.tag().as_str()),
        Some("link")
    );
    Ok(())
}

struct ForeignPrepare;

impl PrepareOverride for ForeignPrepare {
    fn name(&self) -> &str {
        "someone_else"
    }

    fn prepare(
        &self,
        _ctx: &ModelContext<'_>,
        column: &str,
        state: &RecordState,
    ) -> column_features::Result<Value> {
        Ok(state.value(column).clone())
    }
}

#[test]
fn test_failed_link_configuration_registers_nothing() -> Result<()> {
    let mut registry = default_registry();
    registry
        .hooks_mut()
        .set_prepare_override("User", "homepage", Arc::new(ForeignPrepare))?;

    let err = registry.configure_link_column("User", "homepage").unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::Hook(HookError::OverrideConflict { slot: "prepare", .. })
    ));

    let caps = registry.hooks().capabilities("User", "homepage").unwrap();
    assert!(caps.inspect.is_none());
    assert_eq!(caps.provider(OverrideSlot::Prepare), Some("someone_else"));
    assert!(registry.features().feature("User", "homepage").is_none());
    assert!(registry
        .hooks()
        .listeners("User", ListenerPoint::PostValidate)
        .is_empty());
    assert!(registry.inspect("User", "homepage")?.feature.is_none());
    Ok(())
}
