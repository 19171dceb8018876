use anyhow::Result;

use column_features::{OldValue, Record, Value};

use crate::common::{default_registry, fixed_now};

#[tokio::test]
async fn test_date_created_stamps_new_record() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_date_created_column("User", "created_at")?;
    registry.configure_date_created_column("User", "created_on")?;

    let mut record = Record::new("User").with_value("created_at", "1999-01-01 00:00:00");
    let messages = registry.run_store_hooks(&mut record).await?;

    assert!(messages.is_empty());
    assert_eq!(record.value("created_at"), &Value::Timestamp(fixed_now()));
    assert_eq!(record.value("created_on"), &Value::Date(fixed_now().date()));
    assert_eq!(
        record.state.old_values.get("created_at"),
        Some(&OldValue::Single(Value::text("1999-01-01 00:00:00")))
    );
    assert_eq!(
        record.state.old_values.get("created_on"),
        Some(&OldValue::Single(Value::Null))
    );
    Ok(())
}

#[tokio::test]
async fn test_date_created_skips_existing_record() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_date_created_column("User", "created_at")?;

    let mut record = Record::existing("User").with_value("created_at", "2020-02-02 10:00:00");
    registry.run_store_hooks(&mut record).await?;

    assert_eq!(record.value("created_at"), &Value::text("2020-02-02 10:00:00"));
    assert!(record.state.old_values.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_date_updated_stamps_every_save() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_date_updated_column("User", "updated_at")?;

    let mut record = Record::existing("User").with_value("updated_at", "2020-02-02 10:00:00");
    registry.run_store_hooks(&mut record).await?;
    assert_eq!(record.value("updated_at"), &Value::Timestamp(fixed_now()));

    // A second save appends to the history instead of overwriting it
    registry.run_store_hooks(&mut record).await?;
    assert_eq!(
        record.state.old_values.get("updated_at"),
        Some(&OldValue::History(vec![
            Value::text("2020-02-02 10:00:00"),
            Value::Timestamp(fixed_now()),
        ]))
    );
    Ok(())
}

#[tokio::test]
async fn test_date_updated_stamps_new_record() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_date_created_column("User", "created_at")?;
    registry.configure_date_updated_column("User", "updated_at")?;

    let mut record = Record::new("User");
    registry.run_store_hooks(&mut record).await?;

    assert_eq!(record.value("created_at"), &Value::Timestamp(fixed_now()));
    assert_eq!(record.value("updated_at"), &Value::Timestamp(fixed_now()));
    assert_eq!(
        record.state.old_values.get("updated_at").map(OldValue::latest),
        Some(&Value::Null)
    );
    Ok(())
}

#[tokio::test]
async fn test_validate_alone_does_not_stamp() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_date_created_column("User", "created_at")?;

    let mut record = Record::new("User");
    registry.validate(&mut record).await?;

    assert_eq!(record.value("created_at"), &Value::Null);
    Ok(())
}
