use anyhow::Result;

use column_features::{Record, Value};

use crate::common::default_registry;

const EMAIL_MESSAGE: &str = "Please enter an email address in the form name@example.com";
const LINK_MESSAGE: &str = "Please enter a link in the form http://www.example.com";

#[tokio::test]
async fn test_valid_email_passes() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;

    let mut record = Record::new("User").with_value("email", "jane.doe+news@example.co.uk");
    assert!(registry.validate(&mut record).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_email_adds_message() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;
    registry.configure_email_column("User", "backup_email")?;

    let mut record = Record::new("User")
        .with_value("email", "jane@")
        .with_value("backup_email", "also wrong");
    let messages = registry.validate(&mut record).await?;

    // One message per column in configuration order, even though both
    // columns share the validator
    assert_eq!(
        messages,
        vec![
            format!("Email: {}", EMAIL_MESSAGE),
            format!("Backup Email: {}", EMAIL_MESSAGE),
        ]
    );
    assert_eq!(record.state.validation_messages, messages);
    Ok(())
}

#[tokio::test]
async fn test_empty_values_are_not_validated() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;
    registry.configure_link_column("User", "homepage")?;

    for value in ["", "   "] {
        let mut record = Record::new("User")
            .with_value("email", value)
            .with_value("homepage", value);
        assert!(registry.validate(&mut record).await?.is_empty());
    }

    let mut record = Record::new("User");
    assert!(registry.validate(&mut record).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_link_shapes() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_link_column("User", "homepage")?;

    for link in [
        "http://example.com",
        "https://www.example.com/page?x=1",
        "/relative/path",
        "example.com",
    ] {
        let mut record = Record::new("User").with_value("homepage", link);
        assert!(
            registry.validate(&mut record).await?.is_empty(),
            "{} should be accepted",
            link
        );
    }

    let mut record = Record::new("User").with_value("homepage", "not a link");
    assert_eq!(
        registry.validate(&mut record).await?,
        vec![format!("Homepage: {}", LINK_MESSAGE)]
    );
    Ok(())
}

#[tokio::test]
async fn test_display_name_overrides_humanized_name() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;
    registry.set_column_name("User", "email", "Work address");

    let mut record = Record::new("User").with_value("email", "nope");
    assert_eq!(
        registry.validate(&mut record).await?,
        vec![format!("Work address: {}", EMAIL_MESSAGE)]
    );
    Ok(())
}

#[tokio::test]
async fn test_messages_reset_between_validations() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;

    let mut record = Record::new("User").with_value("email", "nope");
    assert_eq!(registry.validate(&mut record).await?.len(), 1);
    assert_eq!(registry.validate(&mut record).await?.len(), 1);

    record.state.set("email", "fixed@example.com");
    assert!(registry.validate(&mut record).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_numeric_values_are_validated() -> Result<()> {
    let mut registry = default_registry();
    registry.configure_email_column("User", "email")?;
    registry.configure_link_column("User", "homepage")?;

    let mut record = Record::new("User")
        .with_value("email", Value::Integer(5))
        .with_value("homepage", Value::Float(3.5));
    assert_eq!(
        registry.validate(&mut record).await?,
        vec![
            format!("Email: {}", EMAIL_MESSAGE),
            format!("Homepage: {}", LINK_MESSAGE),
        ]
    );

    // Zero is a value like any other number
    let mut record = Record::new("User").with_value("email", Value::Integer(0));
    assert_eq!(registry.validate(&mut record).await?.len(), 1);

    // Booleans carry nothing to check
    let mut record = Record::new("User").with_value("email", Value::Bool(true));
    assert!(registry.validate(&mut record).await?.is_empty());
    Ok(())
}
