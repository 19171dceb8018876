use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use column_features::database::SqliteDatabase;
use column_features::schema::sqlite;
use column_features::{FeatureManifest, ModelRegistry, Services};

#[derive(Parser)]
#[command(name = "column-features")]
#[command(about = "Check and inspect column features against a SQLite schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a feature manifest to a database schema and list the result
    Check {
        /// Path to the SQLite database
        #[arg(short, long)]
        database: String,
        /// Path to the feature manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Print the metadata of a configured column as JSON
    Inspect {
        /// Path to the SQLite database
        #[arg(short, long)]
        database: String,
        /// Path to the feature manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,
        /// Record class name
        class: String,
        /// Column name
        column: String,
        /// Only print this metadata element
        #[arg(short, long)]
        element: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "column_features=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { database, manifest } => {
            let registry = load_registry(&database, &manifest).await?;
            run_check(&registry);
        }
        Commands::Inspect {
            database,
            manifest,
            class,
            column,
            element,
        } => {
            let registry = load_registry(&database, &manifest).await?;
            let output = match element {
                Some(element) => {
                    let value = registry.inspect_element(&class, &column, &element)?;
                    serde_json::to_string_pretty(&value)?
                }
                None => serde_json::to_string_pretty(&registry.inspect(&class, &column)?)?,
            };
            println!("{}", output);
        }
    }

    Ok(())
}

async fn load_registry(database: &str, manifest: &Path) -> Result<ModelRegistry> {
    let db = SqliteDatabase::open(database)
        .await
        .with_context(|| format!("Failed to open database {}", database))?;
    let schema = sqlite::introspect(db.pool())
        .await
        .context("Failed to introspect database schema")?;

    let manifest = FeatureManifest::load(manifest)?;
    let mut registry = ModelRegistry::new(Services::new(Arc::new(schema), Arc::new(db)));
    manifest.apply(&mut registry)?;

    Ok(registry)
}

fn run_check(registry: &ModelRegistry) {
    let registrations = registry.features().registrations();
    if registrations.is_empty() {
        println!("No column features configured.");
        return;
    }

    let mut current_class: Option<&str> = None;
    for registration in &registrations {
        if current_class != Some(registration.class.as_str()) {
            current_class = Some(registration.class.as_str());
            println!(
                "{} (table {})",
                registration.class,
                registry.table_for(&registration.class)
            );
            for hook in registry.hooks().describe(&registration.class) {
                println!("  hook {}", hook);
            }
        }
        println!("  {}: {}", registration.column, registration.kind.tag());
    }

    println!("✓ {} column feature(s) configured", registrations.len());
}
