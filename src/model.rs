//! Model Registry
//!
//! Owns the hook registry, the configured features and the collaborators
//! feature callbacks use. Classes are configured through `&mut self`
//! during startup; afterwards the registry is only read, so a built
//! registry can be shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Settings;
use crate::database::Database;
use crate::error::Result;
use crate::features::FeatureStore;
use crate::grammar;
use crate::hooks::{HookRegistry, ListenerPoint, ModelContext};
use crate::html;
use crate::random::{RandomSource, ThreadRngSource};
use crate::record::Record;
use crate::schema::{ColumnInfo, SchemaService};
use crate::value::{Clock, Objectifier, SchemaObjectifier, SystemClock, Value};

/// Collaborators available to feature callbacks
#[derive(Clone)]
pub struct Services {
    pub schema: Arc<dyn SchemaService>,
    pub database: Arc<dyn Database>,
    pub random: Arc<dyn RandomSource>,
    pub objectifier: Arc<dyn Objectifier>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Services with the thread RNG, schema-driven objectification and the
    /// system clock
    pub fn new(schema: Arc<dyn SchemaService>, database: Arc<dyn Database>) -> Self {
        Self {
            objectifier: Arc::new(SchemaObjectifier::new(schema.clone())),
            schema,
            database,
            random: Arc::new(ThreadRngSource),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_objectifier(mut self, objectifier: Arc<dyn Objectifier>) -> Self {
        self.objectifier = objectifier;
        self
    }
}

/// Table mapping and message names of a configured class
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub table: String,
    pub column_names: HashMap<String, String>,
}

pub struct ModelRegistry {
    pub(crate) services: Services,
    pub(crate) settings: Settings,
    pub(crate) hooks: HookRegistry,
    pub(crate) features: FeatureStore,
    classes: HashMap<String, ClassInfo>,
}

impl ModelRegistry {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            settings: Settings::default(),
            hooks: HookRegistry::new(),
            features: FeatureStore::new(),
            classes: HashMap::new(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Maps a class to a table other than its default tablized name
    pub fn map_class(&mut self, class: &str, table: &str) {
        self.ensure_class(class).table = table.to_string();
    }

    /// Sets the name validation messages use for a column
    pub fn set_column_name(&mut self, class: &str, column: &str, name: &str) {
        self.ensure_class(class)
            .column_names
            .insert(column.to_string(), name.to_string());
    }

    pub(crate) fn ensure_class(&mut self, class: &str) -> &mut ClassInfo {
        self.classes
            .entry(class.to_string())
            .or_insert_with(|| ClassInfo {
                table: grammar::tablize(class),
                column_names: HashMap::new(),
            })
    }

    pub fn table_for(&self, class: &str) -> String {
        self.classes
            .get(class)
            .map(|info| info.table.clone())
            .unwrap_or_else(|| grammar::tablize(class))
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Hook registry for registering custom listeners and overrides
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn features(&self) -> &FeatureStore {
        &self.features
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn context<'a>(&'a self, class: &'a str, exists: bool) -> ModelContext<'a> {
        ModelContext {
            class,
            table: self.table_for(class),
            exists,
            features: &self.features,
            services: &self.services,
            settings: &self.settings,
            column_names: self.classes.get(class).map(|info| &info.column_names),
        }
    }

    /// Metadata for a column, with its feature tag when one is configured
    pub fn inspect(&self, class: &str, column: &str) -> Result<ColumnInfo> {
        let ctx = self.context(class, false);
        match self
            .hooks
            .capabilities(class, column)
            .and_then(|c| c.inspect.as_ref())
        {
            Some(handler) => handler.inspect(&ctx, column),
            None => Ok(self.services.schema.column_info(&ctx.table, column)?),
        }
    }

    /// A single metadata element such as `type` or `feature`
    pub fn inspect_element(
        &self,
        class: &str,
        column: &str,
        element: &str,
    ) -> Result<Option<serde_json::Value>> {
        Ok(self.inspect(class, column)?.element(element))
    }

    /// Value of a column prepared for display in HTML
    pub fn prepare(&self, record: &Record, column: &str) -> Result<Value> {
        let ctx = self.context(&record.class, record.exists());
        if let Some(handler) = self
            .hooks
            .capabilities(&record.class, column)
            .and_then(|c| c.prepare.as_ref())
        {
            return handler.prepare(&ctx, column, &record.state);
        }

        Ok(match record.value(column) {
            Value::Null => Value::Null,
            value => Value::Text(html::prepare(&value.to_string())),
        })
    }

    /// Runs validation listeners and returns the collected messages.
    /// Messages are data; whether they block a save is up to the caller.
    pub async fn validate(&self, record: &mut Record) -> Result<Vec<String>> {
        let exists = record.exists();
        let ctx = self.context(&record.class, exists);
        let state = &mut record.state;

        state.validation_messages.clear();
        self.hooks
            .run_listeners(ListenerPoint::PreValidate, &ctx, state)
            .await?;
        self.hooks
            .run_listeners(ListenerPoint::PostValidate, &ctx, state)
            .await?;

        Ok(state.validation_messages.clone())
    }

    /// Runs the save lifecycle up to the point where the row is written:
    /// `post-begin::store()` listeners, then validation.
    pub async fn run_store_hooks(&self, record: &mut Record) -> Result<Vec<String>> {
        {
            let exists = record.exists();
            let ctx = self.context(&record.class, exists);
            self.hooks
                .run_listeners(ListenerPoint::PostBeginStore, &ctx, &mut record.state)
                .await?;
        }
        self.validate(record).await
    }
}
