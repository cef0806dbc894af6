//! Sentry browser destination — assembles sanitized SDK options for the
//! vendor initializer and identifies users by forwarding traits directly.
//! Sentry has no event taxonomy; track and page calls are dropped.

use std::sync::Arc;

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use tagrelay_core::settings::{parse, sanitize};
use tagrelay_core::{CanonicalEvent, RelayResult, VendorCall, VendorSink};

use crate::adapter::{transition, AdapterState, Destination};

/// Sentry settings, as supplied by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentryConfig {
    /// Public DSN for the project.
    pub config: String,
    pub server_name: Option<String>,
    pub release: Option<String>,
    /// Logging-environment label, forwarded as `environment`.
    pub logger: Option<String>,
    pub max_message_length: Option<u64>,
    pub ignore_errors: Vec<String>,
    /// URL deny list, forwarded as `blacklistUrls`.
    pub ignore_urls: Vec<String>,
    pub whitelist_urls: Vec<String>,
    /// Unrecognized settings, forwarded to the vendor initializer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sentry adapter.
pub struct SentryDestination {
    config: SentryConfig,
    state: AdapterState,
    init_options: Map<String, Value>,
    sink: Arc<dyn VendorSink>,
}

impl SentryDestination {
    /// Build an adapter from raw host settings and an injected vendor sink.
    pub fn from_settings(settings: &Value, sink: Arc<dyn VendorSink>) -> RelayResult<Self> {
        Ok(Self::new(parse(settings)?, sink))
    }

    pub fn new(config: SentryConfig, sink: Arc<dyn VendorSink>) -> Self {
        Self {
            config,
            state: AdapterState::Unloaded,
            init_options: Map::new(),
            sink,
        }
    }

    pub fn config(&self) -> &SentryConfig {
        &self.config
    }

    /// Sanitized options handed to the vendor initializer at readiness.
    pub fn init_options(&self) -> &Map<String, Value> {
        &self.init_options
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.config.config.is_empty() {
            return Err(anyhow!("sentry dsn must not be empty"));
        }
        Ok(())
    }

    /// Assemble the vendor init options. Unset options become `null` here and
    /// are stripped by the sanitizer; the DSN goes in afterwards, exempt from
    /// cleaning.
    fn build_init_options(&self) -> Map<String, Value> {
        let mut options = self.config.extra.clone();
        options.insert("environment".into(), json!(self.config.logger));
        options.insert("release".into(), json!(self.config.release));
        options.insert("serverName".into(), json!(self.config.server_name));
        options.insert("whitelistUrls".into(), json!(self.config.whitelist_urls));
        options.insert("ignoreErrors".into(), json!(self.config.ignore_errors));
        options.insert("blacklistUrls".into(), json!(self.config.ignore_urls));
        options.insert("maxMessageLength".into(), json!(self.config.max_message_length));

        let mut cleaned = sanitize(&options);
        cleaned.insert("dsn".into(), Value::String(self.config.config.clone()));
        cleaned
    }
}

impl Destination for SentryDestination {
    fn name(&self) -> &'static str {
        "sentry"
    }

    fn state(&self) -> AdapterState {
        self.state
    }

    fn initialize(&mut self) -> RelayResult<()> {
        self.validate()?;
        transition(&mut self.state, AdapterState::Unloaded, AdapterState::Loading, "initialize")?;
        self.init_options = self.build_init_options();
        info!(destination = self.name(), "initializing sdk");
        Ok(())
    }

    fn mark_ready(&mut self) -> RelayResult<()> {
        transition(&mut self.state, AdapterState::Loading, AdapterState::Ready, "mark_ready")?;
        self.sink
            .call(VendorCall::configure(Value::Object(self.init_options.clone())));
        info!(destination = self.name(), "vendor sdk ready");
        Ok(())
    }

    fn identify(&self, event: &CanonicalEvent) {
        if event.traits.is_empty() {
            debug!(destination = self.name(), "identify without traits, skipping");
            return;
        }
        let traits: Map<String, Value> = event
            .traits
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.sink.call(VendorCall::identify(Value::Object(traits)));
    }

    fn track(&self, event: &CanonicalEvent) {
        debug!(
            destination = self.name(),
            event_name = event.event_name.as_deref().unwrap_or_default(),
            "no event taxonomy, dropping"
        );
    }

    fn page(&self, _event: &CanonicalEvent) {
        debug!(destination = self.name(), "no page taxonomy, dropping");
    }
}
