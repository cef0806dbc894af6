//! Canonical analytics events — the destination-agnostic representation of
//! identify / track / page calls handed to destination adapters by an
//! instrumentation host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Free-form property or trait map carried by a canonical event.
pub type PropertyMap = HashMap<String, serde_json::Value>;

/// The three call kinds of the instrumentation surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Identify,
    Track,
    Page,
}

/// A single canonical event. Exactly the fields relevant to `kind` are
/// populated; everything else stays `None`/empty — absence is the signal,
/// never a null placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub message_id: Uuid,
    pub kind: EventKind,
    pub user_id: Option<String>,
    /// Canonical event name, present for `Track`.
    pub event_name: Option<String>,
    /// Page category, for `Page`.
    pub category: Option<String>,
    /// Page name, for `Page`.
    pub name: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default)]
    pub traits: PropertyMap,
    pub timestamp: DateTime<Utc>,
}

impl CanonicalEvent {
    fn base(kind: EventKind) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            kind,
            user_id: None,
            event_name: None,
            category: None,
            name: None,
            properties: PropertyMap::new(),
            traits: PropertyMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn track(event_name: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            event_name: Some(event_name.into()),
            properties,
            ..Self::base(EventKind::Track)
        }
    }

    pub fn page(
        category: Option<String>,
        name: Option<String>,
        properties: PropertyMap,
    ) -> Self {
        Self {
            category,
            name,
            properties,
            ..Self::base(EventKind::Page)
        }
    }

    pub fn identify(user_id: Option<String>, traits: PropertyMap) -> Self {
        Self {
            user_id,
            traits,
            ..Self::base(EventKind::Identify)
        }
    }

    /// Look up a property, treating an explicit JSON `null` as absent.
    /// Zero and `false` are present values.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key).filter(|v| !v.is_null())
    }

    /// Look up a trait, with the same absence rules as [`property`].
    ///
    /// [`property`]: CanonicalEvent::property
    pub fn trait_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.traits.get(key).filter(|v| !v.is_null())
    }
}
