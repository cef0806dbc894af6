//! Pinterest conversion tag destination — maps canonical e-commerce events
//! onto the `pintrk` vocabulary (PageVisit, Search, AddToCart, Checkout,
//! WatchVideo, ViewCategory) with nested line-item payloads, and wires
//! identified emails into Pinterest Enhanced Match.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use tagrelay_core::settings::{parse, sanitize};
use tagrelay_core::{CanonicalEvent, RelayResult, VendorCall, VendorSink};

use crate::adapter::{transition, AdapterState, Destination};
use crate::mapping::{FieldMap, LineItems, MappingRule, PayloadShape, RuleSet};
use crate::payload;

/// Partner marker sent alongside enhanced-match data (`np` = named partner).
const PARTNER_NAME: &str = "tagrelay";

/// Pinterest tag settings, as supplied by the host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PinterestConfig {
    /// Pinterest tag id, e.g. "2620795819800".
    pub tid: String,
    /// Custom canonical-to-vendor event name overlay, consulted when no
    /// built-in rule matches.
    pub event_mapping: HashMap<String, String>,
    /// Property names copied verbatim into shaped payloads.
    pub custom_properties: Vec<String>,
    /// Whether the tag loader should append stored enhanced-match data when
    /// it injects the tag. Dispatch never reads this.
    pub use_enhanced_match_load: bool,
    /// Unrecognized settings, forwarded to the vendor initializer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full product field set for cart and checkout line items. `sku` is
/// preferred over `product_id` for the vendor's product id.
const PRODUCT_ITEM: &[FieldMap] = &[
    FieldMap { from: "name", to: "product_name" },
    FieldMap { from: "sku", to: "product_id" },
    FieldMap { from: "product_id", to: "product_id" },
    FieldMap { from: "category", to: "product_category" },
    FieldMap { from: "price", to: "product_price" },
    FieldMap { from: "quantity", to: "product_quantity" },
];

const VIEWED_ITEM: &[FieldMap] = &[
    FieldMap { from: "name", to: "product_name" },
    FieldMap { from: "price", to: "product_price" },
];

const FILTERED_ITEM: &[FieldMap] = &[FieldMap { from: "category", to: "product_category" }];

/// Built-in e-commerce taxonomy for the Pinterest tag.
const RULES: &[(&str, MappingRule)] = &[
    (
        "Product Viewed",
        MappingRule {
            vendor_event: "PageVisit",
            shape: PayloadShape {
                fields: &[],
                line_items: LineItems::FromEvent(VIEWED_ITEM),
            },
        },
    ),
    (
        "Products Searched",
        MappingRule {
            vendor_event: "Search",
            shape: PayloadShape {
                fields: &[FieldMap { from: "query", to: "search_query" }],
                line_items: LineItems::None,
            },
        },
    ),
    (
        "Product List Filtered",
        MappingRule {
            vendor_event: "Search",
            shape: PayloadShape {
                fields: &[],
                line_items: LineItems::FromEvent(FILTERED_ITEM),
            },
        },
    ),
    (
        "Product Added",
        MappingRule {
            vendor_event: "AddToCart",
            shape: PayloadShape {
                fields: &[
                    FieldMap { from: "value", to: "value" },
                    FieldMap { from: "currency", to: "currency" },
                ],
                line_items: LineItems::FromEvent(PRODUCT_ITEM),
            },
        },
    ),
    (
        "Order Completed",
        MappingRule {
            vendor_event: "Checkout",
            shape: PayloadShape {
                fields: &[
                    FieldMap { from: "order_id", to: "order_id" },
                    FieldMap { from: "coupon", to: "coupon" },
                    FieldMap { from: "currency", to: "currency" },
                ],
                line_items: LineItems::FromCollection {
                    property: "products",
                    fields: PRODUCT_ITEM,
                },
            },
        },
    ),
    (
        "Video Playback Started",
        MappingRule {
            vendor_event: "WatchVideo",
            shape: PayloadShape::EMPTY,
        },
    ),
];

/// Pinterest tag adapter.
pub struct PinterestDestination {
    config: PinterestConfig,
    rules: RuleSet,
    state: AdapterState,
    init_options: Map<String, Value>,
    sink: Arc<dyn VendorSink>,
}

impl PinterestDestination {
    /// Build an adapter from raw host settings and an injected vendor sink.
    pub fn from_settings(settings: &Value, sink: Arc<dyn VendorSink>) -> RelayResult<Self> {
        Ok(Self::new(parse(settings)?, sink))
    }

    pub fn new(config: PinterestConfig, sink: Arc<dyn VendorSink>) -> Self {
        let rules = RuleSet::new(RULES, config.event_mapping.clone());
        Self {
            config,
            rules,
            state: AdapterState::Unloaded,
            init_options: Map::new(),
            sink,
        }
    }

    pub fn config(&self) -> &PinterestConfig {
        &self.config
    }

    /// Sanitized options handed to the vendor initializer at readiness.
    pub fn init_options(&self) -> &Map<String, Value> {
        &self.init_options
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.config.tid.is_empty() {
            return Err(anyhow!("pinterest tid must not be empty"));
        }
        Ok(())
    }
}

impl Destination for PinterestDestination {
    fn name(&self) -> &'static str {
        "pinterest"
    }

    fn state(&self) -> AdapterState {
        self.state
    }

    fn initialize(&mut self) -> RelayResult<()> {
        self.validate()?;
        transition(&mut self.state, AdapterState::Unloaded, AdapterState::Loading, "initialize")?;

        let mut options = self.config.extra.clone();
        options.insert("tid".into(), Value::String(self.config.tid.clone()));
        self.init_options = sanitize(&options);

        info!(destination = self.name(), tid = %self.config.tid, "initializing tag");
        Ok(())
    }

    fn mark_ready(&mut self) -> RelayResult<()> {
        transition(&mut self.state, AdapterState::Loading, AdapterState::Ready, "mark_ready")?;
        self.sink
            .call(VendorCall::configure(Value::Object(self.init_options.clone())));
        info!(destination = self.name(), "vendor tag ready");
        Ok(())
    }

    fn identify(&self, event: &CanonicalEvent) {
        let Some(email) = event.trait_value("email").and_then(Value::as_str) else {
            debug!(
                destination = self.name(),
                "identify without email trait, no enhanced match"
            );
            return;
        };
        self.sink
            .call(VendorCall::set(json!({ "np": PARTNER_NAME, "em": email })));
    }

    fn track(&self, event: &CanonicalEvent) {
        let Some(event_name) = event.event_name.as_deref() else {
            return;
        };
        let Some(rule) = self.rules.resolve(event_name) else {
            debug!(destination = self.name(), event_name, "no mapping for event, dropping");
            return;
        };

        let payload = rule
            .shape
            .and_then(|shape| payload::build(event, shape, &self.config.custom_properties));

        debug!(
            destination = self.name(),
            event_name,
            vendor_event = rule.vendor_event,
            "event mapped"
        );
        self.sink.call(VendorCall::track(rule.vendor_event, payload));
    }

    fn page(&self, event: &CanonicalEvent) {
        let call = match (event.category.as_deref(), event.name.as_deref()) {
            (Some(category), Some(name)) => VendorCall::track(
                "ViewCategory",
                Some(json!({ "category": category, "name": name })),
            ),
            (_, Some(name)) => VendorCall::track("PageVisit", Some(json!({ "name": name }))),
            _ => VendorCall::track("PageVisit", None),
        };
        self.sink.call(call);
    }
}
