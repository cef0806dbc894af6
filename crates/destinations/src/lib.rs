//! Destination adapters for TagRelay — translating canonical identify /
//! track / page events into the wire shape of third-party tracking
//! endpoints.
//!
//! # Modules
//!
//! - [`adapter`] — Lifecycle state machine and the [`Destination`] trait
//! - [`mapping`] — Canonical-to-vendor event taxonomy tables and resolver
//! - [`payload`] — Vendor payload assembly from canonical properties
//! - [`pinterest`] — Pinterest conversion tag (`pintrk`)
//! - [`sentry`] — Sentry browser SDK

pub mod adapter;
pub mod mapping;
pub mod payload;
pub mod pinterest;
pub mod sentry;

pub use adapter::{AdapterState, Destination};
pub use mapping::{FieldMap, LineItems, MappingRule, PayloadShape, ResolvedRule, RuleSet};
pub use pinterest::{PinterestConfig, PinterestDestination};
pub use sentry::{SentryConfig, SentryDestination};
