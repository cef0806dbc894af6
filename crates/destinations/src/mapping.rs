//! Event taxonomy mapping — translates canonical event names into a
//! destination's own event vocabulary.
//!
//! Built-in rules are static data declared by each destination; a
//! user-supplied overlay from settings fills gaps for custom events. The
//! whole table is built once at adapter creation and never mutated.

use std::collections::HashMap;

/// One field mapping: canonical property `from` lands in vendor field `to`.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub from: &'static str,
    pub to: &'static str,
}

/// Where a shape's nested `line_items` collection is sourced from.
#[derive(Debug, Clone, Copy)]
pub enum LineItems {
    /// No line items.
    None,
    /// Exactly one item, built from the event's own properties.
    FromEvent(&'static [FieldMap]),
    /// One item per object entry of the named collection property, in input
    /// order.
    FromCollection {
        property: &'static str,
        fields: &'static [FieldMap],
    },
}

/// Payload shape descriptor for a mapped event. Field mappings apply in
/// declaration order and never overwrite an already-populated target, which
/// is how source preferences (`sku` over `product_id`) are expressed.
#[derive(Debug, Clone, Copy)]
pub struct PayloadShape {
    pub fields: &'static [FieldMap],
    pub line_items: LineItems,
}

impl PayloadShape {
    /// Shape producing no payload at all.
    pub const EMPTY: PayloadShape = PayloadShape {
        fields: &[],
        line_items: LineItems::None,
    };
}

/// A built-in taxonomy entry: vendor event name plus payload shape.
#[derive(Debug, Clone, Copy)]
pub struct MappingRule {
    pub vendor_event: &'static str,
    pub shape: PayloadShape,
}

/// A resolved vendor event: the name to emit and the shape to build, if any.
/// Overlay-only matches carry no shape — only the event name changes.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRule<'a> {
    pub vendor_event: &'a str,
    pub shape: Option<&'a PayloadShape>,
}

/// Immutable rule table for one destination.
pub struct RuleSet {
    rules: &'static [(&'static str, MappingRule)],
    by_name: HashMap<&'static str, MappingRule>,
    overlay: HashMap<String, String>,
}

impl RuleSet {
    pub fn new(
        rules: &'static [(&'static str, MappingRule)],
        overlay: HashMap<String, String>,
    ) -> Self {
        Self {
            rules,
            by_name: rules.iter().copied().collect(),
            overlay,
        }
    }

    /// Resolve a canonical event name. Built-in rules win; the overlay fills
    /// gaps, reusing a built-in shape when it targets the same vendor event
    /// (first declared rule wins). `None` means the event has no mapping and
    /// must be dropped without a vendor call.
    pub fn resolve(&self, canonical_name: &str) -> Option<ResolvedRule<'_>> {
        if let Some(rule) = self.by_name.get(canonical_name) {
            return Some(ResolvedRule {
                vendor_event: rule.vendor_event,
                shape: Some(&rule.shape),
            });
        }

        let vendor_event = self.overlay.get(canonical_name)?;
        let shape = self
            .rules
            .iter()
            .find(|(_, rule)| rule.vendor_event == vendor_event)
            .map(|(_, rule)| &rule.shape);
        Some(ResolvedRule {
            vendor_event: vendor_event.as_str(),
            shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: &[FieldMap] = &[FieldMap {
        from: "name",
        to: "product_name",
    }];

    const RULES: &[(&str, MappingRule)] = &[
        (
            "Thing Viewed",
            MappingRule {
                vendor_event: "View",
                shape: PayloadShape {
                    fields: &[],
                    line_items: LineItems::FromEvent(ITEM),
                },
            },
        ),
        (
            "Things Searched",
            MappingRule {
                vendor_event: "Find",
                shape: PayloadShape {
                    fields: &[FieldMap {
                        from: "query",
                        to: "q",
                    }],
                    line_items: LineItems::None,
                },
            },
        ),
        (
            "Thing List Filtered",
            MappingRule {
                vendor_event: "Find",
                shape: PayloadShape {
                    fields: &[FieldMap {
                        from: "filter",
                        to: "f",
                    }],
                    line_items: LineItems::None,
                },
            },
        ),
    ];

    fn rule_set(overlay: &[(&str, &str)]) -> RuleSet {
        RuleSet::new(
            RULES,
            overlay
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_builtin_rule_resolves() {
        let rules = rule_set(&[]);
        let resolved = rules.resolve("Thing Viewed").unwrap();
        assert_eq!(resolved.vendor_event, "View");
        assert!(resolved.shape.is_some());
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let rules = rule_set(&[("Signed Up", "Join")]);
        for name in ["Thing Viewed", "Signed Up", "Unknown"] {
            let first = rules.resolve(name).map(|r| r.vendor_event.to_string());
            let second = rules.resolve(name).map(|r| r.vendor_event.to_string());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_unmapped_event_is_not_found() {
        let rules = rule_set(&[]);
        assert!(rules.resolve("Totally Unknown Event").is_none());
    }

    #[test]
    fn test_overlay_fills_gaps_without_shape() {
        let rules = rule_set(&[("Signed Up", "Join")]);
        let resolved = rules.resolve("Signed Up").unwrap();
        assert_eq!(resolved.vendor_event, "Join");
        assert!(resolved.shape.is_none());
    }

    #[test]
    fn test_overlay_never_overrides_builtin() {
        let rules = rule_set(&[("Thing Viewed", "Elsewhere")]);
        let resolved = rules.resolve("Thing Viewed").unwrap();
        assert_eq!(resolved.vendor_event, "View");
    }

    #[test]
    fn test_overlay_reuses_shape_of_matching_vendor_event() {
        let rules = rule_set(&[("Catalog Browsed", "Find")]);
        let resolved = rules.resolve("Catalog Browsed").unwrap();
        assert_eq!(resolved.vendor_event, "Find");
        // Two built-in rules target "Find"; the first declared one wins.
        let shape = resolved.shape.unwrap();
        assert_eq!(shape.fields[0].to, "q");
    }
}
