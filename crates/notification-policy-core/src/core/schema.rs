// crates/notification-policy-core/src/core/schema.rs
// ============================================================================
// Module: Notification Policy Schema
// Description: Declarative attribute schema for the notification_policy resource.
// Purpose: Publish attribute names, types, and presence flags for hosts and docs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The schema is a static declaration consumed by the host that loads the
//! resource and by tooling that renders documentation. Validation of
//! configuration against it is owned by the host.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::policy::MechanismKind;

// ============================================================================
// SECTION: Schema Types
// ============================================================================

/// Resource type name registered with the host.
pub const RESOURCE_TYPE: &str = "notification_policy";

/// Filter attribute names accepted inside the `filters` block.
pub const FILTER_ATTRIBUTES: &[&str] = &[
    "actions",
    "affected_components",
    "enabled",
    "environment",
    "event",
    "event_source",
    "event_type",
    "group_by",
    "health_check_id",
    "incident_impact",
    "input_id",
    "limit",
    "megabits_per_second",
    "new_health",
    "new_status",
    "packets_per_second",
    "pool_id",
    "product",
    "project_id",
    "protocol",
    "requests_per_second",
    "selectors",
    "services",
    "slo",
    "status",
    "target_hostname",
    "target_zone_name",
    "where",
    "zones",
];

/// Attribute value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Unordered set of strings.
    StringSet,
    /// Nested block set.
    BlockSet,
    /// Nested block list.
    BlockList,
}

/// How an attribute is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Must be set in configuration.
    Required,
    /// May be set in configuration.
    Optional,
    /// Set only by the provider.
    Computed,
}

/// Declaration of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    /// Attribute name.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    /// Presence flag.
    pub presence: Presence,
    /// Default rendered as a string, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Maximum number of nested blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Nested attributes for block types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<AttributeSchema>,
}

impl AttributeSchema {
    /// Declares a scalar attribute.
    fn scalar(
        name: &'static str,
        attribute_type: AttributeType,
        presence: Presence,
    ) -> Self {
        Self {
            name,
            attribute_type,
            presence,
            default: None,
            max_items: None,
            nested: Vec::new(),
        }
    }

    /// Attaches a default value.
    fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declaration of the full resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    /// Resource type name.
    pub resource_type: &'static str,
    /// Top-level attributes in declaration order.
    pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
    /// Looks up a top-level attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }
}

// ============================================================================
// SECTION: Declaration
// ============================================================================

/// Returns the schema of the `notification_policy` resource.
#[must_use]
pub fn notification_policy_schema() -> ResourceSchema {
    let mut attributes = vec![
        AttributeSchema::scalar("id", AttributeType::String, Presence::Computed),
        AttributeSchema::scalar("account_id", AttributeType::String, Presence::Required),
        AttributeSchema::scalar("name", AttributeType::String, Presence::Required),
        AttributeSchema::scalar("description", AttributeType::String, Presence::Optional)
            .with_default(""),
        AttributeSchema::scalar("enabled", AttributeType::Bool, Presence::Optional)
            .with_default("true"),
        AttributeSchema::scalar("alert_type", AttributeType::String, Presence::Required),
    ];
    for kind in MechanismKind::ALL {
        attributes.push(AttributeSchema {
            nested: vec![
                AttributeSchema::scalar("id", AttributeType::String, Presence::Required),
                AttributeSchema::scalar("name", AttributeType::String, Presence::Optional)
                    .with_default(""),
            ],
            ..AttributeSchema::scalar(kind.block_name(), AttributeType::BlockSet, Presence::Optional)
        });
    }
    attributes.push(AttributeSchema {
        max_items: Some(1),
        nested: FILTER_ATTRIBUTES
            .iter()
            .copied()
            .map(|name| AttributeSchema::scalar(name, AttributeType::StringSet, Presence::Optional))
            .collect(),
        ..AttributeSchema::scalar("filters", AttributeType::BlockList, Presence::Optional)
    });
    attributes.push(AttributeSchema::scalar("created", AttributeType::String, Presence::Computed));
    attributes.push(AttributeSchema::scalar("modified", AttributeType::String, Presence::Computed));
    ResourceSchema {
        resource_type: RESOURCE_TYPE,
        attributes,
    }
}
