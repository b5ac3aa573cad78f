//! Compiler configuration
//!
//! Defaults cover the common case. A TOML file can override code generation
//! settings and extend the placeholder table:
//!
//! ```toml
//! [codegen]
//! host_element_type = "dom.Element"
//! panel_types = ["HTMLPanel", "FlowPanel"]
//!
//! [placeholders]
//! default = "span"
//!
//! [placeholders.children]
//! select = "option"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::policy::PlaceholderPolicy;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a compilation pass
#[derive(Debug, Clone)]
pub struct BinderConfig {
    /// Placeholder tags for widgets embedded in HTML
    pub policy: PlaceholderPolicy,

    /// Type of the temporaries holding placeholder DOM nodes
    pub host_element_type: String,

    /// Runtime function resolving `(parent, index, tag)` to a child element
    pub dom_access_function: String,

    /// Widget local names whose content is parsed as HTML
    pub panel_types: Vec<String>,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            policy: PlaceholderPolicy::default(),
            host_element_type: "Element".to_string(),
            dom_access_function: "DomCursor.child".to_string(),
            panel_types: vec!["HTMLPanel".to_string()],
        }
    }
}

/// TOML structure for deserializing configuration
#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    codegen: TomlCodegen,
    placeholders: TomlPlaceholders,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlCodegen {
    host_element_type: Option<String>,
    dom_access_function: Option<String>,
    panel_types: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlPlaceholders {
    default: Option<String>,
    children: HashMap<String, String>,
}

impl BinderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let mut policy = defaults.policy;
        if let Some(tag) = parsed.placeholders.default {
            policy = policy.with_default_tag(tag);
        }
        for (parent, child) in parsed.placeholders.children {
            policy = policy.with_rule(parent, child);
        }

        Ok(Self {
            policy,
            host_element_type: parsed
                .codegen
                .host_element_type
                .unwrap_or(defaults.host_element_type),
            dom_access_function: parsed
                .codegen
                .dom_access_function
                .unwrap_or(defaults.dom_access_function),
            panel_types: parsed.codegen.panel_types.unwrap_or(defaults.panel_types),
        })
    }

    /// Set the placeholder policy
    pub fn with_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the type used for placeholder temporaries
    pub fn with_host_element_type(mut self, ty: impl Into<String>) -> Self {
        self.host_element_type = ty.into();
        self
    }

    /// Set the runtime DOM lookup function
    pub fn with_dom_access_function(mut self, function: impl Into<String>) -> Self {
        self.dom_access_function = function.into();
        self
    }

    /// Treat another widget type as an HTML panel
    pub fn with_panel_type(mut self, local_name: impl Into<String>) -> Self {
        self.panel_types.push(local_name.into());
        self
    }

    /// Whether widgets with this local name hold HTML content
    pub fn is_panel_type(&self, local_name: &str) -> bool {
        self.panel_types.iter().any(|p| p == local_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BinderConfig::default();
        assert_eq!(config.host_element_type, "Element");
        assert_eq!(config.dom_access_function, "DomCursor.child");
        assert!(config.is_panel_type("HTMLPanel"));
        assert!(!config.is_panel_type("Button"));
        assert_eq!(config.policy, PlaceholderPolicy::default());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BinderConfig::new()
            .with_host_element_type("dom.Element")
            .with_dom_access_function("Dom.child")
            .with_panel_type("FlowPanel");

        assert_eq!(config.host_element_type, "dom.Element");
        assert_eq!(config.dom_access_function, "Dom.child");
        assert!(config.is_panel_type("HTMLPanel"));
        assert!(config.is_panel_type("FlowPanel"));
    }

    #[test]
    fn test_empty_toml_keeps_defaults() {
        let config = BinderConfig::from_str("").unwrap();
        assert_eq!(config.host_element_type, "Element");
        assert_eq!(config.policy, PlaceholderPolicy::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = BinderConfig::from_str(
            r#"
            [codegen]
            host_element_type = "dom.Element"
            panel_types = ["FlowPanel"]

            [placeholders]
            default = "div"

            [placeholders.children]
            select = "option"
            ul = "span"
            "#,
        )
        .unwrap();

        assert_eq!(config.host_element_type, "dom.Element");
        assert_eq!(config.dom_access_function, "DomCursor.child");
        assert!(!config.is_panel_type("HTMLPanel"));
        assert!(config.is_panel_type("FlowPanel"));
        assert_eq!(config.policy.default_tag(), "div");
        assert_eq!(config.policy.placeholder_for_parent(Some("select")), "option");
        assert_eq!(config.policy.placeholder_for_parent(Some("ul")), "span");
        assert_eq!(config.policy.placeholder_for_parent(Some("table")), "tbody");
    }

    #[test]
    fn test_invalid_toml() {
        let result = BinderConfig::from_str("[codegen\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
