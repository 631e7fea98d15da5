use crate::gns3_parser::DYNAMIPS_NODE_TYPE;
use crate::ip::{AddressingParams, BasePrefix, LoopbackFormat};
use crate::topology::{default_color_protocols, ColorProtocols, Protocol};
use serde::{Deserialize, Serialize};

/// Default base prefix for link addresses
pub const DEFAULT_IP_BASE: &str = "2000:1::/64";
/// Default file name of the written topology document
pub const DEFAULT_OUTPUT_NAME: &str = "topology.json";

/// Planner configuration: the flat parameter record a front end collects
/// before running the engine. Every field is optional in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Base prefix for link addresses (e.g., "2000:1::/64")
    pub ip_base: String,
    /// Loopback layout: `simple` or `as-qualified`
    pub loopback_format: LoopbackFormat,
    /// File name of the topology document
    pub output_name: String,
    /// GNS3 node types treated as routers
    pub router_node_types: Vec<String>,
    /// Rectangle color (six hex digits) to interior protocol
    pub color_protocols: ColorProtocols,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            ip_base: DEFAULT_IP_BASE.to_string(),
            loopback_format: LoopbackFormat::default(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            router_node_types: vec![DYNAMIPS_NODE_TYPE.to_string()],
            color_protocols: default_color_protocols(),
        }
    }
}

impl PlannerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ip_base
            .parse::<BasePrefix>()
            .map_err(|e| ValidationError::InvalidAddressing(e.to_string()))?;

        if self.output_name.trim().is_empty() {
            return Err(ValidationError::InvalidOutput("output_name cannot be empty".to_string()));
        }
        if self.output_name.contains('/') || self.output_name.contains('\\') {
            return Err(ValidationError::InvalidOutput(format!(
                "output_name must be a plain file name, got '{}'",
                self.output_name
            )));
        }

        if self.router_node_types.is_empty() {
            return Err(ValidationError::InvalidTopology(
                "router_node_types cannot be empty".to_string(),
            ));
        }

        for (color, protocol) in &self.color_protocols {
            if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ValidationError::InvalidTopology(format!(
                    "color '{}' must be six hex digits without '#'",
                    color
                )));
            }
            if *protocol == Protocol::Unknown {
                return Err(ValidationError::InvalidTopology(format!(
                    "color '{}' cannot map to UNKNOWN",
                    color
                )));
            }
        }

        Ok(())
    }

    /// Addressing parameters handed to the address planner
    pub fn addressing_params(&self) -> Result<AddressingParams, ValidationError> {
        let base = self
            .ip_base
            .parse::<BasePrefix>()
            .map_err(|e| ValidationError::InvalidAddressing(e.to_string()))?;
        Ok(AddressingParams {
            base,
            loopback_format: self.loopback_format,
        })
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid addressing configuration: {0}")]
    InvalidAddressing(String),
    #[error("Invalid output configuration: {0}")]
    InvalidOutput(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
}
