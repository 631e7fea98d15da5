//! Topology type definitions.
//!
//! This file contains the input records handed over by the project loader
//! (nodes, links, annotations) and the classification types shared by the
//! region classifier, the topology builder and the address planner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an item on the editor canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind of a diagram node. Only routers take part in the address plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Router,
    /// Switches, hosts, clouds... keeps the editor's type name for logging
    Other(String),
}

impl NodeKind {
    /// Returns true if this node participates in the topology
    pub fn is_router(&self) -> bool {
        matches!(self, Self::Router)
    }
}

/// A node as drawn in the editor
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    /// Internal reference key used by links (GNS3 `node_id`)
    pub node_ref: String,
    /// Display label, used as the stable external name
    pub name: String,
    pub position: Position,
    pub kind: NodeKind,
}

/// One side of a raw link: which node, which adapter slot and which port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRef {
    pub node_ref: String,
    pub adapter: u32,
    pub port: u32,
}

impl EndpointRef {
    /// Interface name of this endpoint on a c7200 chassis
    pub fn interface_name(&self) -> String {
        interface_name(self.adapter, self.port)
    }
}

/// A raw link between two node references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramLink {
    pub a: EndpointRef,
    pub b: EndpointRef,
}

/// A colored annotation rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub position: Position,
    pub width: u32,
    pub height: u32,
    /// Six hex digits, no leading `#`
    pub color: String,
}

/// Everything the engine needs from a drawn topology, fully materialized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub links: Vec<DiagramLink>,
    pub annotations: Vec<Annotation>,
}

/// Interior gateway protocol attached to a region color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "RIP")]
    Rip,
    #[serde(rename = "OSPF")]
    Ospf,
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Protocol {
    /// Returns true for protocols that open a routing domain
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rip => write!(f, "RIP"),
            Self::Ospf => write!(f, "OSPF"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Routing domain a router was placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterClassification {
    pub protocol: Protocol,
    pub as_number: Option<u32>,
    pub is_border: bool,
}

/// Translate GNS3 adapter/port numbers to Cisco IOS interface names.
///
/// Adapter 0 is the built-in FastEthernet of a c7200, every further adapter
/// slot holds a GigabitEthernet module.
pub fn interface_name(adapter: u32, port: u32) -> String {
    if adapter == 0 {
        format!("FastEthernet0/{}", port)
    } else {
        format!("GigabitEthernet{}/{}", adapter, port)
    }
}
