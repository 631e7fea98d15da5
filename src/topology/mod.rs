//! Network topology module.
//!
//! This module turns a drawn diagram into a normalized topology: router
//! identifiers, routing domains taken from colored regions, and resolved
//! links with border detection.

pub mod types;
pub mod router_id;
pub mod regions;
pub mod builder;

// Re-export key types and functions for easier access
pub use types::{Annotation, Diagram, DiagramLink, DiagramNode, EndpointRef, NodeKind, Position, Protocol, RouterClassification};
pub use router_id::{bgp_router_id, router_number};
pub use regions::{classify_regions, default_color_protocols, ColorProtocols, Region, RegionSet};
pub use builder::{build_topology, Link, LinkEnd, Router, Topology};
