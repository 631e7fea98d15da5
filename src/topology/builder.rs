//! Topology builder.
//!
//! Merges the raw diagram (nodes and links keyed by editor references) with
//! the region classification into a normalized topology keyed by router
//! display names. Structural problems in single nodes or links are logged
//! and skipped so one bad entry does not sink the whole project.

use crate::topology::regions::RegionSet;
use crate::topology::router_id::router_number;
use crate::topology::types::{Diagram, EndpointRef, Position, RouterClassification};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

/// A router with its derived identity and routing domain
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    pub name: String,
    pub node_ref: String,
    pub router_id: u64,
    pub position: Position,
    pub classification: RouterClassification,
}

impl Router {
    pub fn as_number(&self) -> Option<u32> {
        self.classification.as_number
    }
}

/// One side of a resolved link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEnd {
    pub router: String,
    pub interface: String,
}

/// A link between two routers, both ends resolved to names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub a: LinkEnd,
    pub b: LinkEnd,
}

/// Normalized topology: routers in project order plus their links
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub routers: Vec<Router>,
    pub links: Vec<Link>,
}

impl Topology {
    /// Find a router by display name
    pub fn router(&self, name: &str) -> Option<&Router> {
        self.routers.iter().find(|router| router.name == name)
    }

    /// Names of all routers flagged as border routers
    pub fn border_routers(&self) -> Vec<&str> {
        self.routers
            .iter()
            .filter(|router| router.classification.is_border)
            .map(|router| router.name.as_str())
            .collect()
    }
}

/// Build the normalized topology from a diagram and its classified regions
pub fn build_topology(diagram: &Diagram, regions: &RegionSet) -> Topology {
    let mut routers: Vec<Router> = Vec::new();
    let mut by_ref: HashMap<&str, usize> = HashMap::new();
    let mut names: HashSet<&str> = HashSet::new();

    for node in &diagram.nodes {
        if !node.kind.is_router() {
            debug!("Ignoring node '{}' of kind {:?}", node.name, node.kind);
            continue;
        }
        if by_ref.contains_key(node.node_ref.as_str()) {
            warn!("Duplicate node reference '{}' for '{}', skipping", node.node_ref, node.name);
            continue;
        }
        if !names.insert(node.name.as_str()) {
            warn!("Duplicate router name '{}', keeping the first occurrence", node.name);
            continue;
        }

        let classification = regions.locate(node.position);
        info!(
            "Router {}: AS {} ({})",
            node.name,
            classification.as_number.map_or_else(|| "?".to_string(), |n| n.to_string()),
            classification.protocol
        );

        by_ref.insert(node.node_ref.as_str(), routers.len());
        routers.push(Router {
            name: node.name.clone(),
            node_ref: node.node_ref.clone(),
            router_id: router_number(&node.name),
            position: node.position,
            classification,
        });
    }

    let resolve = |endpoint: &EndpointRef| -> Option<usize> {
        let index = by_ref.get(endpoint.node_ref.as_str()).copied();
        if index.is_none() {
            warn!("Link endpoint references unknown router '{}', dropping link", endpoint.node_ref);
        }
        index
    };

    let mut links = Vec::new();
    let mut border_pairs = Vec::new();

    for raw in &diagram.links {
        let (Some(a), Some(b)) = (resolve(&raw.a), resolve(&raw.b)) else {
            continue;
        };
        if a == b {
            warn!("Link from '{}' to itself, dropping", routers[a].name);
            continue;
        }

        if let (Some(as_a), Some(as_b)) = (routers[a].as_number(), routers[b].as_number()) {
            if as_a != as_b {
                border_pairs.push((a, b));
            }
        }

        links.push(Link {
            a: LinkEnd {
                router: routers[a].name.clone(),
                interface: raw.a.interface_name(),
            },
            b: LinkEnd {
                router: routers[b].name.clone(),
                interface: raw.b.interface_name(),
            },
        });
    }

    for (a, b) in border_pairs {
        routers[a].classification.is_border = true;
        routers[b].classification.is_border = true;
    }

    info!("Topology: {} routers, {} links", routers.len(), links.len());

    Topology { routers, links }
}
