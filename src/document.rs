//! Topology document.
//!
//! The document is the only thing config renderers get to see, so it has to
//! carry everything they need: domains, border flags, loopbacks, interface
//! addresses and connected subnets. Field names are part of the contract.

use crate::ip::{AddressPlan, InterfaceAssignment, LoopbackFormat, PlanError};
use crate::topology::{bgp_router_id, Protocol, Topology};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Interface address entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceEntry {
    pub name: String,
    pub ip: Ipv6Addr,
    pub prefix: u8,
}

impl From<&InterfaceAssignment> for InterfaceEntry {
    fn from(assignment: &InterfaceAssignment) -> Self {
        Self {
            name: assignment.name.clone(),
            ip: assignment.address,
            prefix: assignment.prefix_len,
        }
    }
}

/// Router entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterEntry {
    pub name: String,
    pub router_id: u64,
    pub bgp_router_id: Ipv4Addr,
    pub protocol: Protocol,
    pub as_number: Option<u32>,
    pub is_border: bool,
    pub loopback: InterfaceEntry,
    pub interfaces: Vec<InterfaceEntry>,
    pub networks: Vec<String>,
}

/// Link entry, named by router and interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub a: String,
    pub a_iface: String,
    pub b: String,
    pub b_iface: String,
}

/// Normalized, addressed topology handed to the config renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDocument {
    pub ip_base: String,
    pub loopback_format: LoopbackFormat,
    pub routers: Vec<RouterEntry>,
    pub links: Vec<LinkEntry>,
}

impl TopologyDocument {
    /// Combine the topology and its address plan, routers in topology order
    pub fn assemble(
        topology: &Topology,
        plan: &AddressPlan,
        ip_base: String,
        loopback_format: LoopbackFormat,
    ) -> Result<Self, PlanError> {
        let routers = topology
            .routers
            .iter()
            .map(|router| {
                let addresses = plan
                    .router(&router.name)
                    .ok_or_else(|| PlanError::UnknownRouter(router.name.clone()))?;
                Ok(RouterEntry {
                    name: router.name.clone(),
                    router_id: router.router_id,
                    bgp_router_id: bgp_router_id(&router.name),
                    protocol: router.classification.protocol,
                    as_number: router.classification.as_number,
                    is_border: router.classification.is_border,
                    loopback: InterfaceEntry::from(&addresses.loopback),
                    interfaces: addresses.interfaces.iter().map(InterfaceEntry::from).collect(),
                    networks: addresses.networks.iter().cloned().collect(),
                })
            })
            .collect::<Result<Vec<_>, PlanError>>()?;

        let links = topology
            .links
            .iter()
            .map(|link| LinkEntry {
                a: link.a.router.clone(),
                a_iface: link.a.interface.clone(),
                b: link.b.router.clone(),
                b_iface: link.b.interface.clone(),
            })
            .collect();

        Ok(Self {
            ip_base,
            loopback_format,
            routers,
            links,
        })
    }

    /// Find a router entry by name
    pub fn router(&self, name: &str) -> Option<&RouterEntry> {
        self.routers.iter().find(|router| router.name == name)
    }

    /// Pretty JSON, the on-disk form
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("Failed to serialize topology document")
    }

    /// Write the document to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json + "\n")
            .wrap_err_with(|| format!("Failed to write topology document '{}'", path.display()))
    }

    /// Read a previously written document
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read topology document '{}'", path.display()))?;
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid topology document '{}'", path.display()))
    }
}
