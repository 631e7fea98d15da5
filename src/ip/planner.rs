//! Link address planning.
//!
//! Every link gets a subnet that embeds the AS numbers and router IDs of its
//! two ends; every interface gets the subnet plus its own router ID as the
//! host part. Both ends sort the embedded values, so either end computes the
//! same subnet on its own.
//!
//! ```text
//! intra-domain  <base>:<AS>:<low_id>:<high_id>::<id>                 /80
//! inter-domain  <base>:0:<low_as>:<high_as>:<low_id>:<high_id>:<id>  /112
//! ```

use super::encoding::{mnemonic_group, AddressingError, BasePrefix};
use super::loopback::{loopback_address, LoopbackFormat, LOOPBACK_INTERFACE, LOOPBACK_PREFIX_LEN};
use crate::topology::{LinkEnd, Router, Topology};
use ipnetwork::Ipv6Network;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::net::Ipv6Addr;
use thiserror::Error;

/// Prefix length of links inside one AS
pub const INTRA_DOMAIN_PREFIX_LEN: u8 = 80;
/// Prefix length of links between ASes
pub const INTER_DOMAIN_PREFIX_LEN: u8 = 112;

/// Caller-chosen addressing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressingParams {
    pub base: BasePrefix,
    pub loopback_format: LoopbackFormat,
}

/// Errors aborting the address plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("Cannot address {router} {interface}: {source}")]
    Addressing {
        router: String,
        interface: String,
        #[source]
        source: AddressingError,
    },
    #[error("Address {address} assigned twice on {router} ({first} and {second})")]
    DuplicateAddress {
        router: String,
        address: Ipv6Addr,
        first: String,
        second: String,
    },
    #[error("Address {address} of {router} {interface} is already used by {owner} {owner_interface}")]
    AddressConflict {
        address: Ipv6Addr,
        router: String,
        interface: String,
        owner: String,
        owner_interface: String,
    },
    #[error("Link references router '{0}' which is not in the topology")]
    UnknownRouter(String),
}

/// Which of the two layouts a link uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkLayout {
    IntraDomain { as_number: u32 },
    InterDomain { low_as: u32, high_as: u32 },
}

impl LinkLayout {
    /// Same non-zero AS on both sides is intra-domain, everything else inter-domain.
    /// A missing AS counts as 0.
    pub fn select(as_a: Option<u32>, as_b: Option<u32>) -> Self {
        let as_a = as_a.unwrap_or(0);
        let as_b = as_b.unwrap_or(0);
        if as_a == as_b && as_a != 0 {
            Self::IntraDomain { as_number: as_a }
        } else {
            Self::InterDomain {
                low_as: as_a.min(as_b),
                high_as: as_a.max(as_b),
            }
        }
    }

    pub fn prefix_len(&self) -> u8 {
        match self {
            Self::IntraDomain { .. } => INTRA_DOMAIN_PREFIX_LEN,
            Self::InterDomain { .. } => INTER_DOMAIN_PREFIX_LEN,
        }
    }
}

/// Subnet shared by the two ends of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSubnet {
    pub layout: LinkLayout,
    pub network: Ipv6Network,
}

impl LinkSubnet {
    /// Compute the subnet of a link from both ends' AS numbers and router IDs
    pub fn compute(
        base: &BasePrefix,
        (as_a, id_a): (Option<u32>, u64),
        (as_b, id_b): (Option<u32>, u64),
    ) -> Result<Self, AddressingError> {
        let [b0, b1] = base.groups();
        let low_id = mnemonic_group("router ID", id_a.min(id_b))?;
        let high_id = mnemonic_group("router ID", id_a.max(id_b))?;
        let layout = LinkLayout::select(as_a, as_b);

        let address = match layout {
            LinkLayout::IntraDomain { as_number } => {
                let as_group = mnemonic_group("AS number", u64::from(as_number))?;
                Ipv6Addr::new(b0, b1, as_group, low_id, high_id, 0, 0, 0)
            }
            LinkLayout::InterDomain { low_as, high_as } => {
                let low_as = mnemonic_group("AS number", u64::from(low_as))?;
                let high_as = mnemonic_group("AS number", u64::from(high_as))?;
                Ipv6Addr::new(b0, b1, 0, low_as, high_as, low_id, high_id, 0)
            }
        };

        let network = Ipv6Network::new(address, layout.prefix_len()).map_err(|e| {
            AddressingError::InvalidBasePrefix {
                prefix: base.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { layout, network })
    }

    /// Address of the interface owned by `router_id` on this subnet
    pub fn host(&self, router_id: u64) -> Result<Ipv6Addr, AddressingError> {
        let mut segments = self.network.network().segments();
        segments[7] = mnemonic_group("router ID", router_id)?;
        Ok(Ipv6Addr::from(segments))
    }

    pub fn prefix_len(&self) -> u8 {
        self.layout.prefix_len()
    }
}

/// An address bound to a named interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAssignment {
    pub name: String,
    pub address: Ipv6Addr,
    pub prefix_len: u8,
}

/// Addresses of a single router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterAddresses {
    pub loopback: InterfaceAssignment,
    /// Link interfaces in link order
    pub interfaces: Vec<InterfaceAssignment>,
    /// Directly connected subnets, sorted
    pub networks: BTreeSet<String>,
}

/// Complete address plan keyed by router name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPlan {
    routers: HashMap<String, RouterAddresses>,
    /// Router and interface holding each address, across the whole plan
    owners: HashMap<Ipv6Addr, (String, String)>,
}

impl AddressPlan {
    pub fn router(&self, name: &str) -> Option<&RouterAddresses> {
        self.routers.get(name)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Number of addresses handed out, loopbacks included
    pub fn address_count(&self) -> usize {
        self.owners.len()
    }

    /// Record `address` as owned by `router`'s `interface`.
    ///
    /// Every address is unique across the plan: reuse on the same router is a
    /// `DuplicateAddress`, reuse by another router an `AddressConflict`.
    fn claim(&mut self, router: &str, interface: &str, address: Ipv6Addr) -> Result<(), PlanError> {
        if let Some((owner, owner_interface)) = self.owners.get(&address) {
            return Err(if owner == router {
                PlanError::DuplicateAddress {
                    router: router.to_string(),
                    address,
                    first: owner_interface.clone(),
                    second: interface.to_string(),
                }
            } else {
                PlanError::AddressConflict {
                    address,
                    router: router.to_string(),
                    interface: interface.to_string(),
                    owner: owner.clone(),
                    owner_interface: owner_interface.clone(),
                }
            });
        }
        self.owners.insert(address, (router.to_string(), interface.to_string()));
        Ok(())
    }

    fn add_router(&mut self, router: &str, loopback: InterfaceAssignment) -> Result<(), PlanError> {
        self.claim(router, &loopback.name, loopback.address)?;
        self.routers.insert(
            router.to_string(),
            RouterAddresses {
                loopback,
                interfaces: Vec::new(),
                networks: BTreeSet::new(),
            },
        );
        Ok(())
    }

    fn assign(&mut self, router: &str, assignment: InterfaceAssignment, network: String) -> Result<(), PlanError> {
        if !self.routers.contains_key(router) {
            return Err(PlanError::UnknownRouter(router.to_string()));
        }
        self.claim(router, &assignment.name, assignment.address)?;

        if let Some(entry) = self.routers.get_mut(router) {
            entry.interfaces.push(assignment);
            entry.networks.insert(network);
        }
        Ok(())
    }
}

fn addressing_error(router: &str, interface: &str) -> impl FnOnce(AddressingError) -> PlanError {
    let router = router.to_string();
    let interface = interface.to_string();
    move |source| PlanError::Addressing { router, interface, source }
}

/// Check that the values one end embeds in a link subnet fit their groups
fn check_link_fields(router: &Router, end: &LinkEnd) -> Result<(), PlanError> {
    mnemonic_group("router ID", router.router_id).map_err(addressing_error(&router.name, &end.interface))?;
    if let Some(as_number) = router.as_number() {
        mnemonic_group("AS number", u64::from(as_number))
            .map_err(addressing_error(&router.name, &end.interface))?;
    }
    Ok(())
}

fn end_router<'a>(topology: &'a Topology, end: &LinkEnd) -> Result<&'a Router, PlanError> {
    topology
        .router(&end.router)
        .ok_or_else(|| PlanError::UnknownRouter(end.router.clone()))
}

/// Assign loopback and link addresses to every router of the topology
pub fn plan_addresses(topology: &Topology, params: &AddressingParams) -> Result<AddressPlan, PlanError> {
    let mut plan = AddressPlan::default();

    for router in &topology.routers {
        let address = loopback_address(router.router_id, router.as_number(), params.loopback_format)
            .map_err(addressing_error(&router.name, LOOPBACK_INTERFACE))?;
        plan.add_router(
            &router.name,
            InterfaceAssignment {
                name: LOOPBACK_INTERFACE.to_string(),
                address,
                prefix_len: LOOPBACK_PREFIX_LEN,
            },
        )?;
    }

    for link in &topology.links {
        let router_a = end_router(topology, &link.a)?;
        let router_b = end_router(topology, &link.b)?;
        check_link_fields(router_a, &link.a)?;
        check_link_fields(router_b, &link.b)?;

        let subnet = LinkSubnet::compute(
            &params.base,
            (router_a.as_number(), router_a.router_id),
            (router_b.as_number(), router_b.router_id),
        )
        .map_err(addressing_error(&router_a.name, &link.a.interface))?;
        let network = subnet.network.to_string();
        debug!("Link {} <-> {}: {}", router_a.name, router_b.name, network);

        for (router, end) in [(router_a, &link.a), (router_b, &link.b)] {
            let address = subnet
                .host(router.router_id)
                .map_err(addressing_error(&router.name, &end.interface))?;
            plan.assign(
                &router.name,
                InterfaceAssignment {
                    name: end.interface.clone(),
                    address,
                    prefix_len: subnet.prefix_len(),
                },
                network.clone(),
            )?;
        }
    }

    Ok(plan)
}
