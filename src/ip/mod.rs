//! IPv6 address planning module.
//!
//! This module assigns link and loopback addresses using the mnemonic
//! layout: AS numbers and router IDs are written straight into the address
//! groups so every address can be read without a lookup table.

pub mod encoding;
pub mod loopback;
pub mod planner;

// Re-export commonly used types
pub use encoding::{AddressingError, BasePrefix};
pub use loopback::{loopback_address, LoopbackFormat};
pub use planner::{plan_addresses, AddressPlan, AddressingParams, InterfaceAssignment, LinkLayout, LinkSubnet, PlanError, RouterAddresses};
