//! # Topoplan - Topology extraction and IPv6 address planning for GNS3 projects
//!
//! This library turns a GNS3 project, drawn with colored rectangles marking
//! routing domains, into a normalized topology document with a complete IPv6
//! address plan. Config renderers (RIP, OSPF, BGP) consume the document and
//! never look at the project again.
//!
//! ## Pipeline
//!
//! - `gns3_parser`: reads the `.gns3` JSON into nodes, links and rectangles
//! - `topology::regions`: rectangle colors become protocols and AS numbers
//!   (100, 200, ... in listing order); routers land in the first recognized
//!   rectangle that contains them
//! - `topology::router_id`: router IDs from the last digit run of the name
//! - `topology::builder`: resolved links, interface names, border routers
//! - `ip`: mnemonic link and loopback addresses
//! - `document`: the serialized result
//! - `orchestrator`: the pipeline above plus the final write
//!
//! ## Address layout
//!
//! ```text
//! intra-domain link  2000:1:<AS>:<low_id>:<high_id>::<id>/80
//! inter-domain link  2000:1:0:<low_as>:<high_as>:<low_id>:<high_id>:<id>/112
//! loopback           2000::<id>  or  2000:2:<AS>::<id>
//! ```
//!
//! AS numbers and router IDs are written with their decimal digits, so
//! `2000:1:100:1:2::1` is router 1 on the link between R1 and R2 in AS 100.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use topoplan::{config::PlannerConfig, orchestrator};
//!
//! let config = PlannerConfig::default();
//! let written = orchestrator::process_project(
//!     Path::new("lab/lab.gns3"),
//!     Path::new("lab/topology.json"),
//!     &config,
//! )?;
//! println!("wrote {}", written.display());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Malformed project entries are skipped with a warning. Addressing errors
//! (a value too large for its address group, the same address handed out
//! twice) abort planning with a `PlanError` naming the routers and
//! interfaces involved. File handling returns `color_eyre` reports with context.

pub mod config;
pub mod config_loader;
pub mod gns3_parser;
pub mod document;

pub mod ip;
pub mod topology;
pub mod orchestrator;
