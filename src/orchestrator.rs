//! Planning orchestrator.
//!
//! This module chains the engine stages (region classification, topology
//! building, address planning, document assembly) and owns the only side
//! effect of the crate: writing the finished document.

use crate::config::PlannerConfig;
use crate::document::TopologyDocument;
use crate::gns3_parser::parse_project_file;
use crate::ip::{plan_addresses, AddressingParams, PlanError};
use crate::topology::{build_topology, classify_regions, ColorProtocols, Diagram};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{error, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Run the whole engine on an in-memory diagram.
///
/// Pure: the same diagram and parameters always give the same document.
pub fn build_document(
    diagram: &Diagram,
    color_protocols: &ColorProtocols,
    params: &AddressingParams,
) -> Result<TopologyDocument, PlanError> {
    let regions = classify_regions(&diagram.annotations, color_protocols);
    info!(
        "Detected {} regions, {} of them routing domains",
        regions.regions.len(),
        regions.regions.iter().filter(|r| r.as_number.is_some()).count()
    );

    let topology = build_topology(diagram, &regions);
    let borders = topology.border_routers();
    if !borders.is_empty() {
        info!("Border routers: {}", borders.join(", "));
    }

    let plan = plan_addresses(&topology, params)?;
    if !plan.is_empty() {
        info!("Planned {} addresses for {} routers", plan.address_count(), plan.len());
    }

    TopologyDocument::assemble(&topology, &plan, params.base.to_string(), params.loopback_format)
}

/// Where the document of `project` goes.
///
/// A single project writes `<output_dir>/<output_name>`; in batch mode the
/// project's file stem is prepended so documents do not overwrite each other.
pub fn output_path_for(project: &Path, output_dir: &Path, output_name: &str, batch: bool) -> PathBuf {
    if !batch {
        return output_dir.join(output_name);
    }
    let stem = project
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    output_dir.join(format!("{}.{}", stem, output_name))
}

/// Parse, plan and write one project, returning the written document path
pub fn process_project(project: &Path, output_path: &Path, config: &PlannerConfig) -> Result<PathBuf> {
    info!("Processing project {:?}", project);

    let params = config.addressing_params()?;
    let diagram = parse_project_file(project, &config.router_node_types)?;
    let document = build_document(&diagram, &config.color_protocols, &params)
        .wrap_err_with(|| format!("Address planning failed for '{}'", project.display()))?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create output directory '{}'", parent.display()))?;
    }
    document.write_to(output_path)?;

    info!(
        "Topology exported to {:?}: {} routers, {} links",
        output_path,
        document.routers.len(),
        document.links.len()
    );
    Ok(output_path.to_path_buf())
}

/// Process independent projects in parallel.
///
/// Results come back in the order of `projects`; one failing project does
/// not stop the others.
pub fn process_projects(projects: &[PathBuf], output_dir: &Path, config: &PlannerConfig) -> Vec<Result<PathBuf>> {
    let batch = projects.len() > 1;
    projects
        .par_iter()
        .map(|project| {
            let output_path = output_path_for(project, output_dir, &config.output_name, batch);
            process_project(project, &output_path, config).inspect_err(|e| {
                error!("Project {:?} failed: {:#}", project, e);
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::default_color_protocols;

    #[test]
    fn test_output_path_single() {
        let path = output_path_for(Path::new("/labs/core.gns3"), Path::new("out"), "topology.json", false);
        assert_eq!(path, PathBuf::from("out/topology.json"));
    }

    #[test]
    fn test_output_path_batch() {
        let path = output_path_for(Path::new("/labs/core.gns3"), Path::new("out"), "topology.json", true);
        assert_eq!(path, PathBuf::from("out/core.topology.json"));
    }

    #[test]
    fn test_empty_diagram() {
        let document = build_document(&Diagram::default(), &default_color_protocols(), &AddressingParams::default()).unwrap();
        assert!(document.routers.is_empty());
        assert!(document.links.is_empty());
        assert_eq!(document.ip_base, "2000:1::/64");
    }
}
