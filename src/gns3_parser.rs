use crate::topology::{Annotation, Diagram, DiagramLink, DiagramNode, EndpointRef, NodeKind, Position};
use color_eyre::eyre::{eyre, Result, WrapErr};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Node type GNS3 uses for Cisco IOS routers
pub const DYNAMIPS_NODE_TYPE: &str = "dynamips";

/// Color used for rectangles without stroke or fill
pub const DEFAULT_DRAWING_COLOR: &str = "000000";

// `(?:^|\s)` keeps `stroke-width` from matching as the rectangle width
static SVG_WIDTH: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r#"(?:^|\s)width="(\d+)""#).expect("Invalid svg width regex")
);
static SVG_HEIGHT: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r#"(?:^|\s)height="(\d+)""#).expect("Invalid svg height regex")
);
static SVG_STROKE: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r##"stroke="#([0-9a-fA-F]+)""##).expect("Invalid svg stroke regex")
);
static SVG_FILL: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r##"fill="#([0-9a-fA-F]+)""##).expect("Invalid svg fill regex")
);

/// Node entry of a .gns3 project
#[derive(Debug, Clone, Deserialize)]
struct RawNode {
    node_id: String,
    name: String,
    #[serde(default)]
    node_type: String,
    x: f64,
    y: f64,
}

/// One side of a link entry
#[derive(Debug, Clone, Deserialize)]
struct RawLinkEnd {
    node_id: String,
    adapter_number: u32,
    port_number: u32,
}

/// Link entry of a .gns3 project
#[derive(Debug, Clone, Deserialize)]
struct RawLink {
    nodes: Vec<RawLinkEnd>,
}

/// Drawing entry of a .gns3 project
#[derive(Debug, Clone, Deserialize)]
struct RawDrawing {
    x: f64,
    y: f64,
    svg: String,
}

/// Size and color of an SVG rectangle drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgRectangle {
    pub width: u32,
    pub height: u32,
    pub color: String,
}

/// Parse width, height and color out of a drawing's SVG source.
///
/// The color is the stroke color, or the fill color if the rectangle has no
/// border, or black. Returns None when width or height is missing.
pub fn parse_svg_rectangle(svg: &str) -> Option<SvgRectangle> {
    let capture_number = |pattern: &Regex| -> Option<u32> {
        pattern.captures(svg)?.get(1)?.as_str().parse().ok()
    };

    let width = capture_number(&SVG_WIDTH)?;
    let height = capture_number(&SVG_HEIGHT)?;
    let color = SVG_STROKE
        .captures(svg)
        .or_else(|| SVG_FILL.captures(svg))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_DRAWING_COLOR.to_string());

    Some(SvgRectangle { width, height, color })
}

/// Entries of `section`, looked up under `topology` first and then at the root
fn section<'a>(project: &'a Value, name: &str) -> &'a [Value] {
    project
        .get("topology")
        .and_then(|topology| topology.get(name))
        .or_else(|| project.get(name))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Deserialize every entry of a section, skipping malformed ones with a warning
fn entries<T: DeserializeOwned>(values: &[Value], what: &str) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match T::deserialize(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping malformed {} #{}: {}", what, index, e);
                None
            }
        })
        .collect()
}

/// Parse the JSON content of a .gns3 project into a diagram.
///
/// Nodes whose `node_type` is listed in `router_node_types` become routers,
/// every other node is kept with its type name and ignored later on.
pub fn parse_project(content: &str, router_node_types: &[String]) -> Result<Diagram> {
    let project: Value = serde_json::from_str(content).wrap_err("Project file is not valid JSON")?;
    if !project.is_object() {
        return Err(eyre!("Project file must contain a JSON object"));
    }

    let nodes = entries::<RawNode>(section(&project, "nodes"), "node")
        .into_iter()
        .map(|raw| {
            let kind = if router_node_types.iter().any(|t| t == &raw.node_type) {
                NodeKind::Router
            } else {
                NodeKind::Other(raw.node_type)
            };
            DiagramNode {
                node_ref: raw.node_id,
                name: raw.name,
                position: Position::new(raw.x, raw.y),
                kind,
            }
        })
        .collect::<Vec<_>>();

    let links = entries::<RawLink>(section(&project, "links"), "link")
        .into_iter()
        .filter_map(|raw| match <[RawLinkEnd; 2]>::try_from(raw.nodes) {
            Ok([a, b]) => Some(DiagramLink {
                a: EndpointRef { node_ref: a.node_id, adapter: a.adapter_number, port: a.port_number },
                b: EndpointRef { node_ref: b.node_id, adapter: b.adapter_number, port: b.port_number },
            }),
            Err(ends) => {
                log::warn!("Skipping link with {} endpoints, expected 2", ends.len());
                None
            }
        })
        .collect::<Vec<_>>();

    let annotations = entries::<RawDrawing>(section(&project, "drawings"), "drawing")
        .into_iter()
        .filter_map(|raw| {
            let Some(rectangle) = parse_svg_rectangle(&raw.svg) else {
                log::debug!("Drawing at ({}, {}) is not a sized shape, ignoring", raw.x, raw.y);
                return None;
            };
            Some(Annotation {
                position: Position::new(raw.x, raw.y),
                width: rectangle.width,
                height: rectangle.height,
                color: rectangle.color,
            })
        })
        .collect::<Vec<_>>();

    log::info!(
        "Project contains {} nodes, {} links, {} rectangles",
        nodes.len(),
        links.len(),
        annotations.len()
    );

    Ok(Diagram { nodes, links, annotations })
}

/// Parse a .gns3 project file
pub fn parse_project_file(path: &Path, router_node_types: &[String]) -> Result<Diagram> {
    let content = fs::read_to_string(path)
        .map_err(|e| eyre!("Failed to read project file '{}': {}", path.display(), e))?;

    parse_project(&content, router_node_types)
        .wrap_err_with(|| format!("Failed to parse project file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn routers() -> Vec<String> {
        vec![DYNAMIPS_NODE_TYPE.to_string()]
    }

    const PROJECT: &str = r##"{
        "name": "lab",
        "topology": {
            "nodes": [
                { "node_id": "a1", "name": "R1", "node_type": "dynamips", "x": 10, "y": 20 },
                { "node_id": "b2", "name": "R2", "node_type": "dynamips", "x": 60.4, "y": 80 },
                { "node_id": "s1", "name": "SW1", "node_type": "ethernet_switch", "x": 0, "y": 0 }
            ],
            "links": [
                { "link_id": "l1", "nodes": [
                    { "node_id": "a1", "adapter_number": 0, "port_number": 0 },
                    { "node_id": "b2", "adapter_number": 1, "port_number": 0 }
                ] }
            ],
            "drawings": [
                { "x": -5, "y": 0, "svg": "<svg height=\"150\" width=\"200\"><rect height=\"150\" width=\"200\" fill=\"#ffffff\" stroke=\"#FF0000\" stroke-width=\"2\"/></svg>" },
                { "x": 0, "y": 0, "svg": "<svg height=\"24\" width=\"40\"><text>label</text></svg>" }
            ]
        }
    }"##;

    #[test]
    fn test_parse_project() {
        let diagram = parse_project(PROJECT, &routers()).unwrap();

        assert_eq!(diagram.nodes.len(), 3);
        assert_eq!(diagram.nodes[0].name, "R1");
        assert_eq!(diagram.nodes[0].position, Position::new(10.0, 20.0));
        assert_eq!(diagram.nodes[1].position, Position::new(60.0, 80.0));
        assert!(diagram.nodes[1].kind.is_router());
        assert_eq!(diagram.nodes[2].kind, NodeKind::Other("ethernet_switch".to_string()));

        assert_eq!(diagram.links.len(), 1);
        assert_eq!(diagram.links[0].a.node_ref, "a1");
        assert_eq!(diagram.links[0].b.adapter, 1);

        assert_eq!(diagram.annotations.len(), 2);
        assert_eq!(diagram.annotations[0].position, Position::new(-5.0, 0.0));
        assert_eq!(diagram.annotations[0].width, 200);
        assert_eq!(diagram.annotations[0].height, 150);
        assert_eq!(diagram.annotations[0].color, "FF0000");
        assert_eq!(diagram.annotations[1].color, DEFAULT_DRAWING_COLOR);
    }

    #[test]
    fn test_nodes_at_root() {
        let content = r#"{
            "nodes": [ { "node_id": "x", "name": "R9", "node_type": "dynamips", "x": 1, "y": 2 } ],
            "links": []
        }"#;
        let diagram = parse_project(content, &routers()).unwrap();
        assert_eq!(diagram.nodes.len(), 1);
        assert!(diagram.annotations.is_empty());
    }

    #[test]
    fn test_fractional_coordinates_are_kept() {
        let content = r#"{
            "nodes": [ { "node_id": "x", "name": "R9", "node_type": "dynamips", "x": 100.4, "y": -2.5 } ]
        }"#;
        let diagram = parse_project(content, &routers()).unwrap();
        assert_eq!(diagram.nodes[0].position, Position::new(100.4, -2.5));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let content = r#"{ "topology": {
            "nodes": [
                { "node_id": "a", "name": "R1", "node_type": "dynamips", "x": 0, "y": 0 },
                { "node_id": "b", "node_type": "dynamips", "x": 0, "y": 0 }
            ],
            "links": [
                { "nodes": [ { "node_id": "a", "adapter_number": 0, "port_number": 0 } ] },
                { "nodes": [ { "node_id": "a", "port_number": 0 }, { "node_id": "b", "adapter_number": 0, "port_number": 0 } ] }
            ],
            "drawings": [ { "x": 0, "y": 0 } ]
        } }"#;
        let diagram = parse_project(content, &routers()).unwrap();
        assert_eq!(diagram.nodes.len(), 1);
        assert!(diagram.links.is_empty());
        assert!(diagram.annotations.is_empty());
    }

    #[test]
    fn test_invalid_json_is_fatal() {
        assert!(parse_project("{ not json", &routers()).is_err());
        assert!(parse_project("[1, 2, 3]", &routers()).is_err());
    }

    #[test]
    fn test_svg_fill_fallback() {
        let svg = r##"<svg width="80" height="40"><rect width="80" height="40" fill="#00ff00"/></svg>"##;
        let rectangle = parse_svg_rectangle(svg).unwrap();
        assert_eq!(rectangle, SvgRectangle { width: 80, height: 40, color: "00ff00".to_string() });
    }

    #[test]
    fn test_svg_stroke_width_is_not_the_width() {
        let svg = r##"<svg stroke-width="3" height="10" width="30"><rect stroke="#ff0000"/></svg>"##;
        let rectangle = parse_svg_rectangle(svg).unwrap();
        assert_eq!(rectangle.width, 30);
        assert_eq!(rectangle.height, 10);
    }

    #[test]
    fn test_svg_without_size() {
        assert!(parse_svg_rectangle(r##"<svg><rect stroke="#ff0000"/></svg>"##).is_none());
    }

    #[test]
    fn test_parse_project_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", PROJECT).unwrap();

        let diagram = parse_project_file(temp_file.path(), &routers()).unwrap();
        assert_eq!(diagram.nodes.len(), 3);

        assert!(parse_project_file(Path::new("/nonexistent/lab.gns3"), &routers()).is_err());
    }
}
