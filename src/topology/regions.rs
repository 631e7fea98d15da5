//! Region classification.
//!
//! Colored rectangles drawn over the topology mark routing domains. The
//! border (or fill) color selects the interior protocol and each recognized
//! rectangle opens a new autonomous system: 100, 200, 300... in the order the
//! rectangles are listed in the project.

use crate::topology::types::{Annotation, Position, Protocol, RouterClassification};
use log::debug;
use std::collections::BTreeMap;

/// First AS number handed out
pub const FIRST_AS_NUMBER: u32 = 100;
/// Distance between consecutive AS numbers
pub const AS_NUMBER_STEP: u32 = 100;

/// Hex color (six digits, no `#`) to protocol table
pub type ColorProtocols = BTreeMap<String, Protocol>;

/// Red rectangles are RIP domains, green ones OSPF domains
pub fn default_color_protocols() -> ColorProtocols {
    let mut table = BTreeMap::new();
    table.insert("ff0000".to_string(), Protocol::Rip);
    table.insert("00ff00".to_string(), Protocol::Ospf);
    table
}

/// Look up a color in the table, ignoring hex digit case
pub fn protocol_for_color(color: &str, table: &ColorProtocols) -> Protocol {
    table
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(color))
        .map(|(_, protocol)| *protocol)
        .unwrap_or(Protocol::Unknown)
}

/// A classified annotation rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub protocol: Protocol,
    /// Only set for recognized protocols
    pub as_number: Option<u32>,
}

impl Region {
    /// Inclusive bounding-box test; routers are treated as points.
    pub fn contains(&self, point: Position) -> bool {
        let x_max = self.x + f64::from(self.width);
        let y_max = self.y + f64::from(self.height);
        self.x <= point.x && point.x <= x_max && self.y <= point.y && point.y <= y_max
    }
}

/// Result of a classification pass.
///
/// `next_as` is the AS number the next recognized rectangle would receive.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub next_as: u32,
}

impl Default for RegionSet {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            next_as: FIRST_AS_NUMBER,
        }
    }
}

impl RegionSet {
    /// Append one rectangle, consuming an AS number if its color is known
    pub fn push(&mut self, annotation: &Annotation, table: &ColorProtocols) {
        let protocol = protocol_for_color(&annotation.color, table);
        let as_number = if protocol.is_recognized() {
            let assigned = self.next_as;
            self.next_as = self.next_as.saturating_add(AS_NUMBER_STEP);
            Some(assigned)
        } else {
            None
        };

        self.regions.push(Region {
            x: annotation.position.x,
            y: annotation.position.y,
            width: annotation.width,
            height: annotation.height,
            color: annotation.color.clone(),
            protocol,
            as_number,
        });
    }

    /// Routing domain of a router at `position`.
    ///
    /// The first containing region with a recognized protocol wins; later
    /// overlapping regions are ignored. Outside every recognized region the
    /// router is `UNKNOWN` without an AS.
    pub fn locate(&self, position: Position) -> RouterClassification {
        self.regions
            .iter()
            .filter(|region| region.protocol.is_recognized())
            .find(|region| region.contains(position))
            .map(|region| RouterClassification {
                protocol: region.protocol,
                as_number: region.as_number,
                is_border: false,
            })
            .unwrap_or_default()
    }
}

/// Classify annotation rectangles in listing order
pub fn classify_regions(annotations: &[Annotation], table: &ColorProtocols) -> RegionSet {
    let set = annotations
        .iter()
        .fold(RegionSet::default(), |mut set, annotation| {
            set.push(annotation, table);
            set
        });

    for region in &set.regions {
        debug!(
            "Region {:?} ({}) at ({}, {}) size {}x{}",
            region.as_number, region.protocol, region.x, region.y, region.width, region.height
        );
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, width: u32, height: u32, color: &str) -> Annotation {
        Annotation {
            position: Position::new(x, y),
            width,
            height,
            color: color.to_string(),
        }
    }

    #[test]
    fn test_as_numbers_follow_listing_order() {
        let annotations = vec![
            rect(0.0, 0.0, 100, 100, "ff0000"),
            rect(200.0, 0.0, 100, 100, "00ff00"),
            rect(400.0, 0.0, 100, 100, "FF0000"),
        ];
        let set = classify_regions(&annotations, &default_color_protocols());

        let numbers: Vec<_> = set.regions.iter().map(|r| r.as_number).collect();
        assert_eq!(numbers, vec![Some(100), Some(200), Some(300)]);
        assert_eq!(set.regions[1].protocol, Protocol::Ospf);
        assert_eq!(set.regions[2].protocol, Protocol::Rip);
        assert_eq!(set.next_as, 400);
    }

    #[test]
    fn test_unknown_color_gets_no_as_number() {
        let annotations = vec![
            rect(0.0, 0.0, 10, 10, "0000ff"),
            rect(0.0, 0.0, 10, 10, "ff0000"),
        ];
        let set = classify_regions(&annotations, &default_color_protocols());

        assert_eq!(set.regions[0].protocol, Protocol::Unknown);
        assert_eq!(set.regions[0].as_number, None);
        // the unknown rectangle does not consume a number
        assert_eq!(set.regions[1].as_number, Some(100));
    }

    #[test]
    fn test_containment_is_inclusive() {
        let set = classify_regions(&[rect(10.0, 20.0, 100, 50, "ff0000")], &default_color_protocols());
        let region = &set.regions[0];

        assert!(region.contains(Position::new(10.0, 20.0)));
        assert!(region.contains(Position::new(110.0, 70.0)));
        assert!(region.contains(Position::new(10.0, 70.0)));
        assert!(region.contains(Position::new(60.0, 45.0)));
        assert!(!region.contains(Position::new(9.0, 45.0)));
        assert!(!region.contains(Position::new(111.0, 45.0)));
        assert!(!region.contains(Position::new(60.0, 71.0)));
    }

    #[test]
    fn test_fractional_position_just_outside() {
        let set = classify_regions(&[rect(0.0, 0.0, 100, 100, "ff0000")], &default_color_protocols());
        let region = &set.regions[0];

        assert!(region.contains(Position::new(99.6, 100.0)));
        assert!(!region.contains(Position::new(100.4, 50.0)));
        assert!(!region.contains(Position::new(-0.2, 50.0)));
    }

    #[test]
    fn test_first_recognized_region_wins() {
        let annotations = vec![
            rect(0.0, 0.0, 1000, 1000, "123456"),
            rect(0.0, 0.0, 500, 500, "00ff00"),
            rect(100.0, 100.0, 50, 50, "ff0000"),
        ];
        let set = classify_regions(&annotations, &default_color_protocols());

        // inside all three; the unknown one is skipped, the OSPF one comes first
        let inner = set.locate(Position::new(120.0, 120.0));
        assert_eq!(inner.protocol, Protocol::Ospf);
        assert_eq!(inner.as_number, Some(100));

        // only inside the unknown rectangle
        let outer = set.locate(Position::new(900.0, 900.0));
        assert_eq!(outer.protocol, Protocol::Unknown);
        assert_eq!(outer.as_number, None);
    }

    #[test]
    fn test_router_outside_every_region() {
        let set = classify_regions(&[rect(0.0, 0.0, 10, 10, "ff0000")], &default_color_protocols());
        let classification = set.locate(Position::new(-5.0, 3.0));
        assert_eq!(classification, RouterClassification::default());
    }

    #[test]
    fn test_custom_color_table() {
        let mut table = ColorProtocols::new();
        table.insert("0000FF".to_string(), Protocol::Ospf);
        let set = classify_regions(&[rect(0.0, 0.0, 10, 10, "0000ff")], &table);
        assert_eq!(set.regions[0].protocol, Protocol::Ospf);
    }
}
