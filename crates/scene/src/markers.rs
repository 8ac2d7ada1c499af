use catalog::{Region, RegionCatalog};
use foundation::math::Vec3;

use crate::config::SceneConfig;
use crate::director::SceneState;

/// A straight segment between two marker positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec3,
    pub to: Vec3,
}

/// Placement of one region's marker and its availability-zone tower.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMarker {
    pub code: String,
    pub position: Vec3,
    pub radius: f64,
    pub highlighted: bool,
    pub selected: bool,
    /// One point per availability zone, stacked radially above `position`.
    pub az_towers: Vec<Vec3>,
    /// Links from the region marker up through each zone. Empty unless highlighted.
    pub connectors: Vec<Segment>,
}

pub fn layout_marker(region: &Region, state: &SceneState, config: &SceneConfig) -> RegionMarker {
    let position = region.geo_point().project(config.globe_radius);
    let up = position.normalize();
    let highlighted = state.is_highlighted(&region.code);

    let az_towers: Vec<Vec3> = (0..region.az_count())
        .map(|i| position + up * ((i + 1) as f64 * config.az_spacing))
        .collect();

    let connectors = if highlighted {
        std::iter::once(position)
            .chain(az_towers.iter().copied())
            .zip(az_towers.iter().copied())
            .map(|(from, to)| Segment { from, to })
            .collect()
    } else {
        Vec::new()
    };

    RegionMarker {
        code: region.code.clone(),
        position,
        radius: config.marker_radius,
        highlighted,
        selected: state.selected_region.as_deref() == Some(region.code.as_str()),
        az_towers,
        connectors,
    }
}

/// Lays out a marker for every catalog region, in catalog order.
pub fn layout_markers(
    catalog: &RegionCatalog,
    state: &SceneState,
    config: &SceneConfig,
) -> Vec<RegionMarker> {
    catalog
        .iter()
        .map(|region| layout_marker(region, state, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::project;

    fn catalog() -> RegionCatalog {
        RegionCatalog::bundled().unwrap()
    }

    fn state_with(highlighted: &[&str], selected: Option<&str>) -> SceneState {
        SceneState {
            highlighted: highlighted.iter().map(|c| c.to_string()).collect(),
            selected_region: selected.map(str::to_string),
            ..SceneState::default()
        }
    }

    #[test]
    fn one_marker_per_region_on_the_globe() {
        let catalog = catalog();
        let config = SceneConfig::default();
        let markers = layout_markers(&catalog, &SceneState::default(), &config);
        assert_eq!(markers.len(), catalog.len());
        for (marker, region) in markers.iter().zip(catalog.iter()) {
            assert_eq!(marker.code, region.code);
            assert!(marker.position.distance(project(region.lat, region.lng, 50.0)) < 1e-9);
            assert!(!marker.highlighted);
            assert!(marker.connectors.is_empty());
        }
    }

    #[test]
    fn az_towers_stack_outwards() {
        let catalog = catalog();
        let config = SceneConfig::default();
        let region = catalog.get("us-east-1").unwrap();
        let marker = layout_marker(region, &SceneState::default(), &config);

        assert_eq!(marker.az_towers.len(), 6);
        for (i, tower) in marker.az_towers.iter().enumerate() {
            let expected = 50.0 + (i + 1) as f64 * config.az_spacing;
            assert!((tower.length() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn highlighted_region_gets_connectors() {
        let catalog = catalog();
        let config = SceneConfig::default();
        let region = catalog.get("us-west-1").unwrap();
        let marker = layout_marker(region, &state_with(&["us-west-1"], None), &config);

        assert!(marker.highlighted);
        assert_eq!(marker.connectors.len(), 2);
        assert_eq!(marker.connectors[0].from, marker.position);
        assert_eq!(marker.connectors[0].to, marker.az_towers[0]);
        assert_eq!(marker.connectors[1].from, marker.az_towers[0]);
        assert_eq!(marker.connectors[1].to, marker.az_towers[1]);
    }

    #[test]
    fn selection_is_reported_per_marker() {
        let catalog = catalog();
        let markers = layout_markers(
            &catalog,
            &state_with(&[], Some("eu-west-1")),
            &SceneConfig::default(),
        );
        let selected: Vec<_> = markers.iter().filter(|m| m.selected).map(|m| m.code.as_str()).collect();
        assert_eq!(selected, vec!["eu-west-1"]);
    }
}
