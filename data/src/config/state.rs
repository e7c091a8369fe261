use super::Dimension;
use super::docking::DockingConfig;
use crate::layout::{DockPosition, Region, WindowSpec};
use crate::util::ok_or_default;

use enum_map::EnumMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Last known geometry of every floating window, keyed by dockable name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GeometryStore(FxHashMap<String, WindowSpec>);

impl GeometryStore {
    pub fn get(&self, name: &str) -> Option<WindowSpec> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: WindowSpec) {
        self.0.insert(name.into(), spec);
    }

    pub fn remove(&mut self, name: &str) -> Option<WindowSpec> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Persisted state of one docked region.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegionState {
    pub dimension: Dimension,
    /// Dockable that was showing when the region was last saved.
    pub last: Option<String>,
}

/// Everything the docking layer writes to `saved-state.json`.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    #[serde(deserialize_with = "ok_or_default")]
    pub geometry: GeometryStore,
    #[serde(deserialize_with = "ok_or_default")]
    pub regions: EnumMap<Region, RegionState>,
    #[serde(deserialize_with = "ok_or_default")]
    pub dock_positions: FxHashMap<String, DockPosition>,
    pub docking: DockingConfig,
    /// Perspective file applied or saved most recently.
    pub last_perspective: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_fields_fall_back_to_defaults() {
        let json = r#"{
            "geometry": {"console": {"width": 1, "height": 2, "pos_x": 3, "pos_y": 4}},
            "regions": "garbage",
            "dock_positions": {"console": "sideways"},
            "last_perspective": "review"
        }"#;

        let state: State = serde_json::from_str(json).unwrap();

        assert_eq!(
            state.geometry.get("console"),
            Some(WindowSpec {
                width: 1,
                height: 2,
                pos_x: 3,
                pos_y: 4
            })
        );
        assert_eq!(state.regions[Region::Top], RegionState::default());
        assert!(state.dock_positions.is_empty());
        assert_eq!(state.docking, DockingConfig::default());
        assert_eq!(state.last_perspective.as_deref(), Some("review"));
    }
}
