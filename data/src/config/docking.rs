use serde::{Deserialize, Serialize};

pub const DEFAULT_PROVIDER: &str = "panel";

/// Settings that change how a view docks its windows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DockingConfig {
    /// Name of the active docking framework provider.
    pub provider: String,
    /// Left and right regions span the full height instead of top and bottom
    /// spanning the full width.
    pub alternate_layout: bool,
    /// Pad the last toolbar of the bottom group. `None` follows the platform.
    pub toolbar_trailing_space: Option<bool>,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            alternate_layout: false,
            toolbar_trailing_space: None,
        }
    }
}

impl DockingConfig {
    pub fn trailing_space(&self) -> bool {
        self.toolbar_trailing_space
            .unwrap_or(cfg!(target_os = "macos"))
    }
}
