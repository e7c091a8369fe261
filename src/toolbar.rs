/// Toolbar groups above and below the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Top,
    Bottom,
}

pub const TOP_LAYER: i32 = i32::MAX;
pub const ABOVE_SYSTEM_BAR_LAYER: i32 = 150;
pub const SYSTEM_BAR_LAYER: i32 = 100;
pub const BELOW_SYSTEM_BAR_LAYER: i32 = 90;
pub const SEARCH_BAR_LAYER: i32 = 75;
pub const DEFAULT_LAYER: i32 = 0;
pub const ACTION_BAR_LAYER: i32 = -75;
pub const STATUS_BAR_LAYER: i32 = -100;
pub const BOTTOM_LAYER: i32 = i32::MIN;

/// A toolbar as placed in its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub name: String,
    pub layer: i32,
    /// Extra padding after the toolbar.
    pub trailing_space: bool,
}

/// Orders toolbars by layer within the top and bottom groups.
#[derive(Debug, Default)]
pub struct ToolBarManager {
    top: Vec<Placed>,
    bottom: Vec<Placed>,
    trailing_space: bool,
}

impl ToolBarManager {
    /// `trailing_space` pads the last toolbar of the bottom group, which some
    /// platforms need to keep it clear of the window's resize grip.
    pub fn new(trailing_space: bool) -> Self {
        Self {
            trailing_space,
            ..Self::default()
        }
    }

    /// Turns trailing space on or off, re-padding the last bottom toolbar.
    pub fn set_trailing_space(&mut self, trailing_space: bool) {
        if self.trailing_space != trailing_space {
            log::debug!("Toolbar trailing space is now {trailing_space}");
            self.trailing_space = trailing_space;
            self.unwrap_last();
            self.wrap_last();
        }
    }

    /// Places `name` before the first toolbar with a strictly lower layer,
    /// or at the end of the group.
    pub fn add_toolbar(&mut self, group: Group, layer: i32, name: impl Into<String>) {
        let name = name.into();
        log::debug!("Adding toolbar {name} to {group:?} at layer {layer}");

        if group == Group::Bottom {
            self.unwrap_last();
        }

        let toolbars = self.group_mut(group);
        let index = toolbars
            .iter()
            .position(|placed| layer > placed.layer)
            .unwrap_or(toolbars.len());
        toolbars.insert(
            index,
            Placed {
                name,
                layer,
                trailing_space: false,
            },
        );

        if group == Group::Bottom {
            self.wrap_last();
        }
    }

    /// Removes `name` from whichever group holds it.
    pub fn remove_toolbar(&mut self, name: &str) -> bool {
        if let Some(index) = self.top.iter().position(|placed| placed.name == name) {
            self.top.remove(index);
            return true;
        }

        match self.bottom.iter().position(|placed| placed.name == name) {
            Some(index) => {
                self.bottom.remove(index);
                self.unwrap_last();
                self.wrap_last();
                true
            }
            None => false,
        }
    }

    pub fn toolbars(&self, group: Group) -> &[Placed] {
        match group {
            Group::Top => &self.top,
            Group::Bottom => &self.bottom,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.top
            .iter()
            .chain(&self.bottom)
            .any(|placed| placed.name == name)
    }

    fn group_mut(&mut self, group: Group) -> &mut Vec<Placed> {
        match group {
            Group::Top => &mut self.top,
            Group::Bottom => &mut self.bottom,
        }
    }

    fn unwrap_last(&mut self) {
        for placed in &mut self.bottom {
            placed.trailing_space = false;
        }
    }

    fn wrap_last(&mut self) {
        if self.trailing_space {
            if let Some(last) = self.bottom.last_mut() {
                last.trailing_space = true;
            }
        }
    }
}
