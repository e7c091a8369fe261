use super::PROVIDER_NAME;
use super::layout::{PanelLayout, RegionLayout};
use crate::dockable::DockableWindow;
use crate::event::{EventBus, Message};
use crate::floating::{FloatingEntry, FloatingOwner, FloatingWindowContainer};
use crate::layout::DockingLayout;
use crate::manager::{
    DockableState, DockableWindowManager, DockableWindowManagerBase, FloatingEvent,
    ManagerContext,
};
use crate::view::ViewId;

use data::config::Dimension;
use data::{DockPosition, Region, RegionState, State};
use enum_map::EnumMap;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct Panel {
    current: Option<String>,
    dimension: Dimension,
}

/// Four panels around the text area, one dockable showing per panel, plus
/// any number of floating windows.
pub struct PanelWindowManager {
    base: DockableWindowManagerBase,
    positions: FxHashMap<String, DockPosition>,
    /// Created surfaces that are not inside a floating window.
    surfaces: FxHashMap<String, Box<dyn DockableWindow>>,
    panels: EnumMap<Region, Panel>,
    floating: FxHashMap<String, FloatingWindowContainer>,
    focused: Option<String>,
}

impl PanelWindowManager {
    pub fn new(view: ViewId, context: ManagerContext, bus: &EventBus) -> Self {
        let ManagerContext {
            registry,
            config,
            geometry,
            dock_positions,
            regions,
        } = context;

        let positions = dock_positions
            .into_iter()
            .filter(|(name, _)| registry.contains(name))
            .collect();
        let panels = EnumMap::from_fn(|region: Region| Panel {
            current: None,
            dimension: regions[region].dimension,
        });

        let mut manager = Self {
            base: DockableWindowManagerBase::new(view, registry, config, geometry, bus),
            positions,
            surfaces: FxHashMap::default(),
            panels,
            floating: FxHashMap::default(),
            focused: None,
        };

        for (region, state) in &regions {
            if let Some(last) = &state.last {
                if manager.position(last) == Some(DockPosition::from(region)) {
                    manager.show_dockable_window(last);
                }
            }
        }

        manager
    }

    pub fn region_dimension(&self, region: Region) -> u32 {
        self.panels[region].dimension.into()
    }

    pub fn set_region_dimension(&mut self, region: Region, dimension: u32) {
        self.panels[region].dimension = dimension.into();
    }

    /// Dockable showing in `region`.
    pub fn current(&self, region: Region) -> Option<&str> {
        self.panels[region].current.as_deref()
    }

    pub fn floating_window(&self, name: &str) -> Option<&FloatingWindowContainer> {
        self.floating.get(name)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Number of live surfaces for `name`, wherever they are.
    pub fn surface_count(&self, name: &str) -> usize {
        usize::from(self.surfaces.contains_key(name))
            + self
                .floating
                .get(name)
                .map_or(0, |container| usize::from(container.surface().is_some()))
    }

    fn position(&self, name: &str) -> Option<DockPosition> {
        self.positions
            .get(name)
            .copied()
            .or_else(|| self.base.registry().default_position(name))
    }

    fn region_of_current(&self, name: &str) -> Option<Region> {
        self.panels
            .iter()
            .find(|(_, panel)| panel.current.as_deref() == Some(name))
            .map(|(region, _)| region)
    }

    fn take_or_create_surface(
        &mut self,
        name: &str,
        position: DockPosition,
    ) -> Option<Box<dyn DockableWindow>> {
        self.surfaces
            .remove(name)
            .or_else(|| self.base.create_surface(name, position))
    }

    fn dock(&mut self, name: &str, region: Region) {
        if !self.surfaces.contains_key(name) {
            match self.base.create_surface(name, region.into()) {
                Some(surface) => {
                    self.surfaces.insert(name.to_string(), surface);
                }
                None => return,
            }
        }

        if let Some(previous) = self.panels[region].current.replace(name.to_string()) {
            log::debug!("View {}: {name} replaces {previous} in {region}", self.base.view());
            if self.focused.as_deref() == Some(previous.as_str()) {
                self.focused = None;
            }
        }
        self.focus(name);
    }

    fn float(&mut self, name: &str) {
        let Some(surface) = self.take_or_create_surface(name, DockPosition::Floating) else {
            return;
        };

        let mut container = FloatingWindowContainer::new();
        container.register(
            FloatingEntry {
                name: name.to_string(),
                title: self.base.label(name),
                surface,
            },
            &self.base.geometry().borrow(),
        );
        self.floating.insert(name.to_string(), container);
        self.focus(name);
    }

    fn focus(&mut self, name: &str) {
        for (floating_name, container) in &mut self.floating {
            if floating_name == name {
                container.show();
            } else {
                container.blur();
            }
        }
        if let Some(surface) = self.surfaces.get_mut(name) {
            surface.focus();
        }
        self.focused = Some(name.to_string());
    }

    fn close_floating(&mut self, name: &str) {
        if let Some(container) = self.floating.remove(name) {
            container.save(&mut self.base.geometry().borrow_mut());
            container.dispose(self);
        }
    }

    fn collapse(&mut self, region: Region) {
        if let Some(current) = self.panels[region].current.take() {
            log::debug!("View {}: collapsed {region} ({current})", self.base.view());
            if self.focused.as_deref() == Some(current.as_str()) {
                self.focused = None;
            }
        }
    }

    fn close_all_floating(&mut self) {
        let names: Vec<String> = self.floating.keys().cloned().collect();
        for name in names {
            self.close_floating(&name);
        }
    }
}

impl Drop for PanelWindowManager {
    fn drop(&mut self) {
        self.close_all_floating();
    }
}

impl FloatingOwner for PanelWindowManager {
    fn remove_dockable_window(&mut self, name: &str, surface: Box<dyn DockableWindow>) {
        self.floating.remove(name);
        self.surfaces.insert(name.to_string(), surface);
        if self.focused.as_deref() == Some(name) {
            self.focused = None;
        }
    }
}

impl DockableWindowManager for PanelWindowManager {
    fn provider(&self) -> &str {
        PROVIDER_NAME
    }

    fn show_dockable_window(&mut self, name: &str) {
        if !self.base.resolve(name) {
            return;
        }
        if self.is_dockable_window_visible(name) {
            self.focus(name);
            return;
        }

        match self.position(name).and_then(|position| position.region()) {
            Some(region) => self.dock(name, region),
            None => self.float(name),
        }
    }

    fn hide_dockable_window(&mut self, name: &str) {
        if !self.base.resolve(name) {
            return;
        }

        if self.floating.contains_key(name) {
            self.close_floating(name);
        } else if let Some(region) = self.region_of_current(name) {
            self.collapse(region);
        }
    }

    fn is_dockable_window_visible(&self, name: &str) -> bool {
        self.floating.contains_key(name) || self.region_of_current(name).is_some()
    }

    fn is_dockable_window_docked(&self, name: &str) -> bool {
        self.position(name)
            .is_some_and(|position| !position.is_floating())
    }

    fn dockable_state(&self, name: &str) -> Option<DockableState> {
        self.position(name)?;

        Some(if self.floating.contains_key(name) {
            DockableState::Floating
        } else if let Some(region) = self.region_of_current(name) {
            DockableState::Docked(region)
        } else if self.surfaces.contains_key(name) {
            DockableState::Hidden
        } else {
            DockableState::NotCreated
        })
    }

    fn get_dockable(&self, name: &str) -> Option<&dyn DockableWindow> {
        self.surfaces
            .get(name)
            .map(|surface| surface.as_ref())
            .or_else(|| self.floating.get(name).and_then(|c| c.surface()))
    }

    fn dock_position(&self, name: &str) -> Option<DockPosition> {
        self.position(name)
    }

    fn set_dock_position(&mut self, name: &str, position: DockPosition) {
        if !self.base.resolve(name) || self.position(name) == Some(position) {
            return;
        }

        let was_visible = self.is_dockable_window_visible(name);
        if was_visible {
            self.hide_dockable_window(name);
        }

        log::info!("View {}: {name} moves to {position}", self.base.view());
        self.positions.insert(name.to_string(), position);

        if was_visible {
            self.show_dockable_window(name);
        }
    }

    fn get_docking_layout(&self) -> Box<dyn DockingLayout> {
        let positions = self
            .base
            .registry()
            .names()
            .filter_map(|name| Some((name.to_string(), self.position(name)?)))
            .collect();

        let floating = self
            .floating
            .iter()
            .map(|(name, container)| (name.clone(), container.geometry()))
            .collect();

        Box::new(PanelLayout {
            alternate_layout: self.base.config().alternate_layout,
            regions: EnumMap::from_fn(|region| RegionLayout {
                dimension: self.panels[region].dimension,
                current: self.panels[region].current.clone(),
            }),
            positions,
            floating,
        })
    }

    fn set_docking_layout(&mut self, layout: Box<dyn DockingLayout>) {
        let provider = layout.provider().to_string();
        let Ok(layout) = layout.into_any().downcast::<PanelLayout>() else {
            panic!("{PROVIDER_NAME} manager cannot apply a layout from `{provider}`");
        };
        let PanelLayout {
            alternate_layout,
            regions,
            positions,
            floating,
        } = *layout;

        log::info!("View {}: applying docking layout", self.base.view());

        self.close_all_floating();
        for region in Region::ALL {
            self.collapse(region);
        }

        let mut config = self.base.config().clone();
        config.alternate_layout = alternate_layout;
        self.base.set_config(config);

        self.positions.clear();
        for (name, position) in positions {
            if self.base.registry().contains(&name) {
                self.positions.insert(name, position);
            } else {
                log::warn!("Perspective mentions unknown dockable {name}; skipped");
            }
        }

        for (region, state) in regions {
            self.panels[region].dimension = state.dimension;
            if let Some(current) = state.current {
                if self.position(&current) == Some(DockPosition::from(region)) {
                    self.show_dockable_window(&current);
                } else {
                    log::warn!("Perspective shows {current} in {region}, but it is not docked there");
                }
            }
        }

        for (name, spec) in floating {
            if !self.base.registry().contains(&name) {
                log::warn!("Perspective floats unknown dockable {name}; skipped");
                continue;
            }
            if let Some(region) = self.region_of_current(&name) {
                log::warn!("Perspective floats {name}, which is already shown in {region}; skipped");
                continue;
            }
            self.base.geometry().borrow_mut().insert(name.clone(), spec);
            self.positions.insert(name.clone(), DockPosition::Floating);
            self.show_dockable_window(&name);
        }
    }

    fn handle_window_event(&mut self, event: FloatingEvent) {
        match event {
            FloatingEvent::CloseRequested(name) => self.close_floating(&name),
            FloatingEvent::Moved { name, x, y } => {
                if let Some(container) = self.floating.get_mut(&name) {
                    container.set_position(x, y);
                }
            }
            FloatingEvent::Resized {
                name,
                width,
                height,
            } => {
                if let Some(container) = self.floating.get_mut(&name) {
                    container.set_size(width, height);
                }
            }
            FloatingEvent::Focused(name) => {
                if self.is_dockable_window_visible(&name) {
                    self.focus(&name);
                }
            }
        }
    }

    fn close_current_area(&mut self) {
        match self
            .focused
            .clone()
            .and_then(|name| self.region_of_current(&name))
        {
            Some(region) => self.collapse(region),
            None => log::debug!(
                "View {}: no docked area has focus, nothing to close",
                self.base.view()
            ),
        }
    }

    fn close(&mut self) {
        self.close_all_floating();
        for region in Region::ALL {
            self.collapse(region);
        }
        self.surfaces.clear();
        self.base.unsubscribe();
        log::debug!("View {}: docking manager closed", self.base.view());
    }

    fn handle_message(&mut self, message: &Message) {
        match message {
            Message::DockingConfigChanged(config) => {
                log::debug!("View {}: docking config changed", self.base.view());
                self.base.set_config(config.clone());
            }
            Message::PropertiesChanged => {
                for surface in self.surfaces.values_mut() {
                    surface.properties_changed();
                }
                for container in self.floating.values_mut() {
                    if let Some(surface) = container.surface_mut() {
                        surface.properties_changed();
                    }
                }
            }
        }
    }

    fn pending_messages(&mut self) -> Vec<Message> {
        self.base.pending_messages()
    }

    fn save_settings(&self, state: &mut State) {
        {
            let mut geometry = self.base.geometry().borrow_mut();
            for container in self.floating.values() {
                container.save(&mut geometry);
            }
            state.geometry = geometry.clone();
        }

        state.dock_positions = self
            .positions
            .iter()
            .map(|(name, position)| (name.clone(), *position))
            .collect();
        state.regions = EnumMap::from_fn(|region| RegionState {
            dimension: self.panels[region].dimension,
            last: self.panels[region].current.clone(),
        });
        state.docking = self.base.config().clone();
    }
}
