use crate::dockable::{DockableWindow, Registry};
use crate::event::{EventBus, Message, Subscription};
use crate::layout::DockingLayout;
use crate::view::ViewId;

use data::{DockPosition, DockingConfig, GeometryStore, Region, State};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Where a dockable currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockableState {
    NotCreated,
    Docked(Region),
    Floating,
    Hidden,
}

/// Window-system events for floating windows, keyed by dockable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloatingEvent {
    CloseRequested(String),
    Moved { name: String, x: i32, y: i32 },
    Resized { name: String, width: i32, height: i32 },
    Focused(String),
}

/// Operations every docking engine supports. This is the whole surface the
/// rest of the editor uses to manipulate dockable windows.
pub trait DockableWindowManager {
    fn provider(&self) -> &str;

    /// Shows and focuses `name`, creating its surface first if needed.
    /// Unknown names are logged and ignored.
    fn show_dockable_window(&mut self, name: &str);

    /// Hides `name`. Saved geometry is kept.
    fn hide_dockable_window(&mut self, name: &str);

    fn toggle_dockable_window(&mut self, name: &str) {
        if self.is_dockable_window_visible(name) {
            self.hide_dockable_window(name);
        } else {
            self.show_dockable_window(name);
        }
    }

    fn is_dockable_window_visible(&self, name: &str) -> bool;

    fn is_dockable_window_docked(&self, name: &str) -> bool;

    /// `None` for names that are not registered.
    fn dockable_state(&self, name: &str) -> Option<DockableState>;

    fn get_dockable(&self, name: &str) -> Option<&dyn DockableWindow>;

    fn dock_position(&self, name: &str) -> Option<DockPosition>;

    /// Moves `name` to `position`; a visible dockable is shown again there.
    fn set_dock_position(&mut self, name: &str, position: DockPosition);

    fn get_docking_layout(&self) -> Box<dyn DockingLayout>;

    /// Replaces the whole arrangement.
    ///
    /// # Panics
    ///
    /// If `layout` was produced by a different provider.
    fn set_docking_layout(&mut self, layout: Box<dyn DockingLayout>);

    fn handle_window_event(&mut self, event: FloatingEvent);

    /// Collapses the docked region that holds focus. Does nothing when focus
    /// is in a floating window or nowhere.
    fn close_current_area(&mut self);

    /// Disposes every floating window and stops listening for messages.
    fn close(&mut self);

    fn handle_message(&mut self, message: &Message);

    /// Messages published since the last call, oldest first.
    fn pending_messages(&mut self) -> Vec<Message>;

    fn process_events(&mut self) {
        for message in self.pending_messages() {
            self.handle_message(&message);
        }
    }

    /// Copies positions, region state and floating geometry into `state`.
    fn save_settings(&self, state: &mut State);
}

/// What a provider needs to build a manager for one view.
pub struct ManagerContext {
    pub registry: Rc<Registry>,
    pub config: DockingConfig,
    pub geometry: Rc<RefCell<GeometryStore>>,
    pub dock_positions: FxHashMap<String, DockPosition>,
    pub regions: enum_map::EnumMap<Region, data::RegionState>,
}

impl ManagerContext {
    pub fn new(registry: Rc<Registry>) -> Self {
        Self {
            registry,
            config: DockingConfig::default(),
            geometry: Rc::default(),
            dock_positions: FxHashMap::default(),
            regions: enum_map::EnumMap::default(),
        }
    }

    /// Context seeded from persisted settings. The geometry store is shared
    /// with whoever holds `geometry`.
    pub fn from_state(
        registry: Rc<Registry>,
        state: &State,
        geometry: Rc<RefCell<GeometryStore>>,
    ) -> Self {
        Self {
            registry,
            config: state.docking.clone(),
            geometry,
            dock_positions: state.dock_positions.clone(),
            regions: state.regions.clone(),
        }
    }
}

/// State shared by every concrete manager: name resolution, labels,
/// configuration, geometry and the message subscription.
pub struct DockableWindowManagerBase {
    view: ViewId,
    registry: Rc<Registry>,
    config: DockingConfig,
    geometry: Rc<RefCell<GeometryStore>>,
    subscription: Option<Subscription>,
}

impl DockableWindowManagerBase {
    pub fn new(
        view: ViewId,
        registry: Rc<Registry>,
        config: DockingConfig,
        geometry: Rc<RefCell<GeometryStore>>,
        bus: &EventBus,
    ) -> Self {
        Self {
            view,
            registry,
            config,
            geometry,
            subscription: Some(bus.subscribe()),
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether `name` is registered; logs when it is not.
    pub fn resolve(&self, name: &str) -> bool {
        let known = self.registry.contains(name);
        if !known {
            log::warn!("View {}: no dockable named {name}", self.view);
        }
        known
    }

    pub fn label(&self, name: &str) -> String {
        self.registry.label(name)
    }

    pub fn create_surface(
        &self,
        name: &str,
        position: DockPosition,
    ) -> Option<Box<dyn DockableWindow>> {
        self.registry.create(name, position)
    }

    pub fn config(&self) -> &DockingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DockingConfig) {
        self.config = config;
    }

    pub fn geometry(&self) -> &Rc<RefCell<GeometryStore>> {
        &self.geometry
    }

    pub fn pending_messages(&mut self) -> Vec<Message> {
        self.subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default()
    }

    pub fn unsubscribe(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("View {}: docking manager unsubscribed", self.view);
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dockable::testing::probe_factory;

    use std::cell::Cell;

    fn base(bus: &EventBus) -> DockableWindowManagerBase {
        let mut registry = Registry::new();
        registry
            .register("console", DockPosition::Bottom, probe_factory(Rc::new(Cell::new(0))))
            .unwrap();
        registry.set_property("dockable.console.label", "Console");

        DockableWindowManagerBase::new(
            ViewId(1),
            Rc::new(registry),
            DockingConfig::default(),
            Rc::default(),
            bus,
        )
    }

    #[test]
    fn resolves_registered_names_only() {
        let bus = EventBus::new();
        let base = base(&bus);

        assert!(base.resolve("console"));
        assert!(!base.resolve("missing"));
        assert_eq!(base.label("console"), "Console");
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let mut base = base(&bus);

        bus.publish(Message::PropertiesChanged);
        assert_eq!(base.pending_messages(), vec![Message::PropertiesChanged]);

        base.unsubscribe();
        assert!(!base.is_subscribed());
        assert_eq!(bus.subscriber_count(), 0);

        bus.publish(Message::PropertiesChanged);
        assert!(base.pending_messages().is_empty());
    }
}
