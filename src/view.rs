use crate::event::{EventBus, Message};
use crate::manager::{DockableWindowManager, ManagerContext};
use crate::provider::{DockingFrameworkProvider, Providers};
use crate::toolbar::ToolBarManager;

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One editor window: its dockables and its toolbars.
pub struct View {
    id: ViewId,
    provider: Rc<dyn DockingFrameworkProvider>,
    docking: Box<dyn DockableWindowManager>,
    toolbars: ToolBarManager,
}

impl View {
    /// Builds a view docked by the provider its configuration names, or by
    /// the active provider when that name is not registered.
    pub fn new(id: ViewId, providers: &Providers, context: ManagerContext, bus: &EventBus) -> Self {
        let provider = providers
            .get(&context.config.provider)
            .unwrap_or_else(|e| {
                let fallback = providers.active();
                log::warn!("View {id}: {e}, using {}", fallback.name());
                fallback
            });
        let toolbars = ToolBarManager::new(context.config.trailing_space());
        let docking = provider.create_manager(id, context, bus);

        log::info!("View {id} opened with {} docking", provider.name());

        Self {
            id,
            provider,
            docking,
            toolbars,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn provider(&self) -> &dyn DockingFrameworkProvider {
        self.provider.as_ref()
    }

    pub fn docking(&self) -> &dyn DockableWindowManager {
        self.docking.as_ref()
    }

    pub fn docking_mut(&mut self) -> &mut dyn DockableWindowManager {
        self.docking.as_mut()
    }

    pub fn toolbars(&self) -> &ToolBarManager {
        &self.toolbars
    }

    pub fn toolbars_mut(&mut self) -> &mut ToolBarManager {
        &mut self.toolbars
    }

    /// Delivers pending bus messages to the docking manager and the toolbars.
    pub fn process_events(&mut self) {
        for message in self.docking.pending_messages() {
            if let Message::DockingConfigChanged(config) = &message {
                self.toolbars.set_trailing_space(config.trailing_space());
            }
            self.docking.handle_message(&message);
        }
    }

    /// Tears down the docking manager. Dropping the view without it still
    /// saves floating geometry.
    pub fn close(&mut self) {
        log::info!("View {} closing", self.id);
        self.docking.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dockable::Registry;
    use crate::dockable::testing::probe_factory;
    use crate::layout::DockingLayout;
    use crate::panel::{PROVIDER_NAME, PanelProvider};
    use crate::toolbar::{Group, STATUS_BAR_LAYER};

    use data::{DockPosition, DockingConfig, State};
    use std::cell::{Cell, RefCell};

    struct Other;

    impl DockingFrameworkProvider for Other {
        fn name(&self) -> &str {
            "other"
        }

        fn create_manager(
            &self,
            view: ViewId,
            context: ManagerContext,
            bus: &EventBus,
        ) -> Box<dyn DockableWindowManager> {
            PanelProvider.create_manager(view, context, bus)
        }

        fn create_docking_layout(&self) -> Box<dyn DockingLayout> {
            PanelProvider.create_docking_layout()
        }
    }

    fn registry() -> Rc<Registry> {
        let mut registry = Registry::new();
        registry
            .register("console", DockPosition::Bottom, probe_factory(Rc::new(Cell::new(0))))
            .unwrap();
        Rc::new(registry)
    }

    fn context(state: &State) -> ManagerContext {
        ManagerContext::from_state(registry(), state, Rc::new(RefCell::new(state.geometry.clone())))
    }

    #[test]
    fn configured_provider_is_used() {
        let mut providers = Providers::default();
        providers.register(Rc::new(Other));
        let mut state = State::default();
        state.docking.provider = "other".to_string();

        let bus = EventBus::new();
        let view = View::new(ViewId(1), &providers, context(&state), &bus);

        assert_eq!(view.provider().name(), "other");
        assert_eq!(providers.active().name(), PROVIDER_NAME);
    }

    #[test]
    fn unknown_configured_provider_falls_back_to_active() {
        let mut state = State::default();
        state.docking.provider = "gone".to_string();

        let bus = EventBus::new();
        let view = View::new(ViewId(1), &Providers::default(), context(&state), &bus);

        assert_eq!(view.provider().name(), PROVIDER_NAME);
    }

    #[test]
    fn config_changes_reach_toolbars() {
        let mut state = State::default();
        state.docking.toolbar_trailing_space = Some(false);

        let bus = EventBus::new();
        let mut view = View::new(ViewId(1), &Providers::default(), context(&state), &bus);
        view.toolbars_mut()
            .add_toolbar(Group::Bottom, STATUS_BAR_LAYER, "status");

        bus.publish(Message::DockingConfigChanged(DockingConfig {
            toolbar_trailing_space: Some(true),
            ..DockingConfig::default()
        }));
        view.process_events();

        let padded: Vec<_> = view
            .toolbars()
            .toolbars(Group::Bottom)
            .iter()
            .map(|placed| placed.trailing_space)
            .collect();
        assert_eq!(padded, [true]);
    }
}
