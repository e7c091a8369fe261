use crate::Error;
use crate::event::EventBus;
use crate::layout::DockingLayout;
use crate::manager::{DockableWindowManager, ManagerContext};
use crate::panel::PanelProvider;
use crate::view::ViewId;

use std::rc::Rc;

/// A docking engine the editor can switch to.
pub trait DockingFrameworkProvider {
    fn name(&self) -> &str;

    /// Builds a manager bound to `view`.
    fn create_manager(
        &self,
        view: ViewId,
        context: ManagerContext,
        bus: &EventBus,
    ) -> Box<dyn DockableWindowManager>;

    /// Empty layout that a perspective document can be parsed into.
    fn create_docking_layout(&self) -> Box<dyn DockingLayout>;
}

/// Known providers; exactly one of them is active.
pub struct Providers {
    providers: Vec<Rc<dyn DockingFrameworkProvider>>,
    active: usize,
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            providers: vec![Rc::new(PanelProvider)],
            active: 0,
        }
    }
}

impl Providers {
    /// Adds `provider`, replacing one with the same name.
    pub fn register(&mut self, provider: Rc<dyn DockingFrameworkProvider>) {
        match self.index_of(provider.name()) {
            Some(index) => self.providers[index] = provider,
            None => self.providers.push(provider),
        }
    }

    pub fn activate(&mut self, name: &str) -> Result<(), Error> {
        let index = self
            .index_of(name)
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))?;

        if index != self.active {
            log::info!("Docking provider is now {name}");
            self.active = index;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Rc<dyn DockingFrameworkProvider>, Error> {
        self.index_of(name)
            .map(|index| Rc::clone(&self.providers[index]))
            .ok_or_else(|| Error::UnknownProvider(name.to_string()))
    }

    pub fn active(&self) -> Rc<dyn DockingFrameworkProvider> {
        Rc::clone(&self.providers[self.active])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|provider| provider.name())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.providers
            .iter()
            .position(|provider| provider.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{PROVIDER_NAME, PanelLayout};

    struct Named(&'static str);

    impl DockingFrameworkProvider for Named {
        fn name(&self) -> &str {
            self.0
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
            Box::new(PanelLayout::default())
        }
    }

    #[test]
    fn panel_is_active_by_default() {
        let providers = Providers::default();
        assert_eq!(providers.active().name(), PROVIDER_NAME);
        assert_eq!(providers.names().collect::<Vec<_>>(), [PROVIDER_NAME]);
    }

    #[test]
    fn activate_switches_between_registered_providers() {
        let mut providers = Providers::default();
        providers.register(Rc::new(Named("tabs")));

        providers.activate("tabs").unwrap();
        assert_eq!(providers.active().name(), "tabs");

        let err = providers.activate("missing");
        assert!(matches!(err, Err(Error::UnknownProvider(name)) if name == "missing"));
        assert_eq!(providers.active().name(), "tabs");
    }

    #[test]
    fn get_looks_up_by_name() {
        let mut providers = Providers::default();
        providers.register(Rc::new(Named("tabs")));

        assert_eq!(providers.get("tabs").unwrap().name(), "tabs");
        assert!(matches!(providers.get("missing"), Err(Error::UnknownProvider(_))));
        assert_eq!(providers.active().name(), PROVIDER_NAME);
    }

    #[test]
    fn register_replaces_same_name() {
        let mut providers = Providers::default();
        providers.register(Rc::new(Named("tabs")));
        providers.register(Rc::new(Named("tabs")));
        assert_eq!(providers.names().count(), 2);
    }
}
