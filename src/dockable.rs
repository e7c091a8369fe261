use crate::Error;

use data::DockPosition;
use rustc_hash::FxHashMap;

/// A tool panel that can be docked into a view or float in its own window.
pub trait DockableWindow {
    fn name(&self) -> &str;

    /// Natural size of the surface, used when a floating window has no
    /// saved geometry.
    fn preferred_size(&self) -> (i32, i32) {
        (300, 200)
    }

    fn focus(&mut self) {}

    /// Called after global properties changed, e.g. a new theme.
    fn properties_changed(&mut self) {}
}

/// Creates the surface of a dockable on demand.
pub type Factory = Box<dyn Fn(&str, DockPosition) -> Box<dyn DockableWindow>>;

struct Registration {
    default_position: DockPosition,
    factory: Factory,
}

/// Every dockable an editor knows about, with the labels used for titles.
#[derive(Default)]
pub struct Registry {
    entries: FxHashMap<String, Registration>,
    order: Vec<String>,
    labels: FxHashMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        default_position: DockPosition,
        factory: F,
    ) -> Result<(), Error>
    where
        F: Fn(&str, DockPosition) -> Box<dyn DockableWindow> + 'static,
    {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::DuplicateDockable(name));
        }

        log::debug!("Registered dockable {name} ({default_position})");

        self.entries.insert(
            name.clone(),
            Registration {
                default_position,
                factory: Box::new(factory),
            },
        );
        self.order.push(name);
        Ok(())
    }

    /// Sets a localized property, e.g. `dockable.console.label`.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(key.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn default_position(&self, name: &str) -> Option<DockPosition> {
        self.entries.get(name).map(|entry| entry.default_position)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn create(&self, name: &str, position: DockPosition) -> Option<Box<dyn DockableWindow>> {
        self.entries.get(name).map(|entry| {
            log::debug!("Creating surface for {name}");
            (entry.factory)(name, position)
        })
    }

    /// Title for a dockable, from `dockable.<name>.label`, or the name itself.
    pub fn label(&self, name: &str) -> String {
        self.labels
            .get(&format!("dockable.{name}.label"))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    /// Surface that tracks how many instances are alive.
    pub struct Probe {
        name: String,
        live: Rc<Cell<usize>>,
        pub focused: usize,
        pub refreshed: usize,
    }

    impl DockableWindow for Probe {
        fn name(&self) -> &str {
            &self.name
        }

        fn preferred_size(&self) -> (i32, i32) {
            (240, 160)
        }

        fn focus(&mut self) {
            self.focused += 1;
        }

        fn properties_changed(&mut self) {
            self.refreshed += 1;
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    pub fn probe_factory(live: Rc<Cell<usize>>) -> impl Fn(&str, DockPosition) -> Box<dyn DockableWindow> {
        move |name, _| {
            live.set(live.get() + 1);
            Box::new(Probe {
                name: name.to_string(),
                live: Rc::clone(&live),
                focused: 0,
                refreshed: 0,
            })
        }
    }

    pub fn probe(name: &str) -> Box<dyn DockableWindow> {
        probe_factory(Rc::new(Cell::new(0)))(name, DockPosition::Floating)
    }
}
