use crate::dockable::DockableWindow;

use data::{GeometryStore, WindowSpec};

/// Receives the surface back when a floating window goes away.
pub trait FloatingOwner {
    /// Marks `name` hidden and takes ownership of its surface again.
    fn remove_dockable_window(&mut self, name: &str, surface: Box<dyn DockableWindow>);
}

/// The dockable a floating window is created for.
pub struct FloatingEntry {
    pub name: String,
    pub title: String,
    pub surface: Box<dyn DockableWindow>,
}

struct Hosted {
    name: String,
    surface: Box<dyn DockableWindow>,
}

/// Independent top-level window hosting exactly one dockable.
#[derive(Default)]
pub struct FloatingWindowContainer {
    hosted: Option<Hosted>,
    title: String,
    spec: WindowSpec,
    focused: bool,
}

impl FloatingWindowContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the container to `entry` and makes it visible.
    ///
    /// Geometry comes from `store` when the dockable floated before, else
    /// from the surface's preferred size.
    ///
    /// # Panics
    ///
    /// If the container already hosts a dockable.
    pub fn register(&mut self, entry: FloatingEntry, store: &GeometryStore) {
        if let Some(hosted) = &self.hosted {
            panic!(
                "floating container for `{}` cannot also host `{}`",
                hosted.name, entry.name
            );
        }

        self.spec = store.get(&entry.name).unwrap_or_else(|| {
            let (width, height) = entry.surface.preferred_size();
            WindowSpec {
                width,
                height,
                ..WindowSpec::default()
            }
        });
        self.title = entry.title;

        log::debug!(
            "Floating {} at {:?} {:?}",
            entry.name,
            self.spec.position(),
            self.spec.size()
        );

        self.hosted = Some(Hosted {
            name: entry.name,
            surface: entry.surface,
        });
        self.show();
    }

    /// Raises and focuses the window.
    pub fn show(&mut self) {
        if let Some(hosted) = &mut self.hosted {
            self.focused = true;
            hosted.surface.focus();
        }
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Writes the current geometry under the dockable's name.
    pub fn save(&self, store: &mut GeometryStore) {
        if let Some(hosted) = &self.hosted {
            store.insert(hosted.name.clone(), self.spec);
        }
    }

    /// Tears the window down. The owner gets the surface back first, so it
    /// never refers to a disposed window.
    pub fn dispose(mut self, owner: &mut dyn FloatingOwner) {
        if let Some(Hosted { name, surface }) = self.hosted.take() {
            owner.remove_dockable_window(&name, surface);
            log::debug!("Disposed floating window {name}");
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.hosted.as_ref().map(|hosted| hosted.name.as_str())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> WindowSpec {
        self.spec
    }

    pub fn is_visible(&self) -> bool {
        self.hosted.is_some()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn surface(&self) -> Option<&dyn DockableWindow> {
        self.hosted.as_ref().map(|hosted| hosted.surface.as_ref())
    }

    pub fn surface_mut(&mut self) -> Option<&mut Box<dyn DockableWindow>> {
        self.hosted.as_mut().map(|hosted| &mut hosted.surface)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.spec.pos_x = x;
        self.spec.pos_y = y;
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.spec.width = width;
        self.spec.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dockable::testing::probe;

    #[derive(Default)]
    struct Owner {
        returned: Vec<String>,
    }

    impl FloatingOwner for Owner {
        fn remove_dockable_window(&mut self, name: &str, surface: Box<dyn DockableWindow>) {
            assert_eq!(surface.name(), name);
            self.returned.push(name.to_string());
        }
    }

    fn entry(name: &str) -> FloatingEntry {
        FloatingEntry {
            name: name.to_string(),
            title: format!("{name} title"),
            surface: probe(name),
        }
    }

    #[test]
    fn register_restores_saved_geometry() {
        let mut store = GeometryStore::default();
        let saved = WindowSpec {
            width: 300,
            height: 200,
            pos_x: 100,
            pos_y: 100,
        };
        store.insert("errorlist", saved);

        let mut container = FloatingWindowContainer::new();
        container.register(entry("errorlist"), &store);

        assert_eq!(container.geometry(), saved);
        assert_eq!(container.title(), "errorlist title");
        assert!(container.is_visible());
        assert!(container.is_focused());
    }

    #[test]
    fn register_without_history_uses_preferred_size() {
        let mut container = FloatingWindowContainer::new();
        container.register(entry("console"), &GeometryStore::default());

        assert_eq!(container.geometry().size(), (240, 160));
    }

    #[test]
    fn save_then_dispose_hands_surface_back() {
        let mut store = GeometryStore::default();
        let mut container = FloatingWindowContainer::new();
        container.register(entry("console"), &store);
        container.set_position(5, 6);
        container.set_size(400, 300);

        container.save(&mut store);
        let mut owner = Owner::default();
        container.dispose(&mut owner);

        assert_eq!(owner.returned, ["console"]);
        assert_eq!(
            store.get("console"),
            Some(WindowSpec {
                width: 400,
                height: 300,
                pos_x: 5,
                pos_y: 6
            })
        );
    }

    #[test]
    #[should_panic(expected = "cannot also host")]
    fn second_registration_panics() {
        let store = GeometryStore::default();
        let mut container = FloatingWindowContainer::new();
        container.register(entry("console"), &store);
        container.register(entry("errorlist"), &store);
    }
}
