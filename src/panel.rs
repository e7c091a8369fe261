pub use layout::{PanelLayout, RegionLayout};
pub use manager::PanelWindowManager;

use crate::event::EventBus;
use crate::layout::DockingLayout;
use crate::manager::{DockableWindowManager, ManagerContext};
use crate::provider::DockingFrameworkProvider;
use crate::view::ViewId;

pub mod layout;
pub mod manager;

pub const PROVIDER_NAME: &str = "panel";

/// The built-in docking engine: a panel on each side of the view and
/// free-floating windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanelProvider;

impl DockingFrameworkProvider for PanelProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn create_manager(
        &self,
        view: ViewId,
        context: ManagerContext,
        bus: &EventBus,
    ) -> Box<dyn DockableWindowManager> {
        Box::new(PanelWindowManager::new(view, context, bus))
    }

    fn create_docking_layout(&self) -> Box<dyn DockingLayout> {
        Box::new(PanelLayout::default())
    }
}
