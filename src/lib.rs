//! Dockable window management for the editor: placing tool windows in the
//! panels of a view or in floating windows, and saving the arrangement as
//! perspectives.

pub mod dockable;
pub mod error;
pub mod event;
pub mod floating;
pub mod layout;
pub mod logger;
pub mod manager;
pub mod panel;
pub mod perspective;
pub mod provider;
pub mod toolbar;
pub mod view;

pub use dockable::{DockableWindow, Registry};
pub use error::{Error, PerspectiveError};
pub use event::{EventBus, Message};
pub use floating::FloatingWindowContainer;
pub use layout::DockingLayout;
pub use manager::{DockableState, DockableWindowManager, FloatingEvent, ManagerContext};
pub use perspective::{PathPrompt, PerspectiveManager};
pub use provider::{DockingFrameworkProvider, Providers};
pub use toolbar::{Group, ToolBarManager};
pub use view::{View, ViewId};

pub use data;
