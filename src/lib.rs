//! Custom right-click context menus for ratatui applications.
//!
//! A [`MenuRegistry`] binds menus to rectangular target regions of the host
//! UI. Feeding crossterm events through [`MenuRegistry::dispatch`] drives
//! the full lifecycle: a right press inside a target opens the menu at the
//! click point (flipping or clamping against the viewport as configured),
//! presses outside it close it, releases over an armed item run its action,
//! and Esc cancels. While a menu is open it owns the input stream, so the
//! host and any ancestor targets see nothing until it closes.
//!
//! ```no_run
//! use std::time::Instant;
//! use ratatui::layout::Rect;
//! use tui_ctxmenu::{ItemSpec, MenuOptions, MenuRegistry, Size, Target, TargetId};
//!
//! let mut registry = MenuRegistry::new();
//! registry.create(
//!     Target::new(TargetId(1), Rect::new(0, 0, 40, 20)),
//!     vec![
//!         ItemSpec::action("Copy", |_| Ok(())),
//!         ItemSpec::separator(),
//!         ItemSpec::action("Paste", |_| Ok(())),
//!     ],
//!     MenuOptions::new().name("files"),
//! );
//!
//! # let event = crossterm::event::Event::FocusGained;
//! let viewport = Size { w: 80, h: 24 };
//! registry.dispatch(&event, viewport, Instant::now())?;
//! # Ok::<(), tui_ctxmenu::MenuError>(())
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod item;
pub mod node;
pub mod options;
pub mod position;
pub mod registry;
pub mod render;

pub use controller::{ContextMenu, MenuState, OpenSession, Target, TargetId};
pub use error::MenuError;
pub use events::{Button, InputEvent, Outcome, decode};
pub use item::{ARM_DELAY, ActionFn, ItemSpec, SEPARATOR};
pub use node::{Marker, Node};
pub use options::{MenuCallback, MenuOptions};
pub use position::{Placement, Point, Size, Transfer, solve};
pub use registry::{MenuHandle, MenuRegistry, ScrollLock};
pub use render::render;
