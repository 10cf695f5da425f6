//! The injectable registry service: target→controller bindings, the shared
//! scroll lock, and the handled-flag dispatch path.
//!
//! The host creates one `MenuRegistry` per application context and feeds it
//! raw crossterm events; the registry decodes them and walks controllers
//! until one handles the event.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use log::debug;

use crate::controller::{ContextMenu, Target, TargetId};
use crate::error::Result;
use crate::events::{InputEvent, Outcome, decode};
use crate::item::ItemSpec;
use crate::options::MenuOptions;
use crate::position::Size;

// ── Scroll lock ─────────────────────────────────────────────────────────────

/// The shared page-scroll affordance. Taken by the session that opens,
/// restored exactly once by that session's close; single-open-session
/// dispatch guarantees no two sessions ever hold it together. Hosts consult
/// [`MenuRegistry::scroll_locked`] to suppress their own scroll handling.
#[derive(Clone)]
pub struct ScrollLock {
    locked: Rc<Cell<bool>>,
}

impl ScrollLock {
    pub(crate) fn new() -> Self {
        ScrollLock {
            locked: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    pub(crate) fn acquire(&self) {
        self.locked.set(true);
    }

    pub(crate) fn release(&self) {
        self.locked.set(false);
    }
}

// ── Registry ────────────────────────────────────────────────────────────────

pub type MenuHandle = Rc<RefCell<ContextMenu>>;

pub struct MenuRegistry {
    menus: Vec<(TargetId, MenuHandle)>,
    scroll_lock: ScrollLock,
}

impl Default for MenuRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuRegistry {
    pub fn new() -> Self {
        MenuRegistry {
            menus: Vec::new(),
            scroll_lock: ScrollLock::new(),
        }
    }

    /// Bind a menu to a target. Idempotent per target id: a second call
    /// returns the existing handle unchanged and the new items and options
    /// are discarded, so no duplicate controller can ever shadow the first.
    pub fn create(
        &mut self,
        target: Target,
        items: Vec<ItemSpec>,
        options: MenuOptions,
    ) -> MenuHandle {
        if let Some((_, existing)) = self.menus.iter().find(|(id, _)| *id == target.id) {
            debug!("menu already bound to {:?}, returning it", target.id);
            return Rc::clone(existing);
        }
        let menu = Rc::new(RefCell::new(ContextMenu::new(
            target,
            items,
            options,
            self.scroll_lock.clone(),
        )));
        self.menus.push((target.id, Rc::clone(&menu)));
        menu
    }

    pub fn get(&self, id: TargetId) -> Option<MenuHandle> {
        self.menus
            .iter()
            .find(|(tid, _)| *tid == id)
            .map(|(_, m)| Rc::clone(m))
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    /// The controller whose session is currently open, if any. At most one
    /// exists at a time: an open session consumes all input before another
    /// controller can transition.
    pub fn open_menu(&self) -> Option<MenuHandle> {
        self.menus
            .iter()
            .find(|(_, m)| m.borrow().is_open())
            .map(|(_, m)| Rc::clone(m))
    }

    /// Decode and dispatch one crossterm event. Returns the last
    /// non-ignored outcome of the decoded sequence, so the invocation phase
    /// of a right press decides over its preceding press (a pass-through
    /// invocation must not be masked by the press that closed a session).
    /// An action's error propagates to the caller here (the menu has
    /// already closed by then).
    pub fn dispatch(
        &mut self,
        event: &crossterm::event::Event,
        viewport: Size,
        now: Instant,
    ) -> Result<Outcome> {
        let mut outcome = Outcome::Ignored;
        for ev in decode(event) {
            let one = self.dispatch_input(&ev, viewport, now)?;
            if one != Outcome::Ignored {
                outcome = one;
            }
        }
        Ok(outcome)
    }

    /// Dispatch one semantic event. An open session owns the input stream
    /// outright (the overlay boundary); otherwise only invocations route,
    /// deepest containing target first, stopping at the first controller
    /// that does not ignore the event.
    pub fn dispatch_input(
        &mut self,
        ev: &InputEvent,
        viewport: Size,
        now: Instant,
    ) -> Result<Outcome> {
        if let Some(open) = self.open_menu() {
            return open.borrow_mut().handle_event(ev, viewport, now);
        }

        let InputEvent::Invoke { at, .. } = ev else {
            return Ok(Outcome::Ignored);
        };
        let mut hits: Vec<MenuHandle> = self
            .menus
            .iter()
            .filter(|(_, m)| m.borrow().target().contains(*at))
            .map(|(_, m)| Rc::clone(m))
            .collect();
        hits.sort_by_key(|m| {
            let area = m.borrow().target().area;
            u32::from(area.width) * u32::from(area.height)
        });
        for menu in hits {
            let outcome = menu.borrow_mut().handle_event(ev, viewport, now)?;
            if outcome != Outcome::Ignored {
                return Ok(outcome);
            }
        }
        Ok(Outcome::Ignored)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    fn target(id: u64, area: Rect) -> Target {
        Target::new(TargetId(id), area)
    }

    #[test]
    fn create_is_idempotent_per_target() {
        let mut registry = MenuRegistry::new();
        let area = Rect::new(0, 0, 10, 10);
        let first = registry.create(
            target(1, area),
            vec![ItemSpec::action("A", |_| Ok(()))],
            MenuOptions::default(),
        );
        // Different items and options on the second attempt; discarded.
        let second = registry.create(
            target(1, area),
            vec![ItemSpec::action("B", |_| Ok(())), ItemSpec::separator()],
            MenuOptions::new().name("other"),
        );
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.borrow().items.len(), 1);
    }

    #[test]
    fn distinct_targets_get_distinct_menus() {
        let mut registry = MenuRegistry::new();
        let a = registry.create(
            target(1, Rect::new(0, 0, 10, 10)),
            Vec::new(),
            MenuOptions::default(),
        );
        let b = registry.create(
            target(2, Rect::new(0, 0, 10, 10)),
            Vec::new(),
            MenuOptions::default(),
        );
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn lookup_is_by_identity_not_bounds() {
        let mut registry = MenuRegistry::new();
        let first = registry.create(
            target(7, Rect::new(0, 0, 10, 10)),
            Vec::new(),
            MenuOptions::default(),
        );
        // Same id, different bounds: still the same binding.
        let second = registry.create(
            target(7, Rect::new(5, 5, 20, 20)),
            Vec::new(),
            MenuOptions::default(),
        );
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.get(TargetId(7)).unwrap().borrow().target().area.x, 0);
    }

    #[test]
    fn no_open_menu_initially() {
        let registry = MenuRegistry::new();
        assert!(registry.open_menu().is_none());
        assert!(!registry.scroll_locked());
    }
}
