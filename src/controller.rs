//! The lifecycle controller: one `ContextMenu` per target, driving the
//! `Idle → Opening → Open → Closing → Idle` cycle for each invocation.

use std::mem;
use std::time::Instant;

use log::{debug, trace};
use ratatui::layout::Rect;

use crate::error::{MenuError, Result};
use crate::events::{Button, InputEvent, Outcome};
use crate::item::{ARM_DELAY, ActionFn, ItemSpec, build_item_node};
use crate::node::{Node, measure_menu};
use crate::options::MenuOptions;
use crate::position::{Point, Size, rect_contains, solve, to_u16};
use crate::registry::ScrollLock;

// ── Target ──────────────────────────────────────────────────────────────────

/// Stable identity of a target region. Registry lookups key on this, never
/// on the bounds, so a relayout does not re-register anything.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TargetId(pub u64);

#[derive(Clone, Copy, Debug)]
pub struct Target {
    pub id: TargetId,
    pub area: Rect,
}

impl Target {
    pub fn new(id: TargetId, area: Rect) -> Self {
        Target { id, area }
    }

    pub fn contains(&self, p: Point) -> bool {
        rect_contains(self.area, p)
    }
}

// ── Lifecycle state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuState {
    Idle,
    Opening,
    Open,
    Closing,
}

/// Everything belonging to one open instance of a menu. Created per
/// invocation, discarded wholesale on close; never reused.
pub struct OpenSession {
    /// Overlay node holding the menu node and its children.
    pub overlay: Node,
    /// Raw solver position (signed; the committed area clamps it).
    pub position: Point,
    /// Final on-screen menu box.
    pub menu_area: Rect,
    /// Rows visible in the item list at once.
    pub list_height: u16,
    /// Whether the over-tall remediation injected the arrow indicators.
    pub arrow_rows: bool,
    /// Scroll offset into the item list, rows.
    pub scroll: u16,
    pub opened_at: Instant,
    closing: bool,
}

impl OpenSession {
    pub fn menu_node(&self) -> &Node {
        &self.overlay.children[0]
    }

    /// Item-list rows: the menu children minus the injected arrows.
    pub fn rows(&self) -> &[Node] {
        let children = &self.menu_node().children;
        if self.arrow_rows {
            &children[1..children.len() - 1]
        } else {
            children
        }
    }
}

enum Hook {
    Open,
    Close,
}

// ── Controller ──────────────────────────────────────────────────────────────

pub struct ContextMenu {
    target: Target,
    pub items: Vec<ItemSpec>,
    pub options: MenuOptions,
    state: MenuState,
    session: Option<OpenSession>,
    scroll_lock: ScrollLock,
    /// Explicit interest in the cancel key, armed on open and deregistered
    /// on close (the cancel key is routed process-wide, not through the
    /// overlay subtree).
    cancel_key_armed: bool,
}

impl ContextMenu {
    pub(crate) fn new(
        target: Target,
        items: Vec<ItemSpec>,
        options: MenuOptions,
        scroll_lock: ScrollLock,
    ) -> Self {
        ContextMenu {
            target,
            items,
            options,
            state: MenuState::Idle,
            session: None,
            scroll_lock,
            cancel_key_armed: false,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Track the host layout. The binding (id) never changes; the bounds may.
    pub fn set_target_area(&mut self, area: Rect) {
        self.target.area = area;
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open)
    }

    pub fn session(&self) -> Option<&OpenSession> {
        self.session.as_ref()
    }

    // ── Event handling ──────────────────────────────────────────────────────

    pub(crate) fn handle_event(
        &mut self,
        ev: &InputEvent,
        viewport: Size,
        now: Instant,
    ) -> Result<Outcome> {
        match self.state {
            MenuState::Open => self.handle_while_open(ev, viewport, now),
            MenuState::Idle => self.handle_while_idle(ev, viewport, now),
            // Opening and Closing only exist inside a single call; an event
            // observed mid-transition is consumed without effect.
            MenuState::Opening | MenuState::Closing => Ok(Outcome::Handled),
        }
    }

    fn handle_while_idle(
        &mut self,
        ev: &InputEvent,
        viewport: Size,
        now: Instant,
    ) -> Result<Outcome> {
        let InputEvent::Invoke { at, alt } = ev else {
            return Ok(Outcome::Ignored);
        };
        if !self.target.contains(*at) {
            return Ok(Outcome::Ignored);
        }
        if self.options.default_on_alt && *alt {
            // The invocation stops here (no ancestor menu may react) but the
            // host default proceeds.
            return Ok(Outcome::PassThrough);
        }
        if self.options.disabled {
            return Ok(Outcome::Handled);
        }
        self.open(*at, viewport, now)?;
        Ok(Outcome::Handled)
    }

    fn handle_while_open(
        &mut self,
        ev: &InputEvent,
        viewport: Size,
        now: Instant,
    ) -> Result<Outcome> {
        match *ev {
            InputEvent::CancelKey => {
                if self.cancel_key_armed {
                    self.close();
                }
                Ok(Outcome::Handled)
            }
            InputEvent::InvokeKey => {
                if self.options.close_on_key {
                    self.close();
                }
                Ok(Outcome::Handled)
            }
            InputEvent::Press { button, at } => {
                if self.menu_contains(at) {
                    // Swallowed so the closing logic cannot misread it;
                    // closure over the menu body is decided at the
                    // invocation phase.
                    Ok(Outcome::Handled)
                } else if button == Button::Right && self.options.no_recreate {
                    // Deferred to the paired Invoke so a new session can
                    // supersede this one directly.
                    Ok(Outcome::Handled)
                } else {
                    self.close();
                    Ok(Outcome::Handled)
                }
            }
            InputEvent::Invoke { at, alt } => {
                if self.menu_contains(at) {
                    self.close();
                    return Ok(Outcome::Handled);
                }
                self.close();
                let pass = self.options.default_on_alt && alt;
                if pass {
                    return Ok(Outcome::PassThrough);
                }
                if self.target.contains(at) && !self.options.disabled {
                    self.open(at, viewport, now)?;
                }
                Ok(Outcome::Handled)
            }
            InputEvent::Release { at, .. } => {
                if let Some(index) = self.armed_item_at(at, now) {
                    return self.run_action(index);
                }
                Ok(Outcome::Handled)
            }
            InputEvent::Scroll { at, delta } => {
                self.scroll_by(at, delta);
                Ok(Outcome::Handled)
            }
        }
    }

    // ── Opening ─────────────────────────────────────────────────────────────

    /// Idle → Opening → Open, fully synchronous: build nodes, measure the
    /// menu off-screen, solve placement, commit, then run the opening hook.
    fn open(&mut self, at: Point, viewport: Size, now: Instant) -> Result<()> {
        self.state = MenuState::Opening;

        let mut menu = Node::menu(&self.options.name);
        for (index, spec) in self.items.iter().enumerate() {
            match build_item_node(spec, index, &self.options.specials) {
                Ok(node) => menu.children.push(node),
                Err(e) => {
                    // Fail fast before any resource is taken.
                    self.state = MenuState::Idle;
                    return Err(e);
                }
            }
        }

        let size = measure_menu(&menu);
        let placement = solve(
            at,
            viewport,
            size,
            self.options.transfer,
            i32::from(self.options.vertical_margin),
        );

        let (y, height, arrow_rows, list_height) = match placement.over_tall {
            Some(over_tall) => {
                let up = Node::arrow("▲");
                let down = Node::arrow("▼");
                let arrows = i32::from(up.height) + i32::from(down.height);
                menu.children.insert(0, up);
                menu.children.push(down);
                let height = over_tall.max_height.min(size.h);
                let list_height = (height - 2 - arrows).max(1);
                (over_tall.top, height, true, list_height)
            }
            None => (placement.position.y.max(0), size.h, false, size.h - 2),
        };

        let menu_area = Rect {
            x: to_u16(placement.position.x.max(0)),
            y: to_u16(y),
            width: to_u16(size.w),
            height: to_u16(height),
        };

        let mut overlay = Node::overlay(&self.options.name);
        menu.visible = true;
        overlay.visible = true;
        overlay.children.push(menu);

        self.scroll_lock.acquire();
        self.cancel_key_armed = true;
        self.session = Some(OpenSession {
            overlay,
            position: placement.position,
            menu_area,
            list_height: to_u16(list_height),
            arrow_rows,
            scroll: 0,
            opened_at: now,
            closing: false,
        });
        self.state = MenuState::Open;
        debug!(
            "menu {:?} open at {:?}, committed {:?}",
            self.target.id, placement.position, menu_area
        );
        self.run_hook(Hook::Open);
        Ok(())
    }

    // ── Closing ─────────────────────────────────────────────────────────────

    /// Open → Closing → Idle. Total and unconditional: releases the scroll
    /// lock, drops the overlay subtree (and with it every item's wiring),
    /// deregisters the cancel-key interest, then runs the closing hook.
    /// Idempotent: any further close signal on the same session is absorbed.
    pub fn close(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            trace!("menu {:?} close absorbed (no session)", self.target.id);
            return false;
        };
        if session.closing {
            trace!("menu {:?} close absorbed (already closing)", self.target.id);
            return false;
        }
        session.closing = true;
        self.state = MenuState::Closing;

        self.scroll_lock.release();
        self.session = None;
        self.cancel_key_armed = false;
        self.state = MenuState::Idle;
        debug!("menu {:?} closed", self.target.id);
        self.run_hook(Hook::Close);
        true
    }

    // ── Item activation ─────────────────────────────────────────────────────

    /// The action item under `at`, provided the session has been open for at
    /// least [`ARM_DELAY`]. Separator rows and the border/arrow rows yield
    /// nothing.
    fn armed_item_at(&self, at: Point, now: Instant) -> Option<usize> {
        let session = self.session.as_ref()?;
        if now.saturating_duration_since(session.opened_at) < ARM_DELAY {
            return None;
        }
        let area = session.menu_area;
        if at.x <= i32::from(area.x) || at.x >= i32::from(area.x) + i32::from(area.width) - 1 {
            return None;
        }
        let list_top = i32::from(area.y) + 1 + i32::from(session.arrow_rows);
        let row = at.y - list_top;
        if row < 0 || row >= i32::from(session.list_height) {
            return None;
        }
        let slot = row as usize + usize::from(session.scroll);
        session.rows().get(slot)?.item_index
    }

    /// Run the action with the controller as receiver, then close. The
    /// close is not conditioned on the action's success; an action error
    /// surfaces to the dispatch caller after teardown.
    fn run_action(&mut self, index: usize) -> Result<Outcome> {
        let mut action = match &mut self.items[index] {
            ItemSpec::Action { action, .. } => mem::replace(action, Box::new(|_| Ok(()))),
            ItemSpec::Special(_) => return Ok(Outcome::Handled),
        };
        // The action may insert or remove items, so the slot holding the
        // placeholder is found again by identity, never by index.
        let sentinel = match &self.items[index] {
            ItemSpec::Action { action, .. } => action_ptr(action),
            ItemSpec::Special(_) => std::ptr::null(),
        };
        let result = action(self);
        let slot = self.items.iter_mut().find_map(|item| match item {
            ItemSpec::Action { action, .. } if action_ptr(action) == sentinel => Some(action),
            _ => None,
        });
        if let Some(slot) = slot {
            *slot = action;
        }
        self.close();
        result.map_err(MenuError::Action)?;
        Ok(Outcome::Handled)
    }

    fn scroll_by(&mut self, at: Point, delta: i32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.arrow_rows || !rect_contains(session.menu_area, at) {
            return;
        }
        let max = session.rows().len().saturating_sub(usize::from(session.list_height)) as i32;
        let next = (i32::from(session.scroll) + delta).clamp(0, max);
        session.scroll = to_u16(next);
    }

    fn menu_contains(&self, at: Point) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| rect_contains(s.menu_area, at))
    }

    /// Hooks receive the controller itself; the callback slot is taken for
    /// the duration of the call and restored after.
    fn run_hook(&mut self, hook: Hook) {
        let mut callback = match hook {
            Hook::Open => mem::replace(&mut self.options.on_open, Box::new(|_| {})),
            Hook::Close => mem::replace(&mut self.options.on_close, Box::new(|_| {})),
        };
        callback(self);
        match hook {
            Hook::Open => self.options.on_open = callback,
            Hook::Close => self.options.on_close = callback,
        }
    }
}

/// Thin data pointer of a boxed action, for identity comparison.
fn action_ptr(action: &ActionFn) -> *const () {
    &**action as *const _ as *const ()
}

// ── Tests ───────────────────────────────────────────────────────────────────
