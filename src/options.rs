//! Per-menu configuration.
//!
//! Defaults live in `MenuOptions::default()` and are merged over exactly
//! once at construction through the builder methods; nothing ever mutates
//! the defaults themselves.

use crate::controller::ContextMenu;
use crate::position::Transfer;

/// Opening/closing hook. Receives the controller, so a hook may tweak items
/// or options for the next session.
pub type MenuCallback = Box<dyn FnMut(&mut ContextMenu)>;

pub struct MenuOptions {
    /// Scope for the structural markers (styling hook). Default empty.
    pub name: String,
    /// When set, invocations are intercepted but no menu opens.
    pub disabled: bool,
    /// When set, an ALT-modified invocation is passed through so the host's
    /// default behavior runs instead of the menu.
    pub default_on_alt: bool,
    /// Whether a keyboard-originated invocation (menu key) closes an open
    /// session. Pointer invocations above the overlay always close.
    pub close_on_key: bool,
    /// When set, a right press on the overlay is deferred to the invocation
    /// phase so a new session supersedes the old one directly; when unset,
    /// any press closes first and the follow-up invocation reopens.
    pub no_recreate: bool,
    /// Axis strategy for viewport overflow.
    pub transfer: Transfer,
    /// Margin, in cells, kept above and below an over-tall menu.
    pub vertical_margin: u16,
    /// Extra accepted special item kinds beyond the built-in separator.
    pub specials: Vec<String>,
    pub on_open: MenuCallback,
    pub on_close: MenuCallback,
}

impl Default for MenuOptions {
    fn default() -> Self {
        MenuOptions {
            name: String::new(),
            disabled: false,
            default_on_alt: true,
            close_on_key: false,
            no_recreate: true,
            transfer: Transfer::Y,
            vertical_margin: 1,
            specials: Vec::new(),
            on_open: Box::new(|_| {}),
            on_close: Box::new(|_| {}),
        }
    }
}

impl MenuOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn default_on_alt(mut self, default_on_alt: bool) -> Self {
        self.default_on_alt = default_on_alt;
        self
    }

    pub fn close_on_key(mut self, close_on_key: bool) -> Self {
        self.close_on_key = close_on_key;
        self
    }

    pub fn no_recreate(mut self, no_recreate: bool) -> Self {
        self.no_recreate = no_recreate;
        self
    }

    pub fn transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn vertical_margin(mut self, cells: u16) -> Self {
        self.vertical_margin = cells;
        self
    }

    pub fn special(mut self, kind: impl Into<String>) -> Self {
        self.specials.push(kind.into());
        self
    }

    pub fn on_open(mut self, hook: impl FnMut(&mut ContextMenu) + 'static) -> Self {
        self.on_open = Box::new(hook);
        self
    }

    pub fn on_close(mut self, hook: impl FnMut(&mut ContextMenu) + 'static) -> Self {
        self.on_close = Box::new(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = MenuOptions::default();
        assert_eq!(opts.name, "");
        assert!(!opts.disabled);
        assert!(opts.default_on_alt);
        assert!(!opts.close_on_key);
        assert!(opts.no_recreate);
        assert_eq!(opts.transfer, Transfer::Y);
        assert_eq!(opts.vertical_margin, 1);
        assert!(opts.specials.is_empty());
    }

    #[test]
    fn builder_overrides_do_not_leak_between_instances() {
        let custom = MenuOptions::new().transfer(Transfer::Both).disabled(true);
        assert_eq!(custom.transfer, Transfer::Both);

        let fresh = MenuOptions::default();
        assert_eq!(fresh.transfer, Transfer::Y);
        assert!(!fresh.disabled);
    }
}
