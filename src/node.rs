//! Retained node tree for one open session.
//!
//! The tree exists for the structural contract: styling and tests read the
//! markers, the renderer reads the labels. One overlay node holds one menu
//! node, which holds the item nodes (and, when the menu is over-tall, an
//! arrow indicator as its first and last child).

use crate::position::Size;

/// Structural marker carried by every node.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Marker {
    /// Full-viewport capture layer, scoped by the menu's `name` option.
    Overlay { name: String },
    /// The menu container itself, same name scope.
    Menu { name: String },
    /// An actionable entry.
    Item,
    /// A non-actionable entry, tagged with its kind (`"separator"`, ...).
    Special(String),
    /// Scroll indicator injected by the over-tall remediation.
    Arrow,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub marker: Marker,
    /// Display text. Empty for structural nodes.
    pub label: String,
    /// Set on overlay and menu only once the final position is committed,
    /// so appearance animation hooks see a single transition.
    pub visible: bool,
    pub focusable: bool,
    /// Measured height in cells.
    pub height: u16,
    /// Index into the controller's item list, for actionable nodes.
    pub item_index: Option<usize>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(marker: Marker) -> Self {
        Node {
            marker,
            label: String::new(),
            visible: false,
            focusable: false,
            height: 1,
            item_index: None,
            children: Vec::new(),
        }
    }

    pub fn overlay(name: &str) -> Self {
        let mut node = Node::new(Marker::Overlay {
            name: name.to_string(),
        });
        node.height = 0;
        node
    }

    pub fn menu(name: &str) -> Self {
        let mut node = Node::new(Marker::Menu {
            name: name.to_string(),
        });
        node.height = 0;
        node
    }

    pub fn arrow(glyph: &str) -> Self {
        let mut node = Node::new(Marker::Arrow);
        node.label = glyph.to_string();
        node
    }
}

/// Content-derived menu box: widest child label plus border and padding,
/// summed child heights plus the border rows. This is the "off-screen
/// render" measurement taken before the solver runs. A menu with zero items
/// still gets a minimal box.
pub fn measure_menu(menu: &Node) -> Size {
    let inner_w = menu
        .children
        .iter()
        .map(|n| n.label.chars().count())
        .max()
        .unwrap_or(0)
        .max(1) as i32;
    let inner_h: i32 = menu.children.iter().map(|n| i32::from(n.height)).sum();
    Size {
        w: inner_w + 4,
        h: inner_h + 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_sums_heights_and_takes_widest_label() {
        let mut menu = Node::menu("");
        let mut a = Node::new(Marker::Item);
        a.label = "Copy".into();
        let mut b = Node::new(Marker::Item);
        b.label = "Paste here".into();
        menu.children = vec![a, Node::new(Marker::Special("separator".into())), b];

        let size = measure_menu(&menu);
        assert_eq!(size.h, 3 + 2);
        assert_eq!(size.w, "Paste here".len() as i32 + 4);
    }

    #[test]
    fn empty_menu_measures_minimal_box() {
        let menu = Node::menu("");
        let size = measure_menu(&menu);
        assert_eq!(size, Size { w: 5, h: 2 });
    }

    #[test]
    fn nodes_start_invisible() {
        assert!(!Node::overlay("x").visible);
        assert!(!Node::menu("x").visible);
    }
}
