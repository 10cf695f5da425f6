//! Item descriptors and the factory that turns them into renderable nodes.

use std::fmt;
use std::time::Duration;

use crate::controller::ContextMenu;
use crate::error::{MenuError, Result};
use crate::node::{Marker, Node};

/// Delay before an opened session starts responding to item releases.
///
/// The same physical press that invokes a menu produces a release shortly
/// after, often over a freshly rendered item under the cursor; activations
/// are ignored until this much time has passed since the session opened.
pub const ARM_DELAY: Duration = Duration::from_millis(200);

/// The one built-in special kind. Further kinds are registered per menu via
/// [`MenuOptions::specials`](crate::options::MenuOptions::specials).
pub const SEPARATOR: &str = "separator";

/// An item's action. Receives the owning controller so it can inspect the
/// target or adjust items for the next session; its error propagates out of
/// dispatch after the menu has closed.
pub type ActionFn =
    Box<dyn FnMut(&mut ContextMenu) -> std::result::Result<(), Box<dyn std::error::Error>>>;

/// Describes one menu entry: an actionable item, or a special structural
/// entry named by a bare string.
pub enum ItemSpec {
    Action { title: String, action: ActionFn },
    Special(String),
}

impl ItemSpec {
    pub fn action<F>(title: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut ContextMenu) -> std::result::Result<(), Box<dyn std::error::Error>>
            + 'static,
    {
        ItemSpec::Action {
            title: title.into(),
            action: Box::new(action),
        }
    }

    pub fn separator() -> Self {
        ItemSpec::Special(SEPARATOR.to_string())
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ItemSpec::Action { title, .. } => Some(title),
            ItemSpec::Special(_) => None,
        }
    }
}

impl From<&str> for ItemSpec {
    fn from(kind: &str) -> Self {
        ItemSpec::Special(kind.to_string())
    }
}

impl From<String> for ItemSpec {
    fn from(kind: String) -> Self {
        ItemSpec::Special(kind)
    }
}

impl fmt::Debug for ItemSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemSpec::Action { title, .. } => f.debug_tuple("Action").field(title).finish(),
            ItemSpec::Special(kind) => f.debug_tuple("Special").field(kind).finish(),
        }
    }
}

/// Build the renderable node for one descriptor.
///
/// Action items become focusable nodes carrying the `item` marker and their
/// index back into the controller's item list. Special items become marker
/// nodes with no action wiring. An unrecognized special kind fails fast
/// here, before the session takes any resource, so a malformed menu never
/// silently renders short.
pub fn build_item_node(spec: &ItemSpec, index: usize, specials: &[String]) -> Result<Node> {
    match spec {
        ItemSpec::Action { title, .. } => {
            let mut node = Node::new(Marker::Item);
            node.label = title.clone();
            node.focusable = true;
            node.item_index = Some(index);
            Ok(node)
        }
        ItemSpec::Special(kind) => {
            if kind != SEPARATOR && !specials.iter().any(|s| s == kind) {
                return Err(MenuError::UnknownSpecial(kind.clone()));
            }
            Ok(Node::new(Marker::Special(kind.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_item_builds_focusable_indexed_node() {
        let spec = ItemSpec::action("Copy", |_| Ok(()));
        let node = build_item_node(&spec, 3, &[]).unwrap();
        assert_eq!(node.marker, Marker::Item);
        assert_eq!(node.label, "Copy");
        assert!(node.focusable);
        assert_eq!(node.item_index, Some(3));
    }

    #[test]
    fn bare_string_builds_separator_node() {
        let spec = ItemSpec::from("separator");
        let node = build_item_node(&spec, 0, &[]).unwrap();
        assert_eq!(node.marker, Marker::Special("separator".into()));
        assert!(!node.focusable);
        assert_eq!(node.item_index, None);
    }

    #[test]
    fn registered_extra_special_is_accepted() {
        let spec = ItemSpec::from("header");
        let node = build_item_node(&spec, 0, &["header".to_string()]).unwrap();
        assert_eq!(node.marker, Marker::Special("header".into()));
    }

    #[test]
    fn unknown_special_fails_fast() {
        let spec = ItemSpec::from("rule");
        let err = build_item_node(&spec, 0, &[]).unwrap_err();
        assert!(matches!(err, MenuError::UnknownSpecial(kind) if kind == "rule"));
    }
}
