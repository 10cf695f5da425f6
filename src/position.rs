//! Pure placement geometry for a menu box inside a viewport.
//!
//! `solve` never touches session state: it takes the click point, the
//! viewport bounds and the measured menu box and returns where the menu
//! goes plus, when the menu cannot fit vertically at all, the over-tall
//! remediation the controller must apply.

use ratatui::layout::Rect;

// ── Basic geometry ──────────────────────────────────────────────────────────

/// A point in cell coordinates. Signed: the solver may produce positions
/// above or left of the viewport before the commit step clamps them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A box size in cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl From<Rect> for Size {
    fn from(area: Rect) -> Self {
        Size {
            w: i32::from(area.width),
            h: i32::from(area.height),
        }
    }
}

pub(crate) fn rect_contains(area: Rect, p: Point) -> bool {
    p.x >= i32::from(area.x)
        && p.x < i32::from(area.x) + i32::from(area.width)
        && p.y >= i32::from(area.y)
        && p.y < i32::from(area.y) + i32::from(area.height)
}

pub(crate) fn to_u16(v: i32) -> u16 {
    v.clamp(0, i32::from(u16::MAX)) as u16
}

// ── Transfer strategy ───────────────────────────────────────────────────────

/// Axis strategy for a menu that would overflow the viewport: flip to the
/// other side of the click point, or clamp against the viewport edge.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Transfer {
    /// Clamp on both axes.
    None,
    /// Flip horizontally, clamp vertically.
    X,
    /// Flip vertically, clamp horizontally.
    #[default]
    Y,
    /// Flip on both axes.
    Both,
}

impl Transfer {
    fn flips_x(self) -> bool {
        matches!(self, Transfer::X | Transfer::Both)
    }

    fn flips_y(self) -> bool {
        matches!(self, Transfer::Y | Transfer::Both)
    }
}

// ── Solver output ───────────────────────────────────────────────────────────

/// Vertical remediation for a menu taller than the viewport: the top edge
/// clamps to the margin and the height caps so the menu stays fully on
/// screen. The controller injects the arrow indicators and the scroll
/// window; only that branch mutates menu structure after the initial build.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OverTall {
    pub top: i32,
    pub max_height: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub position: Point,
    pub over_tall: Option<OverTall>,
}

// ── Solver ──────────────────────────────────────────────────────────────────

/// Smallest useful capped menu: two border rows, both arrow indicators and
/// a single list row.
const MIN_CAPPED_HEIGHT: i32 = 5;

/// Compute the final placement for a menu box invoked at `click`.
///
/// The position starts at the click point. Each axis that overflows the
/// viewport either flips around the click point or clamps to the far edge,
/// per `transfer`. If the resolved y lands above the viewport and the menu
/// bottom (with `vertical_margin` applied) still exceeds the viewport
/// height, the menu is over-tall and the vertical remediation kicks in.
///
/// Zero-size menus solve like any other; both axes remediate independently
/// when the menu exceeds the viewport in both dimensions.
pub fn solve(
    click: Point,
    viewport: Size,
    menu: Size,
    transfer: Transfer,
    vertical_margin: i32,
) -> Placement {
    let mut position = click;

    if click.x + menu.w > viewport.w {
        position.x = if transfer.flips_x() {
            click.x - menu.w
        } else {
            viewport.w - menu.w
        };
    }

    if click.y + menu.h > viewport.h {
        position.y = if transfer.flips_y() {
            click.y - menu.h
        } else {
            viewport.h - menu.h
        };
    }

    let over_tall = if position.y < 0 && vertical_margin + menu.h > viewport.h {
        // An oversized margin must not collapse the window below the two
        // border rows, the two arrow rows and one list row.
        let margin = vertical_margin.min(((viewport.h - MIN_CAPPED_HEIGHT) / 2).max(0));
        Some(OverTall {
            top: margin,
            max_height: viewport.h - 2 * margin,
        })
    } else {
        None
    };

    Placement {
        position,
        over_tall,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    fn sz(w: i32, h: i32) -> Size {
        Size { w, h }
    }

    #[test]
    fn fitting_menu_keeps_click_point() {
        for &(x, y) in &[(0, 0), (10, 10), (2900, 0), (0, 45), (1000, 20)] {
            let p = solve(pt(x, y), sz(3000, 130), sz(100, 80), Transfer::Both, 10);
            assert_eq!(p.position, pt(x, y));
            assert_eq!(p.over_tall, None);
        }
    }

    #[test]
    fn transfer_x_flips_horizontally_only() {
        let p = solve(pt(2950, 10), sz(3000, 130), sz(100, 80), Transfer::X, 10);
        assert_eq!(p.position, pt(2950 - 100, 10));
        assert_eq!(p.over_tall, None);
    }

    #[test]
    fn transfer_none_clamps_never_flips() {
        let p = solve(pt(2950, 10), sz(3000, 130), sz(100, 80), Transfer::None, 10);
        assert_eq!(p.position.x, 3000 - 100);
        assert_eq!(p.position.y, 10);
    }

    #[test]
    fn transfer_both_flips_on_wide_viewport() {
        // 3000x50 viewport, 100x80 menu: x flips, y flips below zero.
        let p = solve(pt(2950, 10), sz(3000, 50), sz(100, 80), Transfer::Both, 10);
        assert_eq!(p.position.x, 2850);
    }

    #[test]
    fn anchored_when_nothing_overflows() {
        let p = solve(pt(10, 10), sz(3000, 50), sz(100, 30), Transfer::Both, 10);
        assert_eq!(p.position, pt(10, 10));
        assert_eq!(p.over_tall, None);
    }

    #[test]
    fn over_tall_menu_clamps_and_caps() {
        // Viewport height 40, menu height 200, margin 10: y flips to -170,
        // the bottom still exceeds the viewport, so the menu caps to 20 rows
        // starting at row 10.
        let p = solve(pt(10, 30), sz(3000, 40), sz(100, 200), Transfer::Y, 10);
        assert_eq!(p.position.y, 30 - 200);
        let ot = p.over_tall.expect("over-tall remediation");
        assert_eq!(ot.top, 10);
        assert_eq!(ot.max_height, 40 - 2 * 10);
    }

    #[test]
    fn over_tall_applies_without_flip_too() {
        // Clamping a menu taller than the viewport also drives y negative.
        let p = solve(pt(10, 30), sz(3000, 40), sz(100, 200), Transfer::None, 10);
        assert_eq!(p.position.y, 40 - 200);
        assert!(p.over_tall.is_some());
    }

    #[test]
    fn oversized_margin_cannot_collapse_the_window() {
        let p = solve(pt(5, 23), sz(80, 24), sz(20, 40), Transfer::Y, 12);
        let ot = p.over_tall.expect("over-tall remediation");
        assert_eq!(ot.top, 9);
        assert_eq!(ot.max_height, 6);
    }

    #[test]
    fn flipped_menu_that_fits_with_margin_is_not_over_tall() {
        let p = solve(pt(5, 99), sz(200, 102), sz(40, 100), Transfer::Y, 1);
        assert_eq!(p.position.y, -1);
        assert_eq!(p.over_tall, None);
    }

    #[test]
    fn both_axes_remediate_independently() {
        // Menu larger than the viewport in both dimensions.
        let p = solve(pt(5, 5), sz(30, 20), sz(50, 40), Transfer::None, 2);
        assert_eq!(p.position.x, 30 - 50);
        assert_eq!(p.position.y, 20 - 40);
        assert!(p.over_tall.is_some());
    }

    #[test]
    fn zero_size_menu_solves_unchanged() {
        let p = solve(pt(7, 7), sz(80, 24), sz(0, 0), Transfer::Both, 1);
        assert_eq!(p.position, pt(7, 7));
        assert_eq!(p.over_tall, None);
    }
}
