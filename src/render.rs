use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::controller::ContextMenu;
use crate::node::Marker;
use crate::registry::MenuRegistry;

// ── Colors ─────────────────────────────────────────────────────────────────

const BORDER: Color = Color::Rgb(122, 162, 247);
const TITLE: Color = Color::Rgb(255, 158, 100);
const ITEM: Color = Color::Rgb(192, 202, 245);
const DIM: Color = Color::Rgb(86, 95, 137);

// ── Session renderer ────────────────────────────────────────────────────────

/// Draw any open session on top of the host's frame. Call last in the
/// host's draw pass so the menu stays topmost.
pub fn render(f: &mut Frame, registry: &MenuRegistry) {
    if let Some(menu) = registry.open_menu() {
        render_session(f, &menu.borrow());
    }
}

fn render_session(f: &mut Frame, menu: &ContextMenu) {
    let Some(session) = menu.session() else {
        return;
    };
    if !session.overlay.visible {
        return;
    }

    let area = session.menu_area.intersection(f.area());
    if area.width == 0 || area.height == 0 {
        return;
    }
    f.render_widget(Clear, area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER));
    if !menu.options.name.is_empty() {
        block = block.title(Span::styled(
            menu.options.name.clone(),
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        ));
    }
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    let children = &session.menu_node().children;

    if session.arrow_rows {
        if let Some(up) = children.first() {
            lines.push(Line::styled(
                center(&up.label, inner.width as usize),
                Style::default().fg(DIM),
            ));
        }
    }

    let skip = usize::from(session.scroll);
    let take = usize::from(session.list_height);
    for node in session.rows().iter().skip(skip).take(take) {
        match &node.marker {
            Marker::Special(_) => lines.push(Line::styled(
                "─".repeat(inner.width as usize),
                Style::default().fg(DIM),
            )),
            _ => lines.push(Line::styled(
                format!(" {}", node.label),
                Style::default().fg(ITEM),
            )),
        }
    }

    if session.arrow_rows {
        if let Some(down) = children.last() {
            lines.push(Line::styled(
                center(&down.label, inner.width as usize),
                Style::default().fg(DIM),
            ));
        }
    }

    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    " ".repeat(left) + s + &" ".repeat(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pads_evenly() {
        assert_eq!(center("▲", 5), "  ▲  ");
        assert_eq!(center("ab", 5), " ab  ");
        assert_eq!(center("abcdef", 3), "abc");
    }
}
