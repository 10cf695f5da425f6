use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

use tui_ctxmenu::{
    ItemSpec, MenuOptions, MenuRegistry, Outcome, Size, Target, TargetId, Transfer,
};

const WORKSPACE: TargetId = TargetId(1);
const PREVIEW: TargetId = TargetId(2);

fn main() -> Result<(), io::Error> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>) -> Result<(), io::Error> {
    let mut registry = MenuRegistry::new();
    let status = Rc::new(RefCell::new(String::from(
        "Right-click a panel (Alt+right-click passes through)  q Quit",
    )));

    let mut area = Rect::new(0, 0, 80, 24);
    let (workspace_area, preview_area, _) = layout(area);

    let seen = Rc::clone(&status);
    let copy = ItemSpec::action("Copy path", move |_| {
        *seen.borrow_mut() = "copied workspace path".to_string();
        Ok(())
    });
    let seen = Rc::clone(&status);
    let paste = ItemSpec::action("Paste", move |_| {
        *seen.borrow_mut() = "pasted into workspace".to_string();
        Ok(())
    });
    let delete = ItemSpec::action("Delete", |_| Err("nothing selected".into()));

    let workspace_menu = registry.create(
        Target::new(WORKSPACE, workspace_area),
        vec![copy, ItemSpec::separator(), paste, delete],
        MenuOptions::new().name("workspace"),
    );

    let seen = Rc::clone(&status);
    let zoom = ItemSpec::action("Zoom", move |_| {
        *seen.borrow_mut() = "zoomed preview".to_string();
        Ok(())
    });
    let seen = Rc::clone(&status);
    let preview_menu = registry.create(
        Target::new(PREVIEW, preview_area),
        vec![zoom],
        MenuOptions::new()
            .name("preview")
            .no_recreate(false)
            .transfer(Transfer::Both)
            .on_close(move |_| *seen.borrow_mut() = "preview menu closed".to_string()),
    );

    loop {
        terminal.draw(|f| {
            area = f.area();
            draw(f, area, &registry, &status.borrow());
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let evt = event::read()?;

        // Keep target bounds in sync with the current layout.
        let (workspace_area, preview_area, _) = layout(area);
        workspace_menu.borrow_mut().set_target_area(workspace_area);
        preview_menu.borrow_mut().set_target_area(preview_area);

        match registry.dispatch(&evt, Size::from(area), Instant::now()) {
            Ok(Outcome::Handled) => {}
            Ok(Outcome::PassThrough) => {
                *status.borrow_mut() = "host default action (alt held)".to_string();
            }
            Ok(Outcome::Ignored) => {
                if let Event::Key(key) = evt {
                    let quit = key.code == KeyCode::Char('q')
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL));
                    if quit {
                        return Ok(());
                    }
                }
            }
            Err(e) => {
                *status.borrow_mut() = format!("action error: {e}");
            }
        }
    }
}

// ── Layout ─────────────────────────────────────────────────────────────────

/// (workspace, preview, status). The preview target nests inside the
/// workspace target to exercise the deepest-target dispatch rule.
fn layout(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);
    let workspace = rows[0];
    let preview = Rect {
        x: workspace.x + workspace.width / 2,
        y: workspace.y + 1,
        width: workspace.width / 2 - 1,
        height: workspace.height.saturating_sub(2),
    };
    (workspace, preview, rows[1])
}

fn draw(f: &mut Frame, area: Rect, registry: &MenuRegistry, status: &str) {
    let (workspace, preview, status_area) = layout(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(122, 162, 247)))
        .title(Span::styled(
            "Workspace",
            Style::default()
                .fg(Color::Rgb(255, 158, 100))
                .add_modifier(Modifier::BOLD),
        ));
    f.render_widget(block, workspace);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(187, 154, 247)))
        .title("Preview");
    f.render_widget(block, preview);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(158, 206, 106)));
    let inner = block.inner(status_area);
    f.render_widget(block, status_area);
    f.render_widget(
        Paragraph::new(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Rgb(224, 175, 104)),
        )),
        inner,
    );

    // Menu overlay goes last so it stays topmost.
    tui_ctxmenu::render(f, registry);
}
