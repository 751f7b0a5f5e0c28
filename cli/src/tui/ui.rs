use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use tasklist_core::api::{Task, TaskApi, TaskClient};

use super::app::{StatusLine, TuiApp};

pub fn draw<A: TaskApi>(f: &mut Frame<'_>, app: &TuiApp, client: &TaskClient<A>) {
    let size = f.area();
    let editing = client.view().is_editing();
    let input_height = if editing { 0 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(input_height),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    draw_header(f, chunks[0], client);
    if !editing {
        draw_input(f, chunks[1], app);
    }
    draw_tasks(f, chunks[2], app, client);
    draw_status(f, chunks[3], app, client);

    if client.view().menu_open() {
        draw_menu(f, chunks[2], client);
    }
}

fn draw_header<A: TaskApi>(f: &mut Frame<'_>, area: Rect, client: &TaskClient<A>) {
    let total = client.tasks().len();
    let done = client.tasks().iter().filter(|t| t.completed).count();
    let mode = if client.view().is_editing() {
        let selected = client.view().selected().map_or(0, |s| s.len());
        Span::styled(
            format!("EDIT ({selected} selected)"),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled("NORMAL", Style::default().fg(Color::Green))
    };

    let mut parts = vec![
        Span::styled("Tasklist", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  Tasks: "),
        Span::styled(total.to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  Done: "),
        Span::styled(done.to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  Mode: "),
        mode,
    ];
    if client.view().hide_completed() {
        parts.push(Span::styled(
            "  (completed hidden)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(parts)).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_input(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("New task")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    let widget = Paragraph::new(app.input_buffer.as_str()).block(block);
    f.render_widget(widget, area);

    let col = app.input_buffer[..app.input_cursor].chars().count() as u16;
    f.set_cursor_position((inner.x + col.min(inner.width.saturating_sub(1)), inner.y));
}

fn draw_tasks<A: TaskApi>(f: &mut Frame<'_>, area: Rect, app: &TuiApp, client: &TaskClient<A>) {
    let editing = client.view().is_editing();
    let items: Vec<ListItem> = client
        .visible()
        .into_iter()
        .map(|task| {
            let checked = if editing {
                client.view().is_selected(&task.id)
            } else {
                task.completed
            };
            ListItem::new(task_line(task, checked, editing))
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Tasks"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected((!empty).then_some(app.highlight));
    f.render_stateful_widget(list, area, &mut state);
}

fn task_line(task: &Task, checked: bool, editing: bool) -> Line<'_> {
    let mark = match (editing, checked) {
        (true, true) => "(*) ",
        (true, false) => "( ) ",
        (false, true) => "[x] ",
        (false, false) => "[ ] ",
    };
    let text_style = if task.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    Line::from(vec![Span::raw(mark), Span::styled(task.text.as_str(), text_style)])
}

fn draw_status<A: TaskApi>(f: &mut Frame<'_>, area: Rect, app: &TuiApp, client: &TaskClient<A>) {
    let hint = if client.view().is_editing() {
        let all = if client.all_selected() {
            "Deselect all"
        } else {
            "Select all"
        };
        format!("Space: select  a: {all}  d: delete selected  Esc: done  q: quit")
    } else {
        "Enter: add  ^T: toggle  ^D: delete  ^O: menu  ^R: reload  ^C: quit".to_string()
    };

    let status = match &app.status {
        StatusLine::Idle => Span::raw(""),
        StatusLine::Info(msg) => Span::styled(msg.as_str(), Style::default().fg(Color::Cyan)),
        StatusLine::Error(msg) => Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
    };

    let lines = vec![
        Line::from(status),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_menu<A: TaskApi>(f: &mut Frame<'_>, area: Rect, client: &TaskClient<A>) {
    let hide_label = if client.view().hide_completed() {
        "h  Show completed"
    } else {
        "h  Hide completed"
    };
    let lines = vec![Line::from("e  Edit"), Line::from(hide_label)];

    let width = 24.min(area.width);
    let height = 4.min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Menu")),
        popup,
    );
}
