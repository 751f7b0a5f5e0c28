use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklist_core::api::{AddOutcome, TaskApi, TaskClient, TaskId, TuiConfig};

/// Work that needs a store round-trip; the loop awaits it before redrawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Add(String),
    Toggle(TaskId),
    Delete(TaskId),
    BulkDelete,
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Idle,
    Info(String),
    Error(String),
}

pub struct TuiApp {
    pub config: TuiConfig,
    pub input_buffer: String,
    pub input_cursor: usize,
    pub highlight: usize,
    pub status: StatusLine,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(config: TuiConfig) -> Self {
        Self {
            config,
            input_buffer: String::new(),
            input_cursor: 0,
            highlight: 0,
            status: StatusLine::Idle,
            should_quit: false,
        }
    }

    pub fn highlighted_id<A: TaskApi>(&self, client: &TaskClient<A>) -> Option<TaskId> {
        client
            .visible()
            .get(self.highlight)
            .map(|task| task.id.clone())
    }

    /// Applies view-only changes in place and returns the round-trip, if any.
    pub fn handle_key<A: TaskApi>(&mut self, key: KeyEvent, client: &mut TaskClient<A>) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        let action = if client.view().is_editing() {
            self.handle_editing_key(key, client)
        } else if client.view().menu_open() {
            self.handle_menu_key(key, client)
        } else {
            self.handle_normal_key(key, client)
        };
        self.clamp_highlight(client.visible().len());
        action
    }

    fn handle_normal_key<A: TaskApi>(&mut self, key: KeyEvent, client: &mut TaskClient<A>) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('t') if ctrl => self.on_highlighted(client, Action::Toggle),
            KeyCode::Char('d') if ctrl => self.on_highlighted(client, Action::Delete),
            KeyCode::Char('o') if ctrl => {
                client.toggle_menu();
                Action::None
            }
            KeyCode::Char('r') if ctrl => Action::Reload,
            KeyCode::Enter => Action::Add(self.input_buffer.clone()),
            KeyCode::Up => {
                self.move_highlight(-1);
                Action::None
            }
            KeyCode::Down => {
                self.move_highlight(1);
                Action::None
            }
            KeyCode::Backspace => {
                self.backspace();
                Action::None
            }
            KeyCode::Left => {
                self.move_left();
                Action::None
            }
            KeyCode::Right => {
                self.move_right();
                Action::None
            }
            KeyCode::Home => {
                self.input_cursor = 0;
                Action::None
            }
            KeyCode::End => {
                self.input_cursor = self.input_buffer.len();
                Action::None
            }
            KeyCode::Char(ch) if !ctrl => {
                self.insert_char(ch);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_menu_key<A: TaskApi>(&mut self, key: KeyEvent, client: &mut TaskClient<A>) -> Action {
        match key.code {
            KeyCode::Char('e') => {
                client.enter_edit();
                self.status = StatusLine::Info("Edit mode".to_string());
            }
            KeyCode::Char('h') => {
                client.toggle_hide_completed();
            }
            KeyCode::Esc => client.close_menu(),
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                client.close_menu();
            }
            _ => {}
        }
        Action::None
    }

    fn handle_editing_key<A: TaskApi>(&mut self, key: KeyEvent, client: &mut TaskClient<A>) -> Action {
        match key.code {
            KeyCode::Esc => {
                client.cancel_edit();
                self.status = StatusLine::Idle;
                Action::None
            }
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char(' ') => {
                if let Some(id) = self.highlighted_id(client) {
                    if let Err(e) = client.toggle_select(&id) {
                        self.status = StatusLine::Error(e.to_string());
                    }
                }
                Action::None
            }
            KeyCode::Char('a') => {
                if let Err(e) = client.toggle_select_all() {
                    self.status = StatusLine::Error(e.to_string());
                }
                Action::None
            }
            KeyCode::Char('d') => {
                let empty = client.view().selected().map_or(true, |s| s.is_empty());
                if empty {
                    self.status = StatusLine::Info("Nothing selected".to_string());
                    Action::None
                } else {
                    Action::BulkDelete
                }
            }
            KeyCode::Up => {
                self.move_highlight(-1);
                Action::None
            }
            KeyCode::Down => {
                self.move_highlight(1);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Runs the round-trip to completion and records the outcome in the status line.
    pub async fn perform<A: TaskApi>(&mut self, action: Action, client: &mut TaskClient<A>) {
        match action {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::Add(text) => match client.add(&text).await {
                Ok(AddOutcome::Added(task)) => {
                    self.input_buffer.clear();
                    self.input_cursor = 0;
                    self.status = StatusLine::Info(format!("Added \"{}\"", task.text));
                }
                Ok(AddOutcome::Rejected) => {}
                Err(e) => self.status = StatusLine::Error(format!("{e:#}")),
            },
            Action::Toggle(id) => match client.toggle(&id).await {
                Ok(_) => {
                    self.focus(&id, client);
                    self.status = StatusLine::Idle;
                }
                Err(e) => self.status = StatusLine::Error(format!("{e:#}")),
            },
            Action::Delete(id) => match client.delete(&id).await {
                Ok(()) => self.status = StatusLine::Info("Task deleted".to_string()),
                Err(e) => self.status = StatusLine::Error(format!("{e:#}")),
            },
            Action::BulkDelete => match client.bulk_delete().await {
                Ok(report) if report.is_clean() => {
                    self.status =
                        StatusLine::Info(format!("Deleted {} task(s)", report.deleted.len()));
                }
                Ok(report) => {
                    self.status = StatusLine::Error(format!(
                        "Deleted {}, failed {}: {}",
                        report.deleted.len(),
                        report.failed.len(),
                        report
                            .failed
                            .first()
                            .map(|(_, why)| why.to_string())
                            .unwrap_or_default()
                    ));
                }
                Err(e) => self.status = StatusLine::Error(format!("{e:#}")),
            },
            Action::Reload => match client.load().await {
                Ok(()) => self.status = StatusLine::Idle,
                Err(e) => self.status = StatusLine::Error(format!("{e:#}")),
            },
        }
        self.clamp_highlight(client.visible().len());
    }

    pub fn clamp_highlight(&mut self, visible_len: usize) {
        self.highlight = self.highlight.min(visible_len.saturating_sub(1));
    }

    /// Keeps the highlight on `id` after it moved in render order.
    fn focus<A: TaskApi>(&mut self, id: &TaskId, client: &TaskClient<A>) {
        if let Some(pos) = client.visible().iter().position(|t| &t.id == id) {
            self.highlight = pos;
        }
    }

    fn on_highlighted<A: TaskApi>(
        &mut self,
        client: &TaskClient<A>,
        make: impl FnOnce(TaskId) -> Action,
    ) -> Action {
        self.highlighted_id(client).map(make).unwrap_or(Action::None)
    }

    fn move_highlight(&mut self, delta: isize) {
        self.highlight = self.highlight.saturating_add_signed(delta);
    }

    fn insert_char(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor, ch);
        self.input_cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(&self.input_buffer, self.input_cursor);
        if prev < self.input_cursor {
            self.input_buffer.replace_range(prev..self.input_cursor, "");
            self.input_cursor = prev;
        }
    }

    fn move_left(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor = prev_char_boundary(&self.input_buffer, self.input_cursor);
    }

    fn move_right(&mut self) {
        if self.input_cursor >= self.input_buffer.len() {
            return;
        }
        self.input_cursor = next_char_boundary(&self.input_buffer, self.input_cursor);
    }
}

fn prev_char_boundary(s: &str, idx: usize) -> usize {
    s[..idx].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(s: &str, idx: usize) -> usize {
    s[idx..]
        .chars()
        .next()
        .map_or(s.len(), |ch| idx + ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tasklist_core::api::{MemoryTaskRepository, TaskService};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    async fn setup(texts: &[&str]) -> (TuiApp, TaskClient<TaskService>) {
        let svc = TaskService::new(Arc::new(MemoryTaskRepository::new()));
        for text in texts {
            svc.create(text).await.unwrap();
        }
        let mut client = TaskClient::new(svc);
        client.load().await.unwrap();
        (TuiApp::new(TuiConfig::default()), client)
    }

    async fn press(app: &mut TuiApp, client: &mut TaskClient<TaskService>, ev: KeyEvent) {
        let action = app.handle_key(ev, client);
        app.perform(action, client).await;
    }

    async fn type_text(app: &mut TuiApp, client: &mut TaskClient<TaskService>, text: &str) {
        for ch in text.chars() {
            press(app, client, key(KeyCode::Char(ch))).await;
        }
    }

    fn visible_texts(client: &TaskClient<TaskService>) -> Vec<String> {
        client.visible().iter().map(|t| t.text.clone()).collect()
    }

    #[tokio::test]
    async fn test_enter_adds_and_clears_input() {
        let (mut app, mut client) = setup(&[]).await;
        type_text(&mut app, &mut client, "buy milk").await;
        assert_eq!(app.input_buffer, "buy milk");

        press(&mut app, &mut client, key(KeyCode::Enter)).await;
        assert_eq!(app.input_buffer, "");
        assert_eq!(app.input_cursor, 0);
        assert_eq!(visible_texts(&client), vec!["buy milk"]);
    }

    #[tokio::test]
    async fn test_blank_enter_keeps_input_and_sends_nothing() {
        let (mut app, mut client) = setup(&[]).await;
        type_text(&mut app, &mut client, "   ").await;
        press(&mut app, &mut client, key(KeyCode::Enter)).await;
        assert_eq!(app.input_buffer, "   ");
        assert!(client.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_ctrl_t_toggles_and_highlight_follows_task() {
        let (mut app, mut client) = setup(&["a", "b"]).await;
        press(&mut app, &mut client, ctrl('t')).await;

        assert_eq!(visible_texts(&client), vec!["b", "a"]);
        assert!(client.visible()[1].completed);
        assert_eq!(app.highlight, 1);
    }

    #[tokio::test]
    async fn test_ctrl_d_deletes_highlighted() {
        let (mut app, mut client) = setup(&["a", "b"]).await;
        press(&mut app, &mut client, key(KeyCode::Down)).await;
        press(&mut app, &mut client, ctrl('d')).await;
        assert_eq!(visible_texts(&client), vec!["a"]);
        assert_eq!(app.highlight, 0);
    }

    #[tokio::test]
    async fn test_menu_hide_completed() {
        let (mut app, mut client) = setup(&["a", "b"]).await;
        press(&mut app, &mut client, ctrl('t')).await;
        press(&mut app, &mut client, ctrl('o')).await;
        assert!(client.view().menu_open());

        // menu keys do not reach the input line
        press(&mut app, &mut client, key(KeyCode::Char('h'))).await;
        assert!(!client.view().menu_open());
        assert!(client.view().hide_completed());
        assert_eq!(visible_texts(&client), vec!["b"]);
        assert_eq!(app.input_buffer, "");
    }

    #[tokio::test]
    async fn test_edit_mode_bulk_delete_flow() {
        let (mut app, mut client) = setup(&["a", "b", "c"]).await;
        press(&mut app, &mut client, ctrl('o')).await;
        press(&mut app, &mut client, key(KeyCode::Char('e'))).await;
        assert!(client.view().is_editing());

        press(&mut app, &mut client, key(KeyCode::Char(' '))).await;
        press(&mut app, &mut client, key(KeyCode::Down)).await;
        press(&mut app, &mut client, key(KeyCode::Down)).await;
        press(&mut app, &mut client, key(KeyCode::Char(' '))).await;
        press(&mut app, &mut client, key(KeyCode::Char('d'))).await;

        assert_eq!(visible_texts(&client), vec!["b"]);
        assert!(client.view().is_editing());
        assert_eq!(app.status, StatusLine::Info("Deleted 2 task(s)".to_string()));

        press(&mut app, &mut client, key(KeyCode::Esc)).await;
        assert!(!client.view().is_editing());
    }

    #[tokio::test]
    async fn test_delete_with_empty_selection_is_noop() {
        let (mut app, mut client) = setup(&["a"]).await;
        client.enter_edit();
        let action = app.handle_key(key(KeyCode::Char('d')), &mut client);
        assert_eq!(action, Action::None);
        assert_eq!(app.status, StatusLine::Info("Nothing selected".to_string()));
    }

    #[tokio::test]
    async fn test_select_all_then_deselect_all() {
        let (mut app, mut client) = setup(&["a", "b"]).await;
        client.enter_edit();
        press(&mut app, &mut client, key(KeyCode::Char('a'))).await;
        assert!(client.all_selected());
        press(&mut app, &mut client, key(KeyCode::Char('a'))).await;
        assert!(client.view().selected().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, mut client) = setup(&[]).await;
        assert_eq!(app.handle_key(ctrl('c'), &mut client), Action::Quit);
        // 'q' is text in normal mode
        assert_eq!(
            app.handle_key(key(KeyCode::Char('q')), &mut client),
            Action::None
        );
        client.enter_edit();
        assert_eq!(
            app.handle_key(key(KeyCode::Char('q')), &mut client),
            Action::Quit
        );
        app.perform(Action::Quit, &mut client).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_highlight_is_clamped() {
        let (mut app, mut client) = setup(&["a"]).await;
        for _ in 0..3 {
            press(&mut app, &mut client, key(KeyCode::Down)).await;
        }
        assert_eq!(app.highlight, 0);
        press(&mut app, &mut client, key(KeyCode::Up)).await;
        assert_eq!(app.highlight, 0);
    }

    #[test]
    fn test_utf8_editing() {
        let mut app = TuiApp::new(TuiConfig::default());
        for ch in "café".chars() {
            app.insert_char(ch);
        }
        app.move_left();
        app.backspace();
        assert_eq!(app.input_buffer, "caé");
        app.move_right();
        assert_eq!(app.input_cursor, app.input_buffer.len());
    }
}
