//! TUI application state and key handling.
//!
//! Everything here is synchronous and free of I/O. Key handling returns a
//! [`Command`] when the event loop has to go and fetch a plan.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use evplan_core::plan::parse_amount_lenient;
use evplan_core::store::{Action, StoreState, reduce};

/// Event types offered on the home grid. The grid has one more tile,
/// "Other Event", which opens the search view.
pub const COMMON_EVENTS: [&str; 5] = [
    "Birthday Party",
    "School Party",
    "College Party",
    "Music Festival",
    "New Year",
];

pub const OTHER_EVENT: &str = "Other Event";

/// Suggestions shown under the search input.
pub const POPULAR_SEARCHES: [&str; 4] = [
    "Wedding Anniversary",
    "Baby Shower",
    "House Warming",
    "Farewell",
];

/// Home grid width in tiles.
pub const GRID_COLUMNS: usize = 3;
const GRID_TILES: usize = COMMON_EVENTS.len() + 1;

/// Which view the TUI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Search,
    Budget,
    Result,
    Help,
}

/// What typed characters currently edit on the result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    NewTask,
    NewCost,
    ExtraBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Work the event loop must perform on behalf of the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate {
        event_type: String,
        budget: Option<f64>,
    },
}

/// Application state for the TUI.
pub struct App {
    pub view: View,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub selected_tile: usize,
    pub search_input: String,
    pub selected_tag: Option<usize>,
    pub event_type: String,
    pub budget_input: String,
    pub target_budget: Option<f64>,
    pub store: StoreState,
    pub selected_item: usize,
    pub task_input: String,
    pub cost_input: String,
    pub extra_input: String,
    pub details_expanded: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            theme: Theme::default(),
            input_mode: InputMode::Normal,
            selected_tile: 0,
            search_input: String::new(),
            selected_tag: None,
            event_type: String::new(),
            budget_input: String::new(),
            target_budget: None,
            store: StoreState::Idle,
            selected_item: 0,
            task_input: String::new(),
            cost_input: String::new(),
            extra_input: String::new(),
            details_expanded: false,
            status_message: None,
            should_quit: false,
        }
    }

    /// Apply a store action and keep the selection in range.
    pub fn dispatch(&mut self, action: Action) {
        self.store = reduce(&self.store, action);
        let count = self.store.item_count();
        if count == 0 {
            self.selected_item = 0;
        } else if self.selected_item >= count {
            self.selected_item = count - 1;
        }
    }

    /// Whether typed characters currently go into a text field.
    pub fn is_typing(&self) -> bool {
        matches!(self.view, View::Search | View::Budget) || self.input_mode != InputMode::Normal
    }

    /// Budget typed so far, if it is a usable (positive) amount.
    pub fn parsed_budget(&self) -> Option<f64> {
        parse_amount_lenient(&self.budget_input).filter(|b| *b > 0.0)
    }

    pub fn selected_item_id(&self) -> Option<String> {
        self.store
            .plan()
            .and_then(|p| p.todo_list.get(self.selected_item))
            .map(|t| t.id.clone())
    }

    // -- Key handling --

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        self.status_message = None;

        if !self.is_typing() {
            match key.code {
                KeyCode::Char('t') => {
                    self.theme = self.theme.toggled();
                    return None;
                }
                KeyCode::Char('?') => {
                    self.view = View::Help;
                    return None;
                }
                _ => {}
            }
        }

        match self.view {
            View::Home => self.handle_home_key(key),
            View::Search => self.handle_search_key(key),
            View::Budget => self.handle_budget_key(key),
            View::Result => self.handle_result_key(key),
            View::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    self.view = if self.store == StoreState::Idle {
                        View::Home
                    } else {
                        View::Result
                    };
                }
                None
            }
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Right => {
                self.selected_tile = (self.selected_tile + 1) % GRID_TILES;
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.selected_tile = (self.selected_tile + GRID_TILES - 1) % GRID_TILES;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_tile + GRID_COLUMNS < GRID_TILES {
                    self.selected_tile += GRID_COLUMNS;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected_tile >= GRID_COLUMNS {
                    self.selected_tile -= GRID_COLUMNS;
                }
            }
            KeyCode::Char('/') => self.open_search(),
            KeyCode::Enter => match COMMON_EVENTS.get(self.selected_tile) {
                Some(event_type) => self.choose_event(event_type),
                None => self.open_search(),
            },
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => self.view = View::Home,
            KeyCode::Tab => {
                let next = self
                    .selected_tag
                    .map(|i| (i + 1) % POPULAR_SEARCHES.len())
                    .unwrap_or(0);
                self.selected_tag = Some(next);
                self.search_input = POPULAR_SEARCHES[next].to_string();
            }
            KeyCode::Enter => {
                let query = self.search_input.trim().to_string();
                if !query.is_empty() {
                    self.choose_event(&query);
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.selected_tag = None;
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.selected_tag = None;
            }
            _ => {}
        }
        None
    }

    fn handle_budget_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => self.view = View::Home,
            KeyCode::Enter => {
                let budget = self.parsed_budget()?;
                self.target_budget = Some(budget);
                return Some(self.start_generation());
            }
            KeyCode::Backspace => {
                self.budget_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.budget_input.push(c);
            }
            _ => {}
        }
        None
    }

    fn handle_result_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.input_mode {
            InputMode::Normal => {}
            InputMode::NewTask => {
                self.edit_new_task(key);
                return None;
            }
            InputMode::NewCost => {
                self.edit_new_cost(key);
                return None;
            }
            InputMode::ExtraBudget => {
                self.edit_extra_budget(key);
                return None;
            }
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.go_home(),
            KeyCode::Char('j') | KeyCode::Down => {
                let count = self.store.item_count();
                if count > 0 && self.selected_item < count - 1 {
                    self.selected_item += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_item = self.selected_item.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_item_id() {
                    self.dispatch(Action::ToggleStatus(id));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_item_id() {
                    self.dispatch(Action::DeleteItem(id));
                    self.status_message = Some("Item deleted".to_string());
                }
            }
            KeyCode::Char('a') if self.store.plan().is_some() => {
                self.task_input.clear();
                self.cost_input.clear();
                self.input_mode = InputMode::NewTask;
            }
            KeyCode::Char('b') if self.store.plan().is_some() => {
                self.input_mode = InputMode::ExtraBudget;
            }
            KeyCode::Char('e') => self.details_expanded = !self.details_expanded,
            KeyCode::Char('r') if matches!(self.store, StoreState::Failed(_)) => {
                return Some(self.start_generation());
            }
            _ => {}
        }
        None
    }

    fn edit_new_task(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = if self.task_input.trim().is_empty() {
                    InputMode::Normal
                } else {
                    InputMode::NewCost
                };
            }
            KeyCode::Backspace => {
                self.task_input.pop();
            }
            KeyCode::Char(c) => self.task_input.push(c),
            _ => {}
        }
    }

    fn edit_new_cost(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                let task = std::mem::take(&mut self.task_input);
                let cost = std::mem::take(&mut self.cost_input);
                self.dispatch(Action::AddItem { task, cost });
                self.selected_item = self.store.item_count().saturating_sub(1);
                self.input_mode = InputMode::Normal;
                self.status_message = Some("Item added".to_string());
            }
            KeyCode::Backspace => {
                self.cost_input.pop();
            }
            KeyCode::Char(c) => self.cost_input.push(c),
            _ => {}
        }
    }

    fn edit_extra_budget(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                self.extra_input.pop();
            }
            KeyCode::Char(c) => self.extra_input.push(c),
            _ => return,
        }
        self.dispatch(Action::SetExtraBudget(self.extra_input.clone()));
    }

    // -- Navigation --

    fn open_search(&mut self) {
        self.search_input.clear();
        self.selected_tag = None;
        self.view = View::Search;
    }

    fn choose_event(&mut self, event_type: &str) {
        self.event_type = event_type.to_string();
        self.budget_input.clear();
        self.view = View::Budget;
    }

    fn start_generation(&mut self) -> Command {
        self.view = View::Result;
        self.input_mode = InputMode::Normal;
        self.selected_item = 0;
        self.extra_input.clear();
        self.details_expanded = false;
        self.dispatch(Action::Requested {
            event_type: self.event_type.clone(),
            budget: self.target_budget,
        });
        Command::Generate {
            event_type: self.event_type.clone(),
            budget: self.target_budget,
        }
    }

    /// Leave the result view; the plan is discarded.
    pub fn go_home(&mut self) {
        self.dispatch(Action::Cleared);
        self.view = View::Home;
        self.input_mode = InputMode::Normal;
        self.event_type.clear();
        self.target_budget = None;
        self.extra_input.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use evplan_core::plan::{TodoStatus, mock_plan};

    fn press(app: &mut App, code: KeyCode) -> Option<Command> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Drive the app from home to a loaded mock plan for the first tile.
    fn loaded_app() -> App {
        let mut app = App::new();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "5000");
        let cmd = press(&mut app, KeyCode::Enter);
        assert!(cmd.is_some());
        app.dispatch(Action::Loaded(mock_plan("Birthday Party")));
        app
    }

    #[test]
    fn grid_selection_opens_budget_modal() {
        let mut app = App::new();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Budget);
        assert_eq!(app.event_type, "School Party");
    }

    #[test]
    fn grid_navigation_wraps_and_stays_in_bounds() {
        let mut app = App::new();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_tile, GRID_TILES - 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_tile, GRID_TILES - 1);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_tile, 2);
    }

    #[test]
    fn other_event_tile_opens_search() {
        let mut app = App::new();
        app.selected_tile = COMMON_EVENTS.len();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Search);
    }

    #[test]
    fn search_accepts_typed_text_and_popular_tags() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Search, "blank query must not submit");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.search_input, "Baby Shower");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Budget);
        assert_eq!(app.event_type, "Baby Shower");
    }

    #[test]
    fn typing_t_in_search_does_not_toggle_theme() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "tea party");
        assert_eq!(app.theme, Theme::Light);
        assert_eq!(app.search_input, "tea party");
    }

    #[test]
    fn budget_must_be_positive() {
        let mut app = App::new();
        press(&mut app, KeyCode::Enter);
        assert!(press(&mut app, KeyCode::Enter).is_none());
        type_text(&mut app, "0");
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.view, View::Budget);

        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "abc12.5");
        assert_eq!(app.budget_input, "12.5");
        let cmd = press(&mut app, KeyCode::Enter);
        assert_eq!(
            cmd,
            Some(Command::Generate {
                event_type: "Birthday Party".to_string(),
                budget: Some(12.5),
            })
        );
        assert_eq!(app.view, View::Result);
        assert!(app.store.is_loading());
    }

    #[test]
    fn toggle_and_delete_selected_item() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        let plan = app.store.plan().unwrap();
        assert_eq!(plan.todo_list[1].status, TodoStatus::Completed);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.item_count(), 5);
        assert_eq!(app.store.base_estimate(), 12500.0);
    }

    #[test]
    fn selection_clamps_after_deleting_last_item() {
        let mut app = loaded_app();
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected_item, 5);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.selected_item, 4);
    }

    #[test]
    fn add_item_flow() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Rent Chairs");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::NewCost);
        type_text(&mut app, "300");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.store.base_estimate(), 14300.0);
        assert_eq!(app.selected_item, 6);
    }

    #[test]
    fn blank_task_cancels_add() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.store.item_count(), 6);
    }

    #[test]
    fn extra_budget_updates_while_typing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('b'));
        type_text(&mut app, "1000");
        assert_eq!(app.store.grand_total(), 15000.0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.store.grand_total(), 14100.0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn back_discards_plan() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Home);
        assert_eq!(app.store, StoreState::Idle);
        assert_eq!(app.target_budget, None);
    }

    #[test]
    fn retry_only_after_failure() {
        let mut app = loaded_app();
        assert!(press(&mut app, KeyCode::Char('r')).is_none());

        app.dispatch(Action::LoadFailed("API Error".to_string()));
        let cmd = press(&mut app, KeyCode::Char('r'));
        assert!(matches!(cmd, Some(Command::Generate { .. })));
    }

    #[test]
    fn theme_toggles_outside_inputs() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme, Theme::Dark);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme, Theme::Light);
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('/'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
