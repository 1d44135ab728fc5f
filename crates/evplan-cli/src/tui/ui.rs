//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use evplan_core::plan::{EventPlan, TodoStatus, format_inr};
use evplan_core::store::StoreState;

use super::app::{
    App, COMMON_EVENTS, GRID_COLUMNS, InputMode, OTHER_EVENT, POPULAR_SEARCHES, Theme, View,
};

/// Colours for one theme.
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    heading: Color,
    selected_bg: Color,
    money: Color,
    done: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                heading: Color::Magenta,
                selected_bg: Color::LightBlue,
                money: Color::Green,
                done: Color::DarkGray,
            },
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                heading: Color::Yellow,
                selected_bg: Color::DarkGray,
                money: Color::LightGreen,
                done: Color::Gray,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().bg(self.bg).fg(self.fg)
    }

    fn block<'a>(&self, title: impl Into<Line<'a>>) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.muted))
            .title(title)
            .style(self.base())
    }
}

/// Render the current view.
pub fn render(f: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);
    f.render_widget(Block::default().style(palette.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.view {
        View::Home => render_home(f, app, &palette, chunks[0]),
        View::Search => {
            render_home(f, app, &palette, chunks[0]);
            render_search(f, app, &palette, chunks[0]);
        }
        View::Budget => {
            render_home(f, app, &palette, chunks[0]);
            render_budget(f, app, &palette, chunks[0]);
        }
        View::Result => render_result(f, app, &palette, chunks[0]),
        View::Help => render_help(f, &palette, chunks[0]),
    }

    render_status_bar(f, app, &palette, chunks[1]);
}

// -- Home --

fn render_home(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "AI Event Planner",
            Style::default()
                .fg(palette.heading)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Select an event type or search for anything to get a plan, budget and checklist.",
            Style::default().fg(palette.muted),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().style(palette.base()));
    f.render_widget(intro, chunks[0]);

    let tiles: Vec<&str> = COMMON_EVENTS
        .iter()
        .copied()
        .chain(std::iter::once(OTHER_EVENT))
        .collect();
    let rows = tiles.len().div_ceil(GRID_COLUMNS);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(5); rows])
        .split(chunks[1]);

    for (row, row_area) in row_areas.iter().enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);

        for (col, tile_area) in col_areas.iter().enumerate() {
            let index = row * GRID_COLUMNS + col;
            let Some(title) = tiles.get(index) else {
                continue;
            };
            let style = if index == app.selected_tile {
                Style::default()
                    .bg(palette.selected_bg)
                    .fg(palette.fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                palette.base()
            };
            let tile = Paragraph::new(vec![Line::from(""), Line::from(*title)])
                .alignment(Alignment::Center)
                .style(style)
                .block(palette.block(""));
            f.render_widget(tile, *tile_area);
        }
    }
}

// -- Modals --

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_search(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let popup = centered(area, 60, 9);
    f.render_widget(Clear, popup);

    let tags: Vec<Span> = POPULAR_SEARCHES
        .iter()
        .enumerate()
        .flat_map(|(i, tag)| {
            let style = if app.selected_tag == Some(i) {
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            [Span::styled(format!("[{tag}]"), style), Span::raw(" ")]
        })
        .collect();

    let text = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(palette.accent)),
            Span::raw(app.search_input.as_str()),
            Span::styled("_", Style::default().fg(palette.muted)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "POPULAR SEARCHES (Tab)",
            Style::default().fg(palette.muted),
        )),
        Line::from(tags),
    ];

    let modal = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(palette.block(" Search Event Type "));
    f.render_widget(modal, popup);
}

fn render_budget(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let popup = centered(area, 60, 8);
    f.render_widget(Clear, popup);

    let hint = if app.parsed_budget().is_some() {
        Span::styled("Enter: Generate Plan", Style::default().fg(palette.accent))
    } else {
        Span::styled(
            "Enter a budget greater than zero",
            Style::default().fg(palette.muted),
        )
    };

    let text = vec![
        Line::from(vec![
            Span::raw("What is your estimated budget for the "),
            Span::styled(
                app.event_type.as_str(),
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("₹ ", Style::default().fg(palette.money)),
            Span::raw(app.budget_input.as_str()),
            Span::styled("_", Style::default().fg(palette.muted)),
        ]),
        Line::from(""),
        Line::from(hint),
    ];

    let modal = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(palette.block(" Set Your Budget "));
    f.render_widget(modal, popup);
}

// -- Result --

fn render_result(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    match &app.store {
        StoreState::Ready { plan, .. } => render_plan(f, app, plan, palette, area),
        StoreState::Failed(message) => {
            let text = vec![
                Line::from(Span::styled(
                    "Could not generate a plan",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(message.as_str()),
                Line::from(""),
                Line::from(Span::styled(
                    "r: retry   Esc: back",
                    Style::default().fg(palette.muted),
                )),
            ];
            let p = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(palette.block(" Error "));
            f.render_widget(p, area);
        }
        StoreState::Loading { event_type, budget } => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("Generating a plan for {event_type}..."),
                    Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                )),
            ];
            if let Some(b) = budget {
                lines.push(Line::from(format!("with budget {}", format_inr(*b))));
            }
            let p = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(palette.block(" Loading "));
            f.render_widget(p, area);
        }
        StoreState::Idle => {}
    }
}

fn render_plan(f: &mut Frame, app: &App, plan: &EventPlan, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let details_height = if app.details_expanded { 8 } else { 3 };
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(details_height),
        ])
        .split(columns[0]);

    // Overview.
    let overview = Paragraph::new(vec![
        Line::from(Span::styled(
            plan.event_type.as_str(),
            Style::default()
                .fg(palette.heading)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(plan.description.as_str()),
    ])
    .wrap(Wrap { trim: true })
    .block(palette.block(" Overview "));
    f.render_widget(overview, left[0]);

    // Steps.
    let steps: Vec<Line> = plan
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(palette.accent)),
                Span::raw(step.as_str()),
            ])
        })
        .collect();
    let steps = Paragraph::new(steps)
        .wrap(Wrap { trim: true })
        .block(palette.block(" Step-by-Step Guide "));
    f.render_widget(steps, left[1]);

    // Tips.
    let tips_text = match plan.expanded_details.as_deref().filter(|d| !d.is_empty()) {
        None => Line::from(Span::styled("No extra tips.", Style::default().fg(palette.muted))),
        Some(_) if !app.details_expanded => Line::from(Span::styled(
            "e: show tips",
            Style::default().fg(palette.muted),
        )),
        Some(details) => Line::from(details),
    };
    let tips = Paragraph::new(tips_text)
        .wrap(Wrap { trim: true })
        .block(palette.block(" Tips & Hacks "));
    f.render_widget(tips, left[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(columns[1]);

    render_budget_manager(f, app, palette, right[0]);
    render_checklist(f, app, plan, palette, right[1]);
}

fn render_budget_manager(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let label = |s: &'static str| Span::styled(s, Style::default().fg(palette.muted));
    let money = Style::default().fg(palette.money);

    let mut lines = vec![Line::from(vec![
        label("Base estimate   "),
        Span::styled(format_inr(app.store.base_estimate()), money),
    ])];
    if let Some(target) = app.target_budget {
        lines.push(Line::from(vec![
            label("Target budget   "),
            Span::styled(format_inr(target), Style::default().fg(palette.accent)),
        ]));
    }
    let extra = if app.input_mode == InputMode::ExtraBudget {
        Span::styled(
            format!("₹ {}_", app.extra_input),
            Style::default().fg(palette.accent),
        )
    } else {
        Span::styled(format_inr(app.store.extra_budget()), money)
    };
    lines.push(Line::from(vec![label("Extra budget    "), extra]));
    lines.push(Line::from(vec![
        label("Total budget    "),
        Span::styled(
            format_inr(app.store.grand_total()),
            money.add_modifier(Modifier::BOLD),
        ),
    ]));

    let p = Paragraph::new(lines).block(palette.block(" Budget Manager "));
    f.render_widget(p, area);
}

fn render_checklist(f: &mut Frame, app: &App, plan: &EventPlan, palette: &Palette, area: Rect) {
    let header_cells = ["", "Task", "Cost"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(palette.heading)));
    let header = Row::new(header_cells).height(1);

    let rows = plan.todo_list.iter().enumerate().map(|(i, item)| {
        let (mark, text_style) = match item.status {
            TodoStatus::Pending => ("[ ]", Style::default()),
            TodoStatus::Completed => (
                "[x]",
                Style::default()
                    .fg(palette.done)
                    .add_modifier(Modifier::CROSSED_OUT),
            ),
        };
        let style = if i == app.selected_item {
            Style::default()
                .bg(palette.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(mark),
            Cell::from(item.task.clone()).style(text_style),
            Cell::from(format_inr(item.estimated_cost)),
        ])
        .style(style)
    });

    let mut table_rows: Vec<Row> = rows.collect();
    match app.input_mode {
        InputMode::NewTask => table_rows.push(Row::new(vec![
            Cell::from("+"),
            Cell::from(format!("{}_", app.task_input)),
            Cell::from(""),
        ])),
        InputMode::NewCost => table_rows.push(Row::new(vec![
            Cell::from("+"),
            Cell::from(app.task_input.clone()),
            Cell::from(format!("₹ {}_", app.cost_input)),
        ])),
        _ => {}
    }

    let title = format!(
        " Checklist ({}/{} done) ",
        app.store.completed_count(),
        app.store.item_count()
    );
    let table = Table::new(
        table_rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(palette.block(title));

    f.render_widget(table, area);
}

// -- Help / status --

fn render_help(f: &mut Frame, palette: &Palette, area: Rect) {
    let section = |s: &'static str| {
        Line::from(Span::styled(
            s,
            Style::default()
                .fg(palette.heading)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let text = vec![
        Line::from(""),
        section("  Home"),
        Line::from("    h/j/k/l   Move between event tiles"),
        Line::from("    Enter     Choose event (Other Event opens search)"),
        Line::from("    /         Search for any event type"),
        Line::from(""),
        section("  Plan"),
        Line::from("    j/k       Move through the checklist"),
        Line::from("    Space     Toggle completed"),
        Line::from("    d         Delete item"),
        Line::from("    a         Add item (task, then cost)"),
        Line::from("    b         Set extra budget"),
        Line::from("    e         Show/hide tips"),
        Line::from("    r         Retry after an error"),
        Line::from("    Esc/q     Back to home"),
        Line::from(""),
        section("  Other"),
        Line::from("    t         Toggle light/dark theme"),
        Line::from("    ?         Show this help"),
        Line::from("    Ctrl+C    Quit"),
    ];
    let help = Paragraph::new(text).block(palette.block(" Help "));
    f.render_widget(help, area);
}

fn key_hints(app: &App) -> &'static str {
    match (app.view, app.input_mode) {
        (View::Home, _) => "Enter:choose  /:search  t:theme  ?:help  q:quit",
        (View::Search, _) => "type to search  Tab:popular  Enter:select  Esc:cancel",
        (View::Budget, _) => "digits:amount  Enter:generate  Esc:cancel",
        (View::Result, InputMode::NewTask) => "task name  Enter:next  Esc:cancel",
        (View::Result, InputMode::NewCost) => "cost in INR  Enter:add  Esc:cancel",
        (View::Result, InputMode::ExtraBudget) => "extra budget  Enter:done",
        (View::Result, InputMode::Normal) => {
            "Space:toggle  d:delete  a:add  b:budget  e:tips  t:theme  Esc:back"
        }
        (View::Help, _) => "Esc:close",
    }
}

fn render_status_bar(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let view_name = match app.view {
        View::Home => "Home",
        View::Search => "Search",
        View::Budget => "Budget",
        View::Result => "Plan",
        View::Help => "Help",
    };

    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {view_name} "),
            Style::default().bg(palette.accent).fg(palette.bg),
        ),
        Span::raw("  "),
        Span::styled(status_msg, Style::default().fg(palette.money)),
        Span::raw("  "),
        Span::styled(key_hints(app), Style::default().fg(palette.muted)),
    ]);

    f.render_widget(Paragraph::new(bar).style(palette.base()), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use evplan_core::plan::mock_plan;
    use evplan_core::store::Action;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn home_shows_every_tile() {
        let screen = draw(&App::new());
        for title in COMMON_EVENTS {
            assert!(screen.contains(title), "missing tile {title}");
        }
        assert!(screen.contains(OTHER_EVENT));
    }

    #[test]
    fn search_modal_lists_popular_tags() {
        let mut app = App::new();
        app.view = View::Search;
        let screen = draw(&app);
        assert!(screen.contains("Search Event Type"));
        assert!(screen.contains("[Farewell]"));
    }

    #[test]
    fn loading_screen_names_event() {
        let mut app = App::new();
        app.view = View::Result;
        app.dispatch(Action::Requested {
            event_type: "New Year".to_string(),
            budget: None,
        });
        assert!(draw(&app).contains("Generating a plan for New Year"));
    }

    #[test]
    fn result_shows_checklist_and_totals() {
        let mut app = App::new();
        app.view = View::Result;
        app.target_budget = Some(20000.0);
        app.dispatch(Action::Loaded(mock_plan("Birthday Party")));
        app.dispatch(Action::SetExtraBudget("1000".to_string()));

        let screen = draw(&app);
        assert!(screen.contains("Buy Return Gifts"));
        assert!(screen.contains("₹14,000"));
        assert!(screen.contains("₹20,000"));
        assert!(screen.contains("₹15,000"));
        assert!(screen.contains("Checklist (0/6 done)"));
        assert!(screen.contains("e: show tips"));
    }

    #[test]
    fn failure_screen_shows_message() {
        let mut app = App::new();
        app.view = View::Result;
        app.dispatch(Action::LoadFailed("could not reach plan server".to_string()));
        let screen = draw(&app);
        assert!(screen.contains("Could not generate a plan"));
        assert!(screen.contains("could not reach plan server"));
    }

    #[test]
    fn dark_theme_renders() {
        let mut app = App::new();
        app.theme = Theme::Dark;
        assert!(draw(&app).contains("AI Event Planner"));
    }
}
