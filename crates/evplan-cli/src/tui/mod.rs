//! Interactive terminal client: pick an event, set a budget, edit the plan.

pub mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde_json::json;

use evplan_core::client::PlanClient;
use evplan_core::plan::EventPlan;
use evplan_core::service::PlanService;
use evplan_core::store::Action;

use app::{App, Command};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Where plans come from: a running `evplan serve`, or the handler in-process.
pub enum Fetcher {
    Remote(PlanClient),
    Local(PlanService),
}

impl Fetcher {
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(client) => client.server_url().to_string(),
            Self::Local(_) => "offline".to_string(),
        }
    }

    /// Fetch a plan; the error is the message shown to the user.
    pub async fn fetch(&self, event_type: &str, budget: Option<f64>) -> Result<EventPlan, String> {
        match self {
            Self::Remote(client) => client
                .generate(event_type, budget)
                .await
                .map_err(|e| e.to_string()),
            Self::Local(service) => {
                let mut body = json!({ "eventType": event_type });
                if let Some(b) = budget {
                    body["budget"] = json!(b);
                }
                service.handle(&body).await.map_err(|e| e.to_string())
            }
        }
    }
}

/// Launch the interactive planner.
pub async fn run_planner(fetcher: Fetcher) -> Result<()> {
    tracing::debug!("planner using {}", fetcher.describe());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let result = run_event_loop(&mut terminal, &mut app, &fetcher).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    fetcher: &Fetcher,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(Command::Generate { event_type, budget }) = app.handle_key(key) {
                    // Show the loading frame before blocking on the request.
                    terminal.draw(|f| ui::render(f, app))?;
                    match fetcher.fetch(&event_type, budget).await {
                        Ok(plan) => app.dispatch(Action::Loaded(plan)),
                        Err(message) => {
                            tracing::warn!(%event_type, "plan request failed: {message}");
                            app.dispatch(Action::LoadFailed(message));
                        }
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evplan_core::plan::mock_plan;
    use evplan_core::source::FallbackChain;

    #[tokio::test]
    async fn local_fetcher_uses_handler() {
        let fetcher = Fetcher::Local(PlanService::new(FallbackChain::offline(Duration::ZERO)));
        assert_eq!(fetcher.describe(), "offline");
        let plan = fetcher.fetch("Birthday Party", Some(3000.0)).await.unwrap();
        assert_eq!(plan, mock_plan("Birthday Party"));
    }

    #[tokio::test]
    async fn local_fetcher_reports_validation_errors() {
        let fetcher = Fetcher::Local(PlanService::new(FallbackChain::offline(Duration::ZERO)));
        let err = fetcher.fetch("", None).await.unwrap_err();
        assert_eq!(err, "Missing required field: eventType");
    }

    #[tokio::test]
    async fn remote_fetcher_reports_transport_errors() {
        let client = PlanClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let fetcher = Fetcher::Remote(client);
        let err = fetcher.fetch("Farewell", None).await.unwrap_err();
        assert!(err.contains("could not reach plan server"), "got: {err}");
    }
}
