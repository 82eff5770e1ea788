//! Full-screen terminal front-end for both modes.
//!
//! Rendering and key handling live in [`app`] and [`render`]; this module owns
//! the terminal and turns [`app::Action`]s into use-case calls, one at a time.

pub mod app;
pub mod render;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use crate::connector::api::{Container, ContainerConfig};
use crate::domain::DomainError;

use app::{Action, App};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(config: ContainerConfig) -> Result<()> {
    let mut terminal = init_terminal()?;
    let result = run_app(&mut terminal, config).await;
    restore_terminal(terminal)?;
    result
}

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(mut terminal: Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Term, config: ContainerConfig) -> Result<()> {
    let needs_credential = !config.mock && !config.has_api_key();
    let mut app = App::new(needs_credential);
    let mut container = None;

    if !needs_credential {
        container = connect(terminal, &mut app, config.clone()).await?;
    }

    loop {
        terminal.draw(|f| render::draw(f, &app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => break,
            Action::SubmitCredential(api_key) => {
                container =
                    connect(terminal, &mut app, config.clone().with_api_key(api_key)).await?;
            }
            action => {
                if let Some(container) = container.as_ref() {
                    busy(terminal, &mut app)?;
                    perform(container, &mut app, action).await;
                    app.busy = false;
                }
            }
        }
    }

    info!("Terminal UI closed");
    Ok(())
}

/// Build the container for a credential and load the model list.
async fn connect(
    terminal: &mut Term,
    app: &mut App,
    config: ContainerConfig,
) -> Result<Option<Container>> {
    let container = match Container::new(config) {
        Ok(container) => container,
        Err(e) => {
            app.error(e.to_string());
            return Ok(None);
        }
    };

    busy(terminal, app)?;
    let catalog = container
        .list_models_use_case()
        .execute(container.credential())
        .await;
    app.busy = false;
    app.set_catalog(catalog);

    Ok(Some(container))
}

fn busy(terminal: &mut Term, app: &mut App) -> Result<()> {
    app.busy = true;
    terminal.draw(|f| render::draw(f, app))?;
    Ok(())
}

async fn perform(container: &Container, app: &mut App, action: Action) {
    match action {
        Action::SubmitTest { prompt, selection } => {
            let use_case = container.prompt_testing_use_case().with_progress(false);
            match use_case.execute(&prompt, &selection).await {
                Ok(result) => app.show_test_result(&result),
                Err(e) => report(app, e),
            }
        }
        Action::SendChat {
            message,
            model,
            use_reflection,
        } => {
            let use_case = container.chat_use_case();
            match use_case
                .send(&app.session_id, &message, &model, use_reflection)
                .await
            {
                Ok(reply) => {
                    let history = use_case.history(&app.session_id).await;
                    app.show_transcript(history.turns().to_vec());
                    match reply.reflection_error {
                        Some(e) => app.warn(format!(
                            "Reflection failed, kept the original response. {}",
                            e.display_text()
                        )),
                        None => app.status = None,
                    }
                }
                Err(e) => report(app, e),
            }
        }
        Action::ClearChat => {
            container.chat_use_case().clear(&app.session_id).await;
            app.show_transcript(Vec::new());
            app.info("Conversation cleared.");
        }
        Action::None | Action::Quit | Action::SubmitCredential(_) => {}
    }
}

fn report(app: &mut App, e: DomainError) {
    match e {
        DomainError::InvalidInput(msg) => app.error(msg),
        other => {
            error!("Action failed: {}", other);
            app.error(other.to_string());
        }
    }
}
