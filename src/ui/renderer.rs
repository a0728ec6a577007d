use crate::config::Config;
use crate::logger::Logger;
use crate::ui::app_component::AppComponent;
use crate::ui::core::{Component, EventHandler, EventType};
use crate::view_state::ViewStates;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

/// Async event loop: terminal input on the foreground, remote work in background tasks
pub async fn run_app(config: &Config, logger: Logger, view_states: ViewStates) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initialize application components
    let mut app = AppComponent::new(config, logger.clone(), view_states);
    let mut event_handler = EventHandler::new();

    let result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger.log(format!("Event loop stopped with error: {}", e));
    }
    result
}

async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppComponent,
    event_handler: &mut EventHandler,
) -> anyhow::Result<()> {
    // Draw the first frame before the session check so startup is visible
    terminal.draw(|f| app.render(f, f.area()))?;
    app.start().await;

    let mut needs_render = true;

    loop {
        // Render when needed
        if needs_render {
            terminal.draw(|f| app.render(f, f.area()))?;
            needs_render = false;
        }

        let event_result = event_handler.next_event().await?;

        match event_result {
            EventType::Key(_) | EventType::Resize(_, _) => {
                app.handle_event(event_result);
                needs_render = true;
            }
            EventType::Tick => {
                // Results of background operations arrive on ticks
                let background_actions = app.process_background_actions();
                needs_render = !background_actions.is_empty() || app.is_busy();

                for action in background_actions {
                    app.dispatch(action);
                }
            }
            EventType::Other => {}
        }

        // Check if app wants to quit
        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
