use std::sync::Arc;

use anyhow::Result;
use studynotes::backend::create_backend;
use studynotes::config::Config;
use studynotes::constants::ERROR_NO_API_KEY;
use studynotes::logger::Logger;
use studynotes::repositories::Repositories;
use studynotes::session::{self, SessionStore};
use studynotes::ui;
use studynotes::view_state::ViewStates;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--generate-config") {
        Config::generate_default_config(Config::get_default_config_path()?)?;
        return Ok(());
    }

    let config = Config::load()?;
    let logger = Logger::from_config(config.logging.enabled)?;

    let sessions = Arc::new(SessionStore::new(config.session.persist)?);
    let backend = match create_backend(&config.backend, sessions.clone()) {
        Ok(backend) => backend,
        Err(e) => {
            if config.backend.api_key().is_none() && config.backend.backend_type == "supabase" {
                eprintln!("{}", ERROR_NO_API_KEY);
                eprintln!("\n💡 To use this app:");
                eprintln!("1. Copy the anon key from your Supabase project settings");
                eprintln!("2. Set it as environment variable: export {}=your_key_here", config.backend.api_key_env);
                eprintln!("3. Run the app again to sign in!");
            } else {
                eprintln!("❌ Error: {}", e);
            }
            return Ok(());
        }
    };

    match session::restore(backend.as_ref(), &sessions).await {
        Ok(true) => logger.log("Startup: restored saved session".to_string()),
        Ok(false) => logger.log("Startup: no saved session".to_string()),
        Err(e) => logger.log(format!("Startup: could not restore session: {}", e)),
    }

    let repositories = Repositories::new(backend, &config.backend, sessions);
    let view_states = ViewStates::new(&repositories);

    // Run the TUI application
    ui::run_app(&config, logger, view_states).await?;

    Ok(())
}
