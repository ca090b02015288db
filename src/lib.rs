pub mod commands;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

use services::config::ConfigService;

/// Loads configuration, binds the listener and serves the document trigger
/// until the process is stopped.
pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ConfigService::from_env()?;
    let settings = config.get_settings();
    log::info!(
        "Loaded settings from {} (templates: {}, image: {})",
        config.config_path().display(),
        settings.template_dir.display(),
        settings.image_path.display()
    );
    if let Some(manifest) = &settings.manifest_path {
        log::info!("Using manifest file {}", manifest.display());
    }

    let listener = tokio::net::TcpListener::bind(settings.bind_address.as_str()).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    let app = commands::router(commands::AppState::new(settings));
    axum::serve(listener, app).await?;
    Ok(())
}
