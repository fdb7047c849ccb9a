use anyhow::{Context, Result};
use post_routes::{
    cms::CmsClient,
    config::Config,
    locales::SiteLocales,
    static_params::{generate_static_params, write_params_file},
};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Usage: static-params [OUTPUT_PATH]
///
/// Writes the JSON array of `{slug, locale}` pages to OUTPUT_PATH, or to
/// stdout when no path is given. Any CMS failure aborts with a non-zero exit.
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("post_routes=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let client = CmsClient::new(&config).context("Failed to build CMS client")?;
    let locales = SiteLocales::from_config(&config, &client);

    let params = generate_static_params(&client, &locales).await?;

    match std::env::args().nth(1) {
        Some(path) => {
            write_params_file(&params, Path::new(&path))?;
            info!("✓ Wrote {} static params to {}", params.len(), path);
        }
        None => {
            let json = serde_json::to_string_pretty(&params)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
