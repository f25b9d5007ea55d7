// Crop disease identification site backed by Google Gemini.

use crop_doctor::{logging::init_logging, server, SiteConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SiteConfig::from_env()?;
    init_logging(&config.log_level, config.log_json);

    server::serve(config).await
}
