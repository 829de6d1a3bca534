use anyhow::Context;
use rfo_generator::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    rfo_generator::run(config)
        .await
        .context("HTTP server terminated with an error")
}
