use anyhow::Result;
use caption_server::{
    models::ModelParams,
    server::{router, AppState},
    CaptionModel,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Image caption HTTP service", long_about = None)]
struct Args {
    /// Port to run the server on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Captioning model to use
    #[arg(short, long, default_value = "gemini-2.5-flash")]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let state = match CaptionModel::from_env(args.model.as_str()) {
        Ok(model) => AppState::new(model),
        Err(_) => {
            warn!("GOOGLE_API_KEY not set; requests must supply an x-api-key header");
            AppState::without_server_key(ModelParams::builder().model(args.model.as_str()).build())
        }
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, model = %args.model, "caption server listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
