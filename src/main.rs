use std::time::Duration;

use clap::Parser;
use quizhost::{db::Db, names, router, AppState};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding all persisted data.
    #[arg(long, env, default_value = "database.json")]
    data_file: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Seconds a question counts down before it opens.
    #[arg(long, env, default_value_t = names::DEFAULT_COUNTDOWN_SECS)]
    countdown_secs: u64,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "quizhost=debug,tower_http=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::open(&args.data_file)
        .await?
        .with_countdown(Duration::from_secs(args.countdown_secs));
    let app = router(AppState::new(db));

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    axum::serve(listener, app).await?;

    Ok(())
}
