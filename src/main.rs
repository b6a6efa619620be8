use std::process::ExitCode;

use shuffle_sender::ShuffleSender;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEMO_UNIQUE_NUMS: i64 = 6;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries only the response JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let sender = ShuffleSender::default();
    let mut stdout = std::io::stdout();
    match sender.print_shuffle(DEMO_UNIQUE_NUMS, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "shuffle request failed");
            ExitCode::FAILURE
        }
    }
}
