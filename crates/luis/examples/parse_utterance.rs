//! Interactive booking extraction from the command line
//! Run: cargo run --example parse_utterance
//!
//! Reads utterances from stdin, sends each one to the configured LUIS
//! application and prints the extracted booking slots as JSON.

use std::io::{self, BufRead, Write};

use tokio_util::sync::CancellationToken;

use flightbot_config::load_settings;
use flightbot_core::Turn;
use flightbot_luis::FlightBookingRecognizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("FLIGHTBOT_ENV").ok();
    let settings = load_settings(env.as_deref())?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if !settings.luis.is_configured() {
        anyhow::bail!(
            "LUIS is not configured. Set FLIGHTBOT_LUIS__APP_ID, FLIGHTBOT_LUIS__API_KEY \
             and FLIGHTBOT_LUIS__API_HOST_NAME, or fill in config/default."
        );
    }

    let recognizer = FlightBookingRecognizer::from_settings(&settings.luis)?;
    let cancellation = CancellationToken::new();

    println!("Type an utterance, e.g. \"book a flight from London to Paris on may 1st\".");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        let details = recognizer
            .recognize_booking(&Turn::user(utterance), &cancellation)
            .await;
        println!("{}", serde_json::to_string_pretty(&details)?);
    }

    Ok(())
}
