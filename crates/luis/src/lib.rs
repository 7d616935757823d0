//! LUIS recognition for the flight-booking agent
//!
//! Features:
//! - One cancellable prediction request per conversational turn
//! - Normalization of the v2 prediction response into the
//!   [`RecognizerResult`](flightbot_core::RecognizerResult) entity tree
//! - Defensive extraction of the booking slots into
//!   [`BookingDetails`](flightbot_core::BookingDetails), failing open to an
//!   empty record when the service cannot be reached

pub mod application;
pub mod booking;
pub mod normalize;
pub mod recognizer;

pub use application::LuisApplication;
pub use booking::{booking_details, FlightBookingRecognizer, BOOK_FLIGHT_INTENT};
pub use normalize::LuisResult;
pub use recognizer::{LuisOptions, LuisRecognizer, TurnRecognizer};

use thiserror::Error;

/// Recognition errors
#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for RecognizerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RecognizerError::Timeout
        } else {
            RecognizerError::Network(err.to_string())
        }
    }
}
