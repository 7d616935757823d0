//! Booking slot extraction from recognition results
//!
//! Extraction never fails: any missing branch, unexpected shape, or wrong
//! intent yields unset slots. Prompting for the missing values is the
//! caller's concern.

use tokio_util::sync::CancellationToken;

use flightbot_config::LuisSettings;
use flightbot_core::{BookingDetails, RecognizerResult, Turn};

use crate::recognizer::{LuisRecognizer, TurnRecognizer};
use crate::RecognizerError;

/// Intent gating slot extraction
pub const BOOK_FLIGHT_INTENT: &str = "Book_flight";

const TO_GROUP: &str = "To";
const FROM_GROUP: &str = "From";
const AIRPORT_GROUP: &str = "Airport";
const DATETIME_GROUP: &str = "datetime";
const TIMEX_PROPERTY: &str = "timex";
const TEXT_PROPERTY: &str = "text";

/// Extract booking slots from a recognition result.
///
/// Slots are populated only when the top intent is [`BOOK_FLIGHT_INTENT`].
/// Cities prefer the canonical airport name resolved inside the `To` and
/// `From` composites and fall back to the raw matched text from the
/// `$instance` branch. The travel date keeps only the date portion of the
/// first TIMEX expression.
pub fn booking_details(result: &RecognizerResult) -> BookingDetails {
    if result.top_scoring_intent().map(|(name, _)| name) != Some(BOOK_FLIGHT_INTENT) {
        return BookingDetails::default();
    }

    BookingDetails {
        destination: airport(result, TO_GROUP)
            .or_else(|| result.entity_value(TO_GROUP, TEXT_PROPERTY)),
        origin: airport(result, FROM_GROUP)
            .or_else(|| result.entity_value(FROM_GROUP, TEXT_PROPERTY)),
        travel_date: travel_date(result),
    }
}

/// Canonical airport name from a composite city group:
/// first occurrence of the group, first `Airport` child, first resolved value.
fn airport(result: &RecognizerResult, group: &str) -> Option<String> {
    result
        .first_entity(group)?
        .get(AIRPORT_GROUP)?
        .get(0)?
        .get(0)?
        .as_str()
        .map(str::to_string)
}

fn travel_date(result: &RecognizerResult) -> Option<String> {
    result
        .first_entity(DATETIME_GROUP)?
        .get(TIMEX_PROPERTY)?
        .get(0)?
        .as_str()
        .map(date_portion)
}

/// TIMEX date-time expressions carry the time after a `T` separator.
fn date_portion(timex: &str) -> String {
    match timex.find('T') {
        Some(index) => timex[..index].to_string(),
        None => timex.to_string(),
    }
}

/// Recognizer front door for the booking dialog.
///
/// Wraps a [`TurnRecognizer`] and maps every outcome to [`BookingDetails`]:
/// recognition errors are logged once and come back as unset slots, keeping
/// the dialog alive when the service is down or misconfigured.
pub struct FlightBookingRecognizer<R = LuisRecognizer> {
    recognizer: R,
}

impl FlightBookingRecognizer<LuisRecognizer> {
    pub fn from_settings(settings: &LuisSettings) -> Result<Self, RecognizerError> {
        Ok(Self::new(LuisRecognizer::from_settings(settings)?))
    }
}

impl<R: TurnRecognizer> FlightBookingRecognizer<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    pub async fn recognize_booking(
        &self,
        turn: &Turn,
        cancellation: &CancellationToken,
    ) -> BookingDetails {
        match self.recognizer.recognize(turn, cancellation).await {
            Ok(result) => booking_details(&result),
            Err(error) => {
                tracing::warn!(
                    "LUIS recognition failed: {}. Check your LUIS configuration.",
                    error
                );
                BookingDetails::default()
            }
        }
    }
}
