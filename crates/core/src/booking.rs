//! Booking slot record

use serde::{Deserialize, Serialize};

/// Flight-booking slots recovered from a single user turn.
///
/// Every field is optional; an unset field means the recognizer produced
/// nothing usable for that slot. The record itself is always returned,
/// even when every slot is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    /// Destination airport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Origin airport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Travel date as the date portion of a TIMEX expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<String>,
}

impl BookingDetails {
    /// True when no slot was filled
    pub fn is_empty(&self) -> bool {
        self.destination.is_none() && self.origin.is_none() && self.travel_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let details = BookingDetails::default();
        assert!(details.is_empty());
        assert_eq!(details.destination, None);
    }

    #[test]
    fn test_partial_fill() {
        let details = BookingDetails {
            destination: Some("Paris".to_string()),
            ..Default::default()
        };
        assert!(!details.is_empty());
        assert_eq!(details.origin, None);
    }

    #[test]
    fn test_unset_slots_are_skipped_in_json() {
        let details = BookingDetails {
            travel_date: Some("2024-05-01".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, "{\"travel_date\":\"2024-05-01\"}");
    }
}
