// Request, response and domain types shared by the booking workflow

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// One priced, bookable unit returned by a supplier search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelOption {
    pub option_code: String,
    pub hotel_code: Option<String>,
    pub flight_code: Option<String>,
    pub arrival_airport: String,
    pub price: f64,
}

impl TravelOption {
    /// Hotel code, ignoring empty strings.
    pub fn hotel(&self) -> Option<&str> {
        self.hotel_code.as_deref().filter(|code| !code.is_empty())
    }

    /// Flight code, ignoring empty strings.
    pub fn flight(&self) -> Option<&str> {
        self.flight_code.as_deref().filter(|code| !code.is_empty())
    }

    pub fn is_hotel_only(&self) -> bool {
        self.hotel().is_some() && self.flight().is_none()
    }

    pub fn is_flight_only(&self) -> bool {
        self.flight().is_some() && self.hotel().is_none()
    }
}

// The ordered options produced by a single search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub options: Vec<TravelOption>,
}

impl SearchResult {
    pub fn new(options: Vec<TravelOption>) -> Self {
        Self { options }
    }

    pub fn find(&self, option_code: &str) -> Option<&TravelOption> {
        self.options.iter().find(|o| o.option_code == option_code)
    }

    pub fn first(&self) -> Option<&TravelOption> {
        self.options.first()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

// Search input. Dates are optional on the wire so a missing date reaches
// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub departure_airport: Option<String>,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
}

impl SearchRequest {
    pub fn new(destination: &str, from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            destination: destination.to_string(),
            departure_airport: None,
            from_date: Some(from_date),
            to_date: Some(to_date),
        }
    }

    pub fn with_departure_airport(mut self, airport: &str) -> Self {
        self.departure_airport = Some(airport.to_string());
        self
    }

    /// Departure airport, treating an empty string as absent.
    pub fn departure(&self) -> Option<&str> {
        self.departure_airport
            .as_deref()
            .filter(|airport| !airport.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    pub option_code: String,
    #[serde(default)]
    pub search_request: Option<SearchRequest>,
}

impl BookRequest {
    pub fn new(option_code: &str, search_request: SearchRequest) -> Self {
        Self {
            option_code: option_code.to_string(),
            search_request: Some(search_request),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusRequest {
    #[serde(default)]
    pub booking_code: String,
}

impl CheckStatusRequest {
    pub fn new(booking_code: &str) -> Self {
        Self {
            booking_code: booking_code.to_string(),
        }
    }
}

// Derived on every status check, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Success,
    Failed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Success => "Success",
            BookingStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

// A confirmed booking attempt held by the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub booking_code: String,
    pub option_code: String,
    pub booked_at: DateTime<Utc>,
    // Rolled once when the booking is created so repeated checks agree
    pub completes_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn is_pending_at(&self, now: DateTime<Utc>) -> bool {
        now < self.completes_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub booking_code: String,
    pub booking_time: DateTime<Utc>,
}

impl From<&BookingRecord> for BookResponse {
    fn from(record: &BookingRecord) -> Self {
        Self {
            booking_code: record.booking_code.clone(),
            booking_time: record.booked_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusResponse {
    pub status: BookingStatus,
}

impl From<BookingStatus> for CheckStatusResponse {
    fn from(status: BookingStatus) -> Self {
        Self { status }
    }
}
