// Booking ledger: every booking made, keyed by its booking code

use crate::error::LedgerError;
use crate::models::BookingRecord;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub const BOOKING_CODE_LEN: usize = 6;

#[derive(Debug)]
pub struct BookingLedger {
    bookings: DashMap<String, BookingRecord>,
    max_code_attempts: u32,
}

impl BookingLedger {
    pub fn new(max_code_attempts: u32) -> Self {
        Self {
            bookings: DashMap::new(),
            max_code_attempts: max_code_attempts.max(1),
        }
    }

    /// Six random characters from `[a-zA-Z0-9]`. Not checked against the
    /// ledger; see `create`.
    pub fn generate_code() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(BOOKING_CODE_LEN)
            .map(char::from)
            .collect()
    }

    pub fn is_valid_code(code: &str) -> bool {
        code.len() == BOOKING_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Stores a new booking against `option_code`, resolving at
    /// `booked_at + completion_delay`.
    pub fn create(
        &self,
        option_code: &str,
        booked_at: DateTime<Utc>,
        completion_delay: Duration,
    ) -> Result<BookingRecord, LedgerError> {
        self.create_with(option_code, booked_at, completion_delay, Self::generate_code)
    }

    // Inserts through the entry API so two racing bookings can never claim
    // the same code.
    fn create_with<F>(
        &self,
        option_code: &str,
        booked_at: DateTime<Utc>,
        completion_delay: Duration,
        mut next_code: F,
    ) -> Result<BookingRecord, LedgerError>
    where
        F: FnMut() -> String,
    {
        for attempt in 1..=self.max_code_attempts {
            let code = next_code();
            match self.bookings.entry(code) {
                Entry::Occupied(occupied) => {
                    tracing::debug!(
                        code = %occupied.key(),
                        attempt,
                        "booking code already issued, regenerating"
                    );
                }
                Entry::Vacant(vacant) => {
                    let record = BookingRecord {
                        booking_code: vacant.key().clone(),
                        option_code: option_code.to_string(),
                        booked_at,
                        completes_at: booked_at + completion_delay,
                    };
                    vacant.insert(record.clone());
                    tracing::debug!(
                        booking_code = %record.booking_code,
                        option_code,
                        completes_at = %record.completes_at,
                        "booking recorded"
                    );
                    return Ok(record);
                }
            }
        }

        Err(LedgerError::CodeSpaceExhausted {
            attempts: self.max_code_attempts,
        })
    }

    pub fn get(&self, booking_code: &str) -> Option<BookingRecord> {
        self.bookings
            .get(booking_code)
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new(10)
    }
}
