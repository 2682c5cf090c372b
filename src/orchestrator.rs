// Booking orchestrator: search, book and status resolution over the
// shared option registry and booking ledger

use crate::booking_ledger::BookingLedger;
use crate::clock::{Clock, SystemClock};
use crate::config::{BookingConfig, ResolutionPolicy};
use crate::error::{BookingError, ConfigError, SupplierError};
use crate::models::{
    BookRequest, BookingRecord, BookingStatus, CheckStatusRequest, SearchRequest, SearchResult,
    TravelOption,
};
use crate::option_registry::OptionRegistry;
use crate::supplier::{MockSupplierGateway, SupplierGateway, SupplierQuery};
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const INVALID_SEARCH_REQUEST: &str = "Invalid search request.";
pub const INVALID_BOOK_REQUEST: &str = "Invalid book request.";
pub const UNKNOWN_OPTION_CODE: &str =
    "Invalid OptionCode. Please search again to get a valid OptionCode.";
pub const INVALID_CHECK_STATUS_REQUEST: &str = "Invalid check status request.";

// The three operations exposed to a transport layer
#[async_trait]
pub trait TravelBookingService: Send + Sync + 'static {
    async fn search(&self, request: SearchRequest) -> Result<Arc<SearchResult>, BookingError>;

    async fn book(&self, request: BookRequest) -> Result<BookingRecord, BookingError>;

    // Unknown bookings resolve to Failed; only an empty code is an error
    async fn check_status(
        &self,
        request: CheckStatusRequest,
    ) -> Result<BookingStatus, BookingError>;
}

pub struct BookingOrchestrator {
    config: BookingConfig,
    supplier: Arc<dyn SupplierGateway>,
    clock: Arc<dyn Clock>,
    options: Arc<OptionRegistry>,
    bookings: Arc<BookingLedger>,
}

impl BookingOrchestrator {
    /// Fails when `config` does not pass `BookingConfig::validate`.
    pub fn new(
        config: BookingConfig,
        supplier: Arc<dyn SupplierGateway>,
        clock: Arc<dyn Clock>,
        options: Arc<OptionRegistry>,
        bookings: Arc<BookingLedger>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            supplier,
            clock,
            options,
            bookings,
        })
    }

    /// Mock supplier, system clock and fresh in-memory state.
    pub fn with_defaults(config: BookingConfig) -> Result<Self, ConfigError> {
        let supplier = Arc::new(MockSupplierGateway::new(&config));
        let bookings = Arc::new(BookingLedger::new(config.max_code_attempts));
        Self::new(
            config,
            supplier,
            Arc::new(SystemClock),
            Arc::new(OptionRegistry::new()),
            bookings,
        )
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    pub fn bookings(&self) -> &BookingLedger {
        &self.bookings
    }

    fn roll_completion_delay(&self) -> chrono::Duration {
        let secs = self
            .config
            .completion_delay_secs
            .sample(&mut rand::thread_rng());
        chrono::Duration::seconds(secs as i64)
    }

    async fn fetch_from_supplier(
        &self,
        query: &SupplierQuery,
    ) -> Result<SearchResult, SupplierError> {
        let timeout_ms = self.config.supplier_timeout_ms;
        let call = self.supplier.fetch_options(query);
        match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
            Ok(result) => result,
            Err(_) => Err(SupplierError::Timeout(timeout_ms)),
        }
    }

    // Option whose codes decide the outcome of a booking, per the configured policy
    fn resolving_option(&self, record: &BookingRecord) -> Option<TravelOption> {
        match self.config.resolution_policy {
            ResolutionPolicy::BookedOption => self.options.find_option(&record.option_code),
            ResolutionPolicy::FirstOptionOfSearch => self
                .options
                .lookup(&record.option_code)
                .and_then(|result| result.first().cloned()),
        }
    }
}

/// Outcome of a booking whose completion delay has elapsed: any flight or
/// hotel product succeeds, an empty option or a missing one fails.
pub fn resolve_outcome(option: Option<&TravelOption>) -> BookingStatus {
    match option {
        Some(option) if option.flight().is_some() => BookingStatus::Success,
        Some(option) if option.hotel().is_some() => BookingStatus::Success,
        Some(_) | None => BookingStatus::Failed,
    }
}

#[async_trait]
impl TravelBookingService for BookingOrchestrator {
    #[tracing::instrument(skip(self, request), fields(destination = %request.destination))]
    async fn search(&self, request: SearchRequest) -> Result<Arc<SearchResult>, BookingError> {
        let (from_date, to_date) = match (request.from_date, request.to_date) {
            (Some(from), Some(to)) if !request.destination.is_empty() => (from, to),
            _ => {
                tracing::warn!("rejected search request");
                return Err(BookingError::invalid(INVALID_SEARCH_REQUEST));
            }
        };

        let today = self.clock.now().date_naive();
        let query = SupplierQuery::from_request(
            &request,
            from_date,
            to_date,
            today,
            self.config.last_minute_window_days,
        );

        // No registry lock is held across this await
        let result = self
            .fetch_from_supplier(&query)
            .await
            .with_context(|| format!("supplier search failed for {:?}", query.kind))?;

        let result = Arc::new(result);
        self.options.record(Arc::clone(&result));

        tracing::info!(kind = ?query.kind, options = result.len(), "search completed");
        Ok(result)
    }

    #[tracing::instrument(skip(self, request), fields(option_code = %request.option_code))]
    async fn book(&self, request: BookRequest) -> Result<BookingRecord, BookingError> {
        if request.option_code.is_empty() || request.search_request.is_none() {
            tracing::warn!("rejected book request");
            return Err(BookingError::invalid(INVALID_BOOK_REQUEST));
        }

        if !self.options.contains(&request.option_code) {
            tracing::warn!("booking refers to an unknown option");
            return Err(BookingError::invalid(UNKNOWN_OPTION_CODE));
        }

        let record = self
            .bookings
            .create(
                &request.option_code,
                self.clock.now(),
                self.roll_completion_delay(),
            )
            .context("could not record booking")?;

        tracing::info!(booking_code = %record.booking_code, "booking created");
        Ok(record)
    }

    #[tracing::instrument(skip(self, request), fields(booking_code = %request.booking_code))]
    async fn check_status(
        &self,
        request: CheckStatusRequest,
    ) -> Result<BookingStatus, BookingError> {
        if request.booking_code.is_empty() {
            tracing::warn!("rejected check status request");
            return Err(BookingError::invalid(INVALID_CHECK_STATUS_REQUEST));
        }

        let status = match self.bookings.get(&request.booking_code) {
            None => BookingStatus::Failed,
            Some(record) if record.is_pending_at(self.clock.now()) => BookingStatus::Pending,
            Some(record) => resolve_outcome(self.resolving_option(&record).as_ref()),
        };

        tracing::debug!(%status, "status resolved");
        Ok(status)
    }
}
