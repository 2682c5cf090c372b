// Travel booking core: search for options, book one, poll until it resolves

pub mod booking_ledger;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod option_registry;
pub mod orchestrator;
pub mod supplier;

// Re-export key types for convenience
pub use booking_ledger::BookingLedger;
pub use clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{BookingConfig, Bounds, ResolutionPolicy, MAX_COMPLETION_DELAY_SECS};
pub use error::{BookingError, ConfigError, LedgerError, SupplierError};
pub use models::{
    BookRequest, BookResponse, BookingRecord, BookingStatus, CheckStatusRequest,
    CheckStatusResponse, SearchRequest, SearchResult, TravelOption,
};
pub use option_registry::OptionRegistry;
pub use orchestrator::{BookingOrchestrator, TravelBookingService};
pub use supplier::{MockSupplierGateway, SearchKind, SupplierGateway, SupplierQuery};
