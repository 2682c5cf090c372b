// Walks through search -> book -> check status against the mock supplier.
// The clock is fast-forwarded between polls instead of sleeping through the
// completion delay.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travel_booking::{
    BookRequest, BookResponse, BookingConfig, BookingLedger, BookingOrchestrator, BookingStatus,
    CheckStatusRequest, CheckStatusResponse, Clock, ManualClock, MockSupplierGateway,
    OptionRegistry, SearchRequest, TravelBookingService,
};

const POLL_INTERVAL_SECS: i64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_booking=debug,booking_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BookingConfig::load().context("failed to load booking config")?;
    tracing::info!(?config, "starting booking demo");

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let service = BookingOrchestrator::new(
        config.clone(),
        Arc::new(MockSupplierGateway::new(&config)),
        clock.clone(),
        Arc::new(OptionRegistry::new()),
        Arc::new(BookingLedger::new(config.max_code_attempts)),
    )?;

    let today = clock.now().date_naive();
    let search = SearchRequest::new(
        "NYC",
        today + Duration::days(60),
        today + Duration::days(67),
    );

    let result = service.search(search.clone()).await?;
    println!("{}", serde_json::to_string_pretty(result.as_ref())?);

    let chosen = result
        .options
        .first()
        .context("supplier returned no options")?;
    let record = service
        .book(BookRequest::new(&chosen.option_code, search))
        .await?;
    println!("{}", serde_json::to_string_pretty(&BookResponse::from(&record))?);

    loop {
        let status = service
            .check_status(CheckStatusRequest::new(&record.booking_code))
            .await?;
        println!(
            "{}",
            serde_json::to_string(&CheckStatusResponse::from(status))?
        );
        if status != BookingStatus::Pending {
            break;
        }
        clock.advance(Duration::seconds(POLL_INTERVAL_SECS));
    }

    Ok(())
}
