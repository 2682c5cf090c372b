// Supplier gateway: the external hotel/flight inventory behind every search

use crate::config::{Bounds, BookingConfig};
use crate::error::SupplierError;
use crate::models::{SearchRequest, SearchResult, TravelOption};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use uuid::Uuid;

// How a search is routed to the supplier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKind {
    // Hotel-only search starting within the last-minute window. Same
    // supplier call as HotelOnly for now.
    LastMinuteHotels,
    HotelOnly,
    HotelAndFlight { departure_airport: String },
}

impl SearchKind {
    /// Routes a search: a departure airport means hotel + flight, otherwise
    /// a hotel search that is last-minute when it starts within `window_days`
    /// of `today` (dates already in the past count as last-minute).
    pub fn classify(
        from_date: NaiveDate,
        departure: Option<&str>,
        today: NaiveDate,
        window_days: i64,
    ) -> Self {
        match departure.filter(|airport| !airport.is_empty()) {
            Some(airport) => SearchKind::HotelAndFlight {
                departure_airport: airport.to_string(),
            },
            None if (from_date - today).num_days() <= window_days => SearchKind::LastMinuteHotels,
            None => SearchKind::HotelOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierQuery {
    pub kind: SearchKind,
    pub destination: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl SupplierQuery {
    pub fn from_request(
        request: &SearchRequest,
        from_date: NaiveDate,
        to_date: NaiveDate,
        today: NaiveDate,
        window_days: i64,
    ) -> Self {
        Self {
            kind: SearchKind::classify(from_date, request.departure(), today, window_days),
            destination: request.destination.clone(),
            from_date,
            to_date,
        }
    }
}

#[async_trait]
pub trait SupplierGateway: Send + Sync + 'static {
    async fn fetch_options(&self, query: &SupplierQuery) -> Result<SearchResult, SupplierError>;
}

// Stand-in for the real supplier: synthetic priced options after a
// simulated network round trip
#[derive(Debug, Clone)]
pub struct MockSupplierGateway {
    hotel_count: usize,
    flight_count: usize,
    hotel_prices: Bounds,
    flight_prices: Bounds,
    latency_ms: Bounds,
}

impl MockSupplierGateway {
    pub fn new(config: &BookingConfig) -> Self {
        Self {
            hotel_count: config.hotel_options_per_search,
            flight_count: config.flight_options_per_search,
            hotel_prices: config.hotel_price_range,
            flight_prices: config.flight_price_range,
            latency_ms: config.supplier_latency_ms,
        }
    }

    pub fn with_latency(mut self, latency_ms: Bounds) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    async fn simulate_latency(&self) {
        let delay = self.latency_ms.sample(&mut rand::thread_rng());
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    fn hotels(&self, destination: &str) -> SearchResult {
        let mut rng = rand::thread_rng();
        let options = (1..=self.hotel_count)
            .map(|i| {
                let hotel_code = format!("HOTEL-{}-{}", destination, i);
                TravelOption {
                    option_code: generate_option_code(&hotel_code),
                    hotel_code: Some(hotel_code),
                    flight_code: None,
                    arrival_airport: destination.to_string(),
                    price: self.hotel_prices.sample(&mut rng) as f64,
                }
            })
            .collect();
        SearchResult::new(options)
    }

    fn flights(&self, departure: &str, arrival: &str) -> SearchResult {
        let mut rng = rand::thread_rng();
        let options = (1..=self.flight_count)
            .map(|i| {
                let flight_code = format!("FLIGHT-{}-{}-{}", departure, arrival, i);
                TravelOption {
                    option_code: generate_option_code(&flight_code),
                    hotel_code: None,
                    flight_code: Some(flight_code),
                    arrival_airport: arrival.to_string(),
                    price: self.flight_prices.sample(&mut rng) as f64,
                }
            })
            .collect();
        SearchResult::new(options)
    }
}

impl Default for MockSupplierGateway {
    fn default() -> Self {
        Self::new(&BookingConfig::default())
    }
}

#[async_trait]
impl SupplierGateway for MockSupplierGateway {
    async fn fetch_options(&self, query: &SupplierQuery) -> Result<SearchResult, SupplierError> {
        self.simulate_latency().await;

        let result = match &query.kind {
            SearchKind::LastMinuteHotels | SearchKind::HotelOnly => self.hotels(&query.destination),
            SearchKind::HotelAndFlight { departure_airport } if departure_airport.is_empty() => {
                self.hotels(&query.destination)
            }
            SearchKind::HotelAndFlight { departure_airport } => {
                self.flights(departure_airport, &query.destination)
            }
        };

        tracing::debug!(
            kind = ?query.kind,
            destination = %query.destination,
            options = result.len(),
            "supplier returned options"
        );
        Ok(result)
    }
}

// Product code plus a short random suffix, e.g. HOTEL-NYC-1-3f2a9c1e
pub fn generate_option_code(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(kind: SearchKind) -> SupplierQuery {
        SupplierQuery {
            kind,
            destination: "NYC".to_string(),
            from_date: date(2026, 12, 1),
            to_date: date(2026, 12, 8),
        }
    }

    fn flight_from(airport: &str) -> SearchKind {
        SearchKind::HotelAndFlight {
            departure_airport: airport.to_string(),
        }
    }

    fn gateway() -> MockSupplierGateway {
        MockSupplierGateway::default().with_latency(Bounds::new(0, 0))
    }

    #[test_case(10, None, SearchKind::LastMinuteHotels ; "hotel within window")]
    #[test_case(45, None, SearchKind::LastMinuteHotels ; "hotel on window edge")]
    #[test_case(46, None, SearchKind::HotelOnly ; "hotel beyond window")]
    #[test_case(-3, None, SearchKind::LastMinuteHotels ; "hotel in the past")]
    #[test_case(60, Some(""), SearchKind::HotelOnly ; "empty airport is hotel only")]
    #[test_case(10, Some("LAX"), flight_from("LAX") ; "airport means flight")]
    #[test_case(60, Some("LAX"), flight_from("LAX") ; "airport ignores window")]
    fn test_classify(days_ahead: i64, departure: Option<&str>, expected: SearchKind) {
        let today = date(2026, 10, 18);
        let from_date = today + chrono::Duration::days(days_ahead);
        assert_eq!(SearchKind::classify(from_date, departure, today, 45), expected);
    }

    #[tokio::test]
    async fn test_hotel_search_returns_three_hotels() {
        let result = gateway().fetch_options(&query(SearchKind::HotelOnly)).await.unwrap();

        assert_eq!(result.len(), 3);
        for (i, option) in result.options.iter().enumerate() {
            let hotel_code = format!("HOTEL-NYC-{}", i + 1);
            assert_eq!(option.hotel(), Some(hotel_code.as_str()));
            assert!(option.option_code.starts_with(&hotel_code));
            assert_eq!(option.flight(), None);
            assert_eq!(option.arrival_airport, "NYC");
            assert!((50.0..300.0).contains(&option.price));
        }
    }

    #[tokio::test]
    async fn test_flight_search_returns_two_flights() {
        let kind = SearchKind::HotelAndFlight {
            departure_airport: "LAX".to_string(),
        };
        let result = gateway().fetch_options(&query(kind)).await.unwrap();

        assert_eq!(result.len(), 2);
        for option in &result.options {
            assert!(option.is_flight_only());
            assert!(option.flight().unwrap().starts_with("FLIGHT-LAX-NYC-"));
            assert!((100.0..500.0).contains(&option.price));
        }
    }

    #[tokio::test]
    async fn test_combined_search_without_airport_falls_back_to_hotels() {
        let kind = SearchKind::HotelAndFlight {
            departure_airport: String::new(),
        };
        let result = gateway().fetch_options(&query(kind)).await.unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.options.iter().all(TravelOption::is_hotel_only));
    }

    #[tokio::test]
    async fn test_option_codes_are_unique_across_searches() {
        let gateway = gateway();
        let mut codes = HashSet::new();
        for _ in 0..50 {
            let result = gateway.fetch_options(&query(SearchKind::HotelOnly)).await.unwrap();
            for option in result.options {
                assert!(codes.insert(option.option_code));
            }
        }
        assert_eq!(codes.len(), 150);
    }

    #[tokio::test]
    async fn test_latency_is_simulated() {
        let gateway = MockSupplierGateway::default().with_latency(Bounds::new(50, 50));
        let started = std::time::Instant::now();
        gateway.fetch_options(&query(SearchKind::HotelOnly)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
