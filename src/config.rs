// Static gateway configuration: endpoint, credentials and the office/agency
// identifiers that go into every outbound request.

use std::env;
use std::time::Duration;

use crate::security::Credentials;

// Test-environment endpoint; override with AMADEUS_ENDPOINT for production.
pub const DEFAULT_ENDPOINT: &str = "https://nodeA3.test.webservices.amadeus.com/1ASIWNDC4Z";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub credentials: Credentials,
    // Pseudo city code of the booking office, e.g. "BGWIA07ET"
    pub office_id: String,
    // Numeric IATA id of the selling office
    pub iata_office_id: String,
    // Aggregator org id in the distribution chain
    pub aggregator: String,
    // Owning carrier designator
    pub carrier_code: String,
    pub country_code: String,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    // Configuration for the carrier test environment with the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials: Credentials::new(username, password),
            office_id: "BGWIA07ET".to_string(),
            iata_office_id: "34492776".to_string(),
            aggregator: "ETN".to_string(),
            carrier_code: "IA".to_string(),
            country_code: "IQ".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    // Environment-driven configuration for the demo binary and deployments.
    pub fn from_env() -> Self {
        let username = env::var("AMADEUS_USERNAME").unwrap_or_default();
        let password = env::var("AMADEUS_PASSWORD").unwrap_or_default();
        let mut config = Self::new(username, password);
        if let Ok(endpoint) = env::var("AMADEUS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(office_id) = env::var("AMADEUS_OFFICE_ID") {
            config.office_id = office_id;
        }
        config
    }
}
