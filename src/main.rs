// End-to-end demo against the carrier test environment: shop, then price the
// first returned fare. Credentials come from AMADEUS_USERNAME / AMADEUS_PASSWORD.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use ndc_gateway::{
    FacadeConfig, GatewayConfig, HttpTransport, NdcClient, PaxManifest, SearchCriteria,
    SearchFacade,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env();
    if config.credentials.username().is_empty() {
        anyhow::bail!("set AMADEUS_USERNAME and AMADEUS_PASSWORD first");
    }

    let transport =
        HttpTransport::new(config.request_timeout).context("building HTTP transport")?;
    let facade = SearchFacade::new(NdcClient::new(config, transport), FacadeConfig::default());

    let today = Utc::now().date_naive();
    let criteria = SearchCriteria {
        origin: "BGW".to_string(),
        destination: "IST".to_string(),
        departure_date: today + Duration::days(30),
        return_date: Some(today + Duration::days(37)),
    };
    let manifest = PaxManifest::new(1, 0, 0);

    println!(
        "searching {} -> {} on {}",
        criteria.origin, criteria.destination, criteria.departure_date
    );
    let document = facade.search(&criteria, &manifest).await?;
    println!("{}", serde_json::to_string_pretty(&document)?);

    let first_fare = document
        .result
        .outbound_flights
        .first()
        .and_then(|flight| flight.fares.first());
    if let Some(fare) = first_fare {
        println!("pricing fare {}", fare.fare_key);
        let priced = facade.price(&fare.fare_key).await?;
        match priced.total_amount {
            Some(amount) => println!("confirmed price: {} {}", amount.value, amount.currency),
            None => println!("no total amount in pricing response"),
        }
    } else {
        println!("no fares returned");
    }

    Ok(())
}
