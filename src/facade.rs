// REST-facing façade over the client: caches normalized search results,
// remembers which offer a fare key came from, and serves price/book calls
// against those remembered tokens. The core below never sees cache state.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::client::{GatewayError, NdcClient};
use crate::model::{
    NormalizedSearch, OfferSelection, OrderRequest, Passenger, PaxManifest, SearchCriteria,
};
use crate::response::{OfferPriceRs, OrderCreateRs};
use crate::transport::SoapTransport;

#[derive(Debug, Clone)]
pub struct FacadeConfig {
    pub result_ttl: Duration,
    pub token_ttl: Duration,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            result_ttl: Duration::from_secs(300),
            token_ttl: Duration::from_secs(1200),
        }
    }
}

// Audit block attached to every façade response.
#[derive(Debug, Clone, Serialize)]
pub struct Audit {
    pub reference: String,
    pub service: String,
    pub timestamp: String,
}

impl Audit {
    fn new(service: &str) -> Self {
        Self {
            reference: Uuid::new_v4().to_string(),
            service: service.to_string(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchDocument {
    pub audit: Audit,
    pub result: NormalizedSearch,
}

// What a fare key resolves to once its search response has been normalized.
#[derive(Debug, Clone)]
struct OfferToken {
    selection: OfferSelection,
    currency: String,
    total: f64,
}

pub struct SearchFacade<T: SoapTransport> {
    client: NdcClient<T>,
    results: TtlCache<NormalizedSearch>,
    offer_tokens: TtlCache<OfferToken>,
}

impl<T: SoapTransport> SearchFacade<T> {
    pub fn new(client: NdcClient<T>, config: FacadeConfig) -> Self {
        Self {
            client,
            results: TtlCache::new(config.result_ttl),
            offer_tokens: TtlCache::new(config.token_ttl),
        }
    }

    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        manifest: &PaxManifest,
    ) -> Result<SearchDocument, GatewayError> {
        let key = search_key(criteria, manifest);
        if let Some(cached) = self.results.get(&key) {
            debug!(%key, "serving search from cache");
            return Ok(SearchDocument {
                audit: Audit::new("search"),
                result: cached,
            });
        }

        let result = self.client.search(criteria, manifest).await?;
        self.remember_offers(&result);
        self.results.insert(key, result.clone(), None);

        Ok(SearchDocument {
            audit: Audit::new("search"),
            result,
        })
    }

    // Prices a fare from a previous search without re-shopping.
    pub async fn price(&self, fare_key: &str) -> Result<OfferPriceRs, GatewayError> {
        let token = self
            .offer_tokens
            .get(fare_key)
            .ok_or_else(|| GatewayError::UnknownFareKey(fare_key.to_string()))?;
        self.client
            .offer_price(&token.selection, &PaxManifest::new(1, 0, 0))
            .await
    }

    pub async fn book(
        &self,
        fare_key: &str,
        passenger: Passenger,
    ) -> Result<OrderCreateRs, GatewayError> {
        let token = self
            .offer_tokens
            .get(fare_key)
            .ok_or_else(|| GatewayError::UnknownFareKey(fare_key.to_string()))?;

        let order = OrderRequest {
            selection: token.selection,
            passenger,
            total_amount: token.total,
            currency: token.currency,
        };
        self.client.order_create(&order).await
    }

    // Warms the result cache for the given searches; returns how many
    // completed successfully.
    pub async fn prefetch(&self, searches: &[(SearchCriteria, PaxManifest)]) -> usize {
        let tasks = searches
            .iter()
            .map(|(criteria, manifest)| self.search(criteria, manifest));
        futures::future::join_all(tasks)
            .await
            .into_iter()
            .filter(Result::is_ok)
            .count()
    }

    pub fn cache_stats(&self) -> (crate::cache::CacheStatsReport, crate::cache::CacheStatsReport) {
        (self.results.stats(), self.offer_tokens.stats())
    }

    fn remember_offers(&self, result: &NormalizedSearch) {
        let flights = result
            .outbound_flights
            .iter()
            .chain(result.inbound_flights.iter());
        for flight in flights {
            for fare in &flight.fares {
                if let Some(offer) = &fare.offer {
                    self.offer_tokens.insert(
                        fare.fare_key.clone(),
                        OfferToken {
                            selection: OfferSelection {
                                offer_id: offer.offer_id.clone(),
                                offer_item_id: offer.offer_item_id.clone(),
                            },
                            currency: fare.currency.clone(),
                            total: fare.price.total,
                        },
                        None,
                    );
                }
            }
        }
    }
}

fn search_key(criteria: &SearchCriteria, manifest: &PaxManifest) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        criteria.origin,
        criteria.destination,
        criteria.departure_date,
        criteria
            .return_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "oneway".to_string()),
        manifest.signature()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::transport::testing::ScriptedTransport;
    use chrono::NaiveDate;
    use std::sync::Arc;

    const SHOPPING_RESPONSE_XML: &str = r#"
    <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
      <soap:Body>
        <ns4:IATA_AirShoppingRS xmlns:ns4="http://www.iata.org/IATA/2015/EASD/00/IATA_OffersAndOrdersMessage">
          <ns4:Response>
            <DataLists>
              <DatedMarketingSegmentList>
                <DatedMarketingSegment>
                  <DatedMarketingSegmentId>SEG1</DatedMarketingSegmentId>
                  <CarrierDesigCode>IA</CarrierDesigCode>
                  <MarketingCarrierFlightNumberText>238</MarketingCarrierFlightNumberText>
                  <Dep>
                    <IATA_LocationCode>EBL</IATA_LocationCode>
                    <AircraftScheduledDateTime>2024-02-15T08:00:00</AircraftScheduledDateTime>
                  </Dep>
                  <Arrival>
                    <IATA_LocationCode>DXB</IATA_LocationCode>
                    <AircraftScheduledDateTime>2024-02-15T10:30:00</AircraftScheduledDateTime>
                  </Arrival>
                </DatedMarketingSegment>
              </DatedMarketingSegmentList>
              <PaxSegmentList>
                <PaxSegment>
                  <PaxSegmentID>PS1</PaxSegmentID>
                  <DatedMarketingSegmentRefId>SEG1</DatedMarketingSegmentRefId>
                </PaxSegment>
              </PaxSegmentList>
              <PaxJourneyList>
                <PaxJourney>
                  <PaxJourneyID>J1</PaxJourneyID>
                  <PaxSegmentRefID>PS1</PaxSegmentRefID>
                </PaxJourney>
              </PaxJourneyList>
            </DataLists>
            <OffersGroup>
              <CarrierOffers>
                <Offer>
                  <OfferID>OFFER-1</OfferID>
                  <OfferItem>
                    <OfferItemID>ITEM-1</OfferItemID>
                    <Price>
                      <TotalAmount CurCode="USD">150.00</TotalAmount>
                      <BaseAmount CurCode="USD">120.00</BaseAmount>
                      <TaxSummary>
                        <TotalTaxAmount CurCode="USD">30.00</TotalTaxAmount>
                      </TaxSummary>
                    </Price>
                    <Service>
                      <OfferServiceAssociation>
                        <PaxJourneyRef>
                          <PaxJourneyRefID>J1</PaxJourneyRefID>
                        </PaxJourneyRef>
                      </OfferServiceAssociation>
                    </Service>
                  </OfferItem>
                </Offer>
              </CarrierOffers>
            </OffersGroup>
          </ns4:Response>
        </ns4:IATA_AirShoppingRS>
      </soap:Body>
    </soap:Envelope>"#;

    const OFFER_PRICE_XML: &str = r#"<Envelope><Body>
        <IATA_OfferPriceRS>
          <TotalAmount CurCode="USD">150.00</TotalAmount>
        </IATA_OfferPriceRS>
      </Body></Envelope>"#;

    const ORDER_CREATE_XML: &str = r#"<Envelope><Body>
        <IATA_OrderCreateRS>
          <Order><OrderID>ORD-42</OrderID></Order>
        </IATA_OrderCreateRS>
      </Body></Envelope>"#;

    fn facade(transport: Arc<ScriptedTransport>) -> SearchFacade<Arc<ScriptedTransport>> {
        let client = NdcClient::new(GatewayConfig::new("WSUSER", "secret"), transport);
        SearchFacade::new(client, FacadeConfig::default())
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            origin: "EBL".to_string(),
            destination: "DXB".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            return_date: None,
        }
    }

    fn passenger() -> Passenger {
        Passenger {
            given_name: "Ahmed".to_string(),
            surname: "Al-Zahra".to_string(),
            email: "ahmed@example.com".to_string(),
            phone: "+964123456789".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender_code: "M".to_string(),
            title: "MR".to_string(),
            document_id: "0123456789".to_string(),
            document_expiry: NaiveDate::from_ymd_opt(2030, 8, 13).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_repeat_search_is_served_from_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(SHOPPING_RESPONSE_XML);
        let facade = facade(transport.clone());
        let manifest = PaxManifest::new(1, 0, 0);

        let first = facade.search(&criteria(), &manifest).await.unwrap();
        let second = facade.search(&criteria(), &manifest).await.unwrap();

        // One scripted response, two successful answers.
        assert_eq!(transport.sent_count(), 1);
        assert_eq!(first.result.outbound_flights.len(), 1);
        assert_eq!(second.result.outbound_flights.len(), 1);
        // Audit blocks are per response even on cache hits.
        assert_ne!(first.audit.reference, second.audit.reference);

        let (results, _) = facade.cache_stats();
        assert_eq!(results.hits, 1);
        assert_eq!(results.misses, 1);
    }

    #[tokio::test]
    async fn test_different_manifest_misses_the_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(SHOPPING_RESPONSE_XML);
        transport.push_response(SHOPPING_RESPONSE_XML);
        let facade = facade(transport.clone());

        facade
            .search(&criteria(), &PaxManifest::new(1, 0, 0))
            .await
            .unwrap();
        facade
            .search(&criteria(), &PaxManifest::new(2, 0, 0))
            .await
            .unwrap();

        assert_eq!(transport.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_price_resolves_fare_key_to_offer() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(SHOPPING_RESPONSE_XML);
        transport.push_response(OFFER_PRICE_XML);
        let facade = facade(transport.clone());

        let document = facade
            .search(&criteria(), &PaxManifest::new(1, 0, 0))
            .await
            .unwrap();
        let fare_key = document.result.outbound_flights[0].fares[0]
            .fare_key
            .clone();

        let priced = facade.price(&fare_key).await.unwrap();
        assert_eq!(priced.total_amount.unwrap().value, "150.00");

        // The price request referenced the cached offer ids.
        let sent = transport.sent();
        assert!(sent[1].envelope.contains("<cns:OfferRefID>OFFER-1</cns:OfferRefID>"));
        assert!(sent[1]
            .envelope
            .contains("<cns:OfferItemRefID>ITEM-1</cns:OfferItemRefID>"));
    }

    #[tokio::test]
    async fn test_book_uses_remembered_amount_and_currency() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(SHOPPING_RESPONSE_XML);
        transport.push_response(ORDER_CREATE_XML);
        let facade = facade(transport.clone());

        let document = facade
            .search(&criteria(), &PaxManifest::new(1, 0, 0))
            .await
            .unwrap();
        let fare_key = document.result.outbound_flights[0].fares[0]
            .fare_key
            .clone();

        let order = facade.book(&fare_key, passenger()).await.unwrap();
        assert_eq!(order.order.unwrap().id, "ORD-42");

        let sent = transport.sent();
        assert!(sent[1]
            .envelope
            .contains("<cns:Amount CurCode=\"USD\">150.00</cns:Amount>"));
    }

    #[test]
    fn test_unknown_fare_key_is_rejected_without_io() {
        let transport = Arc::new(ScriptedTransport::new());
        let facade = facade(transport.clone());
        let error = tokio_test::block_on(facade.price("no-such-key")).unwrap_err();
        assert!(matches!(error, GatewayError::UnknownFareKey(_)));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_prefetch_warms_the_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(SHOPPING_RESPONSE_XML);
        let facade = facade(transport.clone());
        let searches = vec![(criteria(), PaxManifest::new(1, 0, 0))];

        assert_eq!(facade.prefetch(&searches).await, 1);
        // Now served from cache without another transport call.
        facade
            .search(&criteria(), &PaxManifest::new(1, 0, 0))
            .await
            .unwrap();
        assert_eq!(transport.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_search_document_serializes_to_json() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_response(SHOPPING_RESPONSE_XML);
        let facade = facade(transport.clone());

        let document = facade
            .search(&criteria(), &PaxManifest::new(1, 0, 0))
            .await
            .unwrap();
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["result"]["outbound_flights"][0]["direction"], "outbound");
        assert_eq!(
            json["result"]["outbound_flights"][0]["fares"][0]["pax_fares"][0]["pax_type"],
            "ADULT"
        );
        assert!(json["audit"]["reference"].is_string());
    }
}
