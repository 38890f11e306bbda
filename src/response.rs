// Typed view of the SOAP replies. Carriers prefix elements with varying
// namespace aliases (ns4:, n1:, soap:, env:, ...), so the raw payload is
// first rewritten to local names and then deserialized with serde.

use quick_xml::de::from_str;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("XML read error: {0}")]
    XmlRead(String),

    #[error("XML decode error: {0}")]
    XmlDecode(String),
}

// --- Envelope --------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SoapEnvelope {
    #[serde(rename = "Body")]
    pub body: SoapBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SoapBody {
    #[serde(rename = "Fault")]
    pub fault: Option<SoapFault>,
    #[serde(rename = "IATA_AirShoppingRS")]
    pub air_shopping: Option<AirShoppingRs>,
    #[serde(rename = "IATA_OfferPriceRS")]
    pub offer_price: Option<OfferPriceRs>,
    #[serde(rename = "IATA_OrderCreateRS")]
    pub order_create: Option<OrderCreateRs>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SoapFault {
    #[serde(rename = "faultcode")]
    pub code: String,
    #[serde(rename = "faultstring")]
    pub message: String,
}

// --- AirShopping -----------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AirShoppingRs {
    #[serde(rename = "Response")]
    pub response: ShoppingResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShoppingResponse {
    #[serde(rename = "DataLists")]
    pub data_lists: DataLists,
    #[serde(rename = "OffersGroup")]
    pub offers_group: OffersGroup,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DataLists {
    #[serde(rename = "DatedMarketingSegmentList")]
    pub marketing_segments: MarketingSegmentList,
    #[serde(rename = "PaxSegmentList")]
    pub pax_segments: PaxSegmentList,
    #[serde(rename = "PaxJourneyList")]
    pub journeys: PaxJourneyList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MarketingSegmentList {
    #[serde(rename = "DatedMarketingSegment")]
    pub segments: Vec<DatedMarketingSegment>,
}

// One scheduled flight leg as published by the carrier.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DatedMarketingSegment {
    #[serde(rename = "DatedMarketingSegmentId")]
    pub id: String,
    #[serde(rename = "CarrierDesigCode")]
    pub carrier_code: String,
    #[serde(rename = "MarketingCarrierFlightNumberText")]
    pub flight_number: String,
    #[serde(rename = "Dep")]
    pub departure: FlightPoint,
    #[serde(rename = "Arrival")]
    pub arrival: FlightPoint,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct FlightPoint {
    #[serde(rename = "IATA_LocationCode")]
    pub airport_code: String,
    #[serde(rename = "AircraftScheduledDateTime")]
    pub scheduled_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaxSegmentList {
    #[serde(rename = "PaxSegment")]
    pub segments: Vec<PaxSegment>,
}

// Booking-specific reference onto a marketing segment.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PaxSegment {
    #[serde(rename = "PaxSegmentID")]
    pub id: String,
    #[serde(rename = "DatedMarketingSegmentRefId")]
    pub marketing_segment_ref: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaxJourneyList {
    #[serde(rename = "PaxJourney")]
    pub journeys: Vec<PaxJourney>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PaxJourney {
    #[serde(rename = "PaxJourneyID")]
    pub id: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "PaxSegmentRefID")]
    pub segment_refs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OffersGroup {
    #[serde(rename = "CarrierOffers")]
    pub carrier_offers: CarrierOffers,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CarrierOffers {
    #[serde(rename = "Offer")]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Offer {
    #[serde(rename = "OfferID")]
    pub id: String,
    #[serde(rename = "OfferItem")]
    pub items: Vec<OfferItem>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OfferItem {
    #[serde(rename = "OfferItemID")]
    pub id: String,
    #[serde(rename = "Price")]
    pub price: Price,
    #[serde(rename = "Service")]
    pub service: Service,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(rename = "TotalAmount")]
    pub total: Amount,
    #[serde(rename = "BaseAmount")]
    pub base: Amount,
    #[serde(rename = "TaxSummary")]
    pub tax_summary: TaxSummary,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TaxSummary {
    #[serde(rename = "TotalTaxAmount")]
    pub total_tax: Amount,
}

// Monetary element: currency attribute plus decimal text content. Amount
// text stays a string here; the normalizer parses it with full precision.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Amount {
    #[serde(rename = "@CurCode")]
    pub currency: String,
    #[serde(rename = "$value")]
    pub value: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(rename = "OfferServiceAssociation")]
    pub association: OfferServiceAssociation,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OfferServiceAssociation {
    #[serde(rename = "PaxJourneyRef")]
    pub journey_ref: PaxJourneyRef,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PaxJourneyRef {
    #[serde(rename = "PaxJourneyRefID")]
    pub journey_ids: Vec<String>,
}

// --- OfferPrice / OrderCreate ----------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OfferPriceRs {
    #[serde(rename = "TotalAmount")]
    pub total_amount: Option<Amount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderCreateRs {
    #[serde(rename = "Order")]
    pub order: Option<OrderSummary>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OrderSummary {
    #[serde(rename = "OrderID")]
    pub id: String,
}

// --- Parsing ---------------------------------------------------------------

pub fn parse_envelope(xml: &str) -> Result<SoapEnvelope, ResponseError> {
    let stripped = strip_namespace_prefixes(xml)?;
    from_str(&stripped).map_err(|e| ResponseError::XmlDecode(e.to_string()))
}

// Rewrites every element and attribute to its local name and drops xmlns
// declarations, so the serde structs above stay prefix-agnostic.
pub fn strip_namespace_prefixes(xml: &str) -> Result<String, ResponseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let start = strip_start(&e)?;
                writer
                    .write_event(Event::Start(start))
                    .map_err(|e| ResponseError::XmlRead(e.to_string()))?;
            }
            Ok(Event::Empty(e)) => {
                let start = strip_start(&e)?;
                writer
                    .write_event(Event::Empty(start))
                    .map_err(|e| ResponseError::XmlRead(e.to_string()))?;
            }
            Ok(Event::End(e)) => {
                let end = BytesEnd::new(local_name(e.name()));
                writer
                    .write_event(Event::End(end))
                    .map_err(|e| ResponseError::XmlRead(e.to_string()))?;
            }
            Ok(Event::Text(t)) => {
                writer
                    .write_event(Event::Text(t))
                    .map_err(|e| ResponseError::XmlRead(e.to_string()))?;
            }
            Ok(Event::CData(t)) => {
                writer
                    .write_event(Event::CData(t))
                    .map_err(|e| ResponseError::XmlRead(e.to_string()))?;
            }
            Ok(Event::Eof) => break,
            // Declarations, comments and processing instructions are dropped
            Ok(_) => {}
            Err(e) => {
                return Err(ResponseError::XmlRead(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    String::from_utf8(writer.into_inner()).map_err(|e| ResponseError::XmlRead(e.to_string()))
}

fn strip_start(e: &BytesStart<'_>) -> Result<BytesStart<'static>, ResponseError> {
    let mut stripped = BytesStart::new(local_name(e.name()));
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ResponseError::XmlRead(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let local = key.rsplit(':').next().unwrap_or(&key).to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ResponseError::XmlRead(e.to_string()))?
            .into_owned();
        stripped.push_attribute((local.as_str(), value.as_str()));
    }
    Ok(stripped)
}

fn local_name(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.local_name().as_ref()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_namespace_prefixes() {
        let xml = r#"<ns4:Root xmlns:ns4="urn:x" xsi:schemaLocation="urn:y" code="A1"><ns4:Child>text</ns4:Child></ns4:Root>"#;
        let stripped = strip_namespace_prefixes(xml).unwrap();
        assert_eq!(
            stripped,
            r#"<Root schemaLocation="urn:y" code="A1"><Child>text</Child></Root>"#
        );
    }

    #[test]
    fn test_parse_fault_body() {
        let xml = r#"
        <soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
          <soap:Body>
            <soap:Fault>
              <faultcode>soap:Client</faultcode>
              <faultstring>Authentication failed</faultstring>
            </soap:Fault>
          </soap:Body>
        </soap:Envelope>"#;

        let envelope = parse_envelope(xml).unwrap();
        let fault = envelope.body.fault.expect("fault expected");
        assert_eq!(fault.code, "soap:Client");
        assert_eq!(fault.message, "Authentication failed");
        assert!(envelope.body.air_shopping.is_none());
    }

    #[test]
    fn test_parse_air_shopping_body() {
        let xml = r#"
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

        let envelope = parse_envelope(xml).unwrap();
        let rs = envelope.body.air_shopping.expect("shopping payload expected");
        let response = &rs.response;

        assert_eq!(response.data_lists.marketing_segments.segments.len(), 1);
        let segment = &response.data_lists.marketing_segments.segments[0];
        assert_eq!(segment.id, "SEG1");
        assert_eq!(segment.departure.airport_code, "EBL");
        assert_eq!(segment.arrival.airport_code, "DXB");

        assert_eq!(response.data_lists.journeys.journeys[0].segment_refs, vec!["PS1"]);

        let offer = &response.offers_group.carrier_offers.offers[0];
        assert_eq!(offer.id, "OFFER-1");
        assert_eq!(offer.items[0].price.total.value, "150.00");
        assert_eq!(offer.items[0].price.total.currency, "USD");
        assert_eq!(
            offer.items[0].service.association.journey_ref.journey_ids,
            vec!["J1"]
        );
    }

    #[test]
    fn test_parse_order_create_body() {
        let xml = r#"
        <Envelope><Body>
          <IATA_OrderCreateRS>
            <Order><OrderID>ORD-42</OrderID></Order>
          </IATA_OrderCreateRS>
        </Body></Envelope>"#;

        let envelope = parse_envelope(xml).unwrap();
        let rs = envelope.body.order_create.expect("order payload expected");
        assert_eq!(rs.order.expect("order expected").id, "ORD-42");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = parse_envelope("<Envelope><Body></Envelope>");
        assert!(result.is_err());
    }
}
