// Typed SOAP request envelopes. Every outbound message is built as a struct
// tree and rendered by the quick-xml serializer, so header and body fragments
// cannot drift apart the way placeholder-substituted templates do.

use serde::Serialize;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::model::{OrderRequest, PaxManifest, PaxType, SearchCriteria};
use crate::security::SecurityBundle;

// Wire namespaces and token-profile URIs.
pub const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const WSU_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
const WSA_NS: &str = "http://www.w3.org/2005/08/addressing";
const AMA_SECURITY_NS: &str = "http://xml.amadeus.com/2010/06/Security_v1";
const IATA_NS: &str = "http://www.iata.org/IATA/2007/00/IATA2010.1";
const AMA_TYPES_NS: &str = "http://xml.amadeus.com/2010/06/Types_v1";
const MESSAGE_NS: &str = "http://www.iata.org/IATA/2015/EASD/00/IATA_OffersAndOrdersMessage";
const COMMON_NS: &str = "http://www.iata.org/IATA/2015/EASD/00/IATA_OffersAndOrdersCommonTypes";
const PASSWORD_DIGEST_TYPE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";
const NONCE_ENCODING_TYPE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

const PAYLOAD_VERSION: &str = "21.3";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("envelope serialization error: {0}")]
    Serialize(String),
}

// --- Envelope and header ---------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename = "soap:Envelope")]
pub struct SoapRequest {
    #[serde(rename = "@xmlns:soap")]
    xmlns_soap: &'static str,
    #[serde(rename = "soap:Header")]
    header: SoapHeader,
    #[serde(rename = "soap:Body")]
    body: SoapRequestBody,
}

#[derive(Debug, Serialize)]
struct SoapHeader {
    #[serde(rename = "sec:AMA_SecurityHostedUser")]
    hosted_user: HostedUser,
    #[serde(rename = "wsse:Security")]
    security: Security,
    #[serde(rename = "wsa:Action")]
    action: Addressing,
    #[serde(rename = "wsa:MessageID")]
    message_id: Addressing,
    #[serde(rename = "wsa:To")]
    to: Addressing,
}

#[derive(Debug, Serialize)]
struct Addressing {
    #[serde(rename = "@xmlns:wsa")]
    xmlns: &'static str,
    #[serde(rename = "$value")]
    value: String,
}

impl Addressing {
    fn new(value: impl Into<String>) -> Self {
        Self {
            xmlns: WSA_NS,
            value: value.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Security {
    #[serde(rename = "@xmlns:wsse")]
    xmlns_wsse: &'static str,
    #[serde(rename = "@xmlns:wsu")]
    xmlns_wsu: &'static str,
    #[serde(rename = "wsse:UsernameToken")]
    token: UsernameToken,
}

// The created value here must be the exact string the digest was computed
// over; both come from the same SecurityBundle.
#[derive(Debug, Serialize)]
struct UsernameToken {
    #[serde(rename = "wsse:Username")]
    username: String,
    #[serde(rename = "wsse:Password")]
    password: TypedValue,
    #[serde(rename = "wsse:Nonce")]
    nonce: EncodedValue,
    #[serde(rename = "wsu:Created")]
    created: String,
}

#[derive(Debug, Serialize)]
struct TypedValue {
    #[serde(rename = "@Type")]
    value_type: &'static str,
    #[serde(rename = "$value")]
    value: String,
}

#[derive(Debug, Serialize)]
struct EncodedValue {
    #[serde(rename = "@EncodingType")]
    encoding_type: &'static str,
    #[serde(rename = "$value")]
    value: String,
}

#[derive(Debug, Serialize)]
struct HostedUser {
    #[serde(rename = "@xmlns:sec")]
    xmlns_sec: &'static str,
    #[serde(rename = "@xmlns:iat")]
    xmlns_iat: &'static str,
    #[serde(rename = "@xmlns:typ")]
    xmlns_typ: &'static str,
    #[serde(rename = "sec:UserID")]
    user_id: HostedUserId,
}

#[derive(Debug, Serialize)]
struct HostedUserId {
    #[serde(rename = "@POS_Type")]
    pos_type: &'static str,
    #[serde(rename = "@RequestorType")]
    requestor_type: &'static str,
    #[serde(rename = "@PseudoCityCode")]
    pseudo_city_code: String,
    #[serde(rename = "@AgentDutyCode")]
    agent_duty_code: &'static str,
    #[serde(rename = "typ:RequestorID")]
    requestor_id: RequestorId,
}

#[derive(Debug, Serialize)]
struct RequestorId {
    #[serde(rename = "iat:CompanyName")]
    company_name: String,
}

#[derive(Debug, Serialize)]
struct SoapRequestBody {
    #[serde(rename = "n1:IATA_AirShoppingRQ", skip_serializing_if = "Option::is_none")]
    air_shopping: Option<AirShoppingRq>,
    #[serde(rename = "n1:IATA_OfferPriceRQ", skip_serializing_if = "Option::is_none")]
    offer_price: Option<OfferPriceRq>,
    #[serde(rename = "n1:IATA_OrderCreateRQ", skip_serializing_if = "Option::is_none")]
    order_create: Option<OrderCreateRq>,
}

#[derive(Debug)]
pub enum RequestPayload {
    AirShopping(AirShoppingRq),
    OfferPrice(OfferPriceRq),
    OrderCreate(OrderCreateRq),
}

// Assembles header and body into one envelope for a single request.
pub fn soap_request(
    config: &GatewayConfig,
    bundle: &SecurityBundle,
    action: &str,
    payload: RequestPayload,
) -> SoapRequest {
    let mut body = SoapRequestBody {
        air_shopping: None,
        offer_price: None,
        order_create: None,
    };
    match payload {
        RequestPayload::AirShopping(rq) => body.air_shopping = Some(rq),
        RequestPayload::OfferPrice(rq) => body.offer_price = Some(rq),
        RequestPayload::OrderCreate(rq) => body.order_create = Some(rq),
    }

    SoapRequest {
        xmlns_soap: SOAP_NS,
        header: SoapHeader {
            hosted_user: HostedUser {
                xmlns_sec: AMA_SECURITY_NS,
                xmlns_iat: IATA_NS,
                xmlns_typ: AMA_TYPES_NS,
                user_id: HostedUserId {
                    pos_type: "1",
                    requestor_type: "U",
                    pseudo_city_code: config.office_id.clone(),
                    agent_duty_code: "SU",
                    requestor_id: RequestorId {
                        company_name: config.carrier_code.clone(),
                    },
                },
            },
            security: Security {
                xmlns_wsse: WSSE_NS,
                xmlns_wsu: WSU_NS,
                token: UsernameToken {
                    username: config.credentials.username().to_string(),
                    password: TypedValue {
                        value_type: PASSWORD_DIGEST_TYPE,
                        value: bundle.digest.clone(),
                    },
                    nonce: EncodedValue {
                        encoding_type: NONCE_ENCODING_TYPE,
                        value: bundle.nonce.clone(),
                    },
                    created: bundle.created.clone(),
                },
            },
            action: Addressing::new(action),
            message_id: Addressing::new(bundle.message_id.clone()),
            to: Addressing::new(config.endpoint.clone()),
        },
        body,
    }
}

pub fn to_xml(request: &SoapRequest) -> Result<String, EnvelopeError> {
    quick_xml::se::to_string(request).map_err(|e| EnvelopeError::Serialize(e.to_string()))
}

// --- Shared body fragments -------------------------------------------------

#[derive(Debug, Serialize)]
struct DistributionChain {
    #[serde(rename = "cns:DistributionChainLink")]
    links: Vec<ChainLink>,
}

#[derive(Debug, Serialize)]
struct ChainLink {
    #[serde(rename = "cns:Ordinal")]
    ordinal: String,
    #[serde(rename = "cns:OrgRole")]
    role: String,
    #[serde(rename = "cns:ParticipatingOrg")]
    org: ParticipatingOrg,
}

#[derive(Debug, Serialize)]
struct ParticipatingOrg {
    #[serde(rename = "cns:OrgID")]
    org_id: String,
}

fn distribution_chain(config: &GatewayConfig) -> DistributionChain {
    let link = |ordinal: &str, role: &str, org_id: &str| ChainLink {
        ordinal: ordinal.to_string(),
        role: role.to_string(),
        org: ParticipatingOrg {
            org_id: org_id.to_string(),
        },
    };
    DistributionChain {
        links: vec![
            link("1", "Seller", &config.iata_office_id),
            link("2", "Distributor", &config.aggregator),
            link("3", "Carrier", &config.carrier_code),
        ],
    }
}

#[derive(Debug, Serialize)]
struct Pos {
    #[serde(rename = "cns:Country")]
    country: PosCountry,
}

#[derive(Debug, Serialize)]
struct PosCountry {
    #[serde(rename = "cns:CountryCode")]
    country_code: String,
}

fn pos(config: &GatewayConfig) -> Pos {
    Pos {
        country: PosCountry {
            country_code: config.country_code.clone(),
        },
    }
}

#[derive(Debug, Serialize)]
struct PaxList {
    #[serde(rename = "cns:Pax")]
    passengers: Vec<PaxEntry>,
}

#[derive(Debug, Serialize)]
struct PaxEntry {
    #[serde(rename = "cns:PaxID")]
    id: String,
    #[serde(rename = "cns:PTC")]
    ptc: String,
}

// PAX1..PAXn in manifest order: adults, then children, then infants.
fn pax_list(manifest: &PaxManifest) -> PaxList {
    let mut passengers = Vec::new();
    let mut next = 1usize;
    for (pax_type, count) in manifest.effective().counts() {
        for _ in 0..count {
            passengers.push(PaxEntry {
                id: format!("PAX{}", next),
                ptc: pax_type.ptc_code().to_string(),
            });
            next += 1;
        }
    }
    PaxList { passengers }
}

// --- AirShopping -----------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AirShoppingRq {
    #[serde(rename = "@xmlns:n1")]
    xmlns_n1: &'static str,
    #[serde(rename = "@xmlns:cns")]
    xmlns_cns: &'static str,
    #[serde(rename = "n1:DistributionChain")]
    distribution_chain: DistributionChain,
    #[serde(rename = "n1:PayloadAttributes")]
    payload_attributes: PayloadAttributes,
    #[serde(rename = "n1:POS")]
    pos: Pos,
    #[serde(rename = "n1:Request")]
    request: ShoppingRequest,
}

#[derive(Debug, Serialize)]
struct PayloadAttributes {
    #[serde(rename = "cns:VersionNumber")]
    version: String,
}

#[derive(Debug, Serialize)]
struct ShoppingRequest {
    #[serde(rename = "cns:FlightRequest")]
    flight_request: FlightRequest,
    #[serde(rename = "cns:PaxList")]
    pax_list: PaxList,
    #[serde(rename = "cns:ResponseParameters")]
    response_parameters: ResponseParameters,
}

#[derive(Debug, Serialize)]
struct FlightRequest {
    #[serde(rename = "cns:FlightRequestOriginDestinationsCriteria")]
    origin_destinations: OriginDestinations,
}

#[derive(Debug, Serialize)]
struct OriginDestinations {
    #[serde(rename = "cns:OriginDestCriteria")]
    entries: Vec<OriginDestCriteria>,
}

#[derive(Debug, Serialize)]
struct OriginDestCriteria {
    #[serde(rename = "cns:CabinType")]
    cabin: CabinType,
    #[serde(rename = "cns:DestArrivalCriteria")]
    arrival: ArrivalCriteria,
    #[serde(rename = "cns:OriginDepCriteria")]
    departure: DepartureCriteria,
}

#[derive(Debug, Serialize)]
struct CabinType {
    #[serde(rename = "cns:CabinTypeCode")]
    code: String,
    #[serde(rename = "cns:PrefLevel")]
    pref_level: PrefLevel,
}

#[derive(Debug, Serialize)]
struct PrefLevel {
    #[serde(rename = "cns:PrefLevelCode")]
    code: String,
}

#[derive(Debug, Serialize)]
struct ArrivalCriteria {
    #[serde(rename = "cns:IATA_LocationCode")]
    location: String,
}

#[derive(Debug, Serialize)]
struct DepartureCriteria {
    #[serde(rename = "cns:Date")]
    date: String,
    #[serde(rename = "cns:IATA_LocationCode")]
    location: String,
}

#[derive(Debug, Serialize)]
struct ResponseParameters {
    #[serde(rename = "cns:LangUsage")]
    lang: LangUsage,
}

#[derive(Debug, Serialize)]
struct LangUsage {
    #[serde(rename = "cns:LangCode")]
    code: String,
}

fn origin_dest(origin: &str, destination: &str, date: chrono::NaiveDate) -> OriginDestCriteria {
    OriginDestCriteria {
        cabin: CabinType {
            // Cabin 5 = economy in the carrier's coding scheme
            code: "5".to_string(),
            pref_level: PrefLevel {
                code: "Preferred".to_string(),
            },
        },
        arrival: ArrivalCriteria {
            location: destination.to_string(),
        },
        departure: DepartureCriteria {
            date: date.format(DATE_FORMAT).to_string(),
            location: origin.to_string(),
        },
    }
}

pub fn air_shopping_request(
    config: &GatewayConfig,
    criteria: &SearchCriteria,
    manifest: &PaxManifest,
) -> AirShoppingRq {
    let mut entries = vec![origin_dest(
        &criteria.origin,
        &criteria.destination,
        criteria.departure_date,
    )];
    if let Some(return_date) = criteria.return_date {
        entries.push(origin_dest(
            &criteria.destination,
            &criteria.origin,
            return_date,
        ));
    }

    AirShoppingRq {
        xmlns_n1: MESSAGE_NS,
        xmlns_cns: COMMON_NS,
        distribution_chain: distribution_chain(config),
        payload_attributes: PayloadAttributes {
            version: PAYLOAD_VERSION.to_string(),
        },
        pos: pos(config),
        request: ShoppingRequest {
            flight_request: FlightRequest {
                origin_destinations: OriginDestinations { entries },
            },
            pax_list: pax_list(manifest),
            response_parameters: ResponseParameters {
                lang: LangUsage {
                    code: "EN".to_string(),
                },
            },
        },
    }
}

// --- OfferPrice ------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OfferPriceRq {
    #[serde(rename = "@xmlns:n1")]
    xmlns_n1: &'static str,
    #[serde(rename = "@xmlns:cns")]
    xmlns_cns: &'static str,
    #[serde(rename = "n1:DistributionChain")]
    distribution_chain: DistributionChain,
    #[serde(rename = "n1:POS")]
    pos: Pos,
    #[serde(rename = "n1:Request")]
    request: OfferPriceRequestBody,
}

#[derive(Debug, Serialize)]
struct OfferPriceRequestBody {
    #[serde(rename = "cns:DataLists")]
    data_lists: PriceDataLists,
    #[serde(rename = "cns:PricedOffer")]
    priced_offer: PricedOffer,
}

#[derive(Debug, Serialize)]
struct PriceDataLists {
    #[serde(rename = "cns:PaxList")]
    pax_list: PaxList,
}

#[derive(Debug, Serialize)]
struct PricedOffer {
    #[serde(rename = "cns:SelectedOfferList")]
    selected_offers: SelectedOfferList,
}

#[derive(Debug, Serialize)]
struct SelectedOfferList {
    #[serde(rename = "cns:SelectedOffer")]
    offers: Vec<SelectedOffer>,
}

#[derive(Debug, Serialize)]
struct SelectedOffer {
    #[serde(rename = "cns:OfferRefID")]
    offer_ref: String,
    #[serde(rename = "cns:OwnerCode")]
    owner_code: String,
    #[serde(rename = "cns:SelectedOfferItem")]
    item: SelectedOfferItem,
}

#[derive(Debug, Serialize)]
struct SelectedOfferItem {
    #[serde(rename = "cns:OfferItemRefID")]
    offer_item_ref: String,
    #[serde(rename = "cns:PaxRefID")]
    pax_ref: String,
}

pub fn offer_price_request(
    config: &GatewayConfig,
    selection: &crate::model::OfferSelection,
    manifest: &PaxManifest,
) -> OfferPriceRq {
    OfferPriceRq {
        xmlns_n1: MESSAGE_NS,
        xmlns_cns: COMMON_NS,
        distribution_chain: distribution_chain(config),
        pos: pos(config),
        request: OfferPriceRequestBody {
            data_lists: PriceDataLists {
                pax_list: pax_list(manifest),
            },
            priced_offer: PricedOffer {
                selected_offers: SelectedOfferList {
                    offers: vec![SelectedOffer {
                        offer_ref: selection.offer_id.clone(),
                        owner_code: config.carrier_code.clone(),
                        item: SelectedOfferItem {
                            offer_item_ref: selection.offer_item_id.clone(),
                            pax_ref: "PAX1".to_string(),
                        },
                    }],
                },
            },
        },
    }
}

// --- OrderCreate -----------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OrderCreateRq {
    #[serde(rename = "@xmlns:n1")]
    xmlns_n1: &'static str,
    #[serde(rename = "@xmlns:cns")]
    xmlns_cns: &'static str,
    #[serde(rename = "n1:DistributionChain")]
    distribution_chain: DistributionChain,
    #[serde(rename = "n1:POS")]
    pos: Pos,
    #[serde(rename = "n1:Request")]
    request: OrderCreateRequestBody,
}

#[derive(Debug, Serialize)]
struct OrderCreateRequestBody {
    #[serde(rename = "cns:CreateOrder")]
    create_order: CreateOrder,
    #[serde(rename = "cns:DataLists")]
    data_lists: OrderDataLists,
    #[serde(rename = "cns:PaymentFunctions")]
    payment: PaymentFunctions,
}

#[derive(Debug, Serialize)]
struct CreateOrder {
    #[serde(rename = "cns:AcceptSelectedQuotedOfferList")]
    accepted: AcceptedOfferList,
}

#[derive(Debug, Serialize)]
struct AcceptedOfferList {
    #[serde(rename = "cns:SelectedPricedOffer")]
    offers: Vec<SelectedOffer>,
}

#[derive(Debug, Serialize)]
struct OrderDataLists {
    #[serde(rename = "cns:ContactInfoList")]
    contacts: ContactInfoList,
    #[serde(rename = "cns:PaxList")]
    pax_list: OrderPaxList,
}

#[derive(Debug, Serialize)]
struct ContactInfoList {
    #[serde(rename = "cns:ContactInfo")]
    contacts: Vec<ContactInfo>,
}

#[derive(Debug, Serialize)]
struct ContactInfo {
    #[serde(rename = "cns:ContactInfoID")]
    id: String,
    #[serde(rename = "cns:ContactPurposeText", skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(rename = "cns:EmailAddress")]
    email: EmailAddress,
    #[serde(rename = "cns:Individual")]
    individual: ContactIndividual,
    #[serde(rename = "cns:IndividualRefID")]
    individual_ref: String,
    #[serde(rename = "cns:Phone", skip_serializing_if = "Option::is_none")]
    phone: Option<Phone>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    #[serde(rename = "cns:ContactTypeText", skip_serializing_if = "Option::is_none")]
    contact_type: Option<String>,
    #[serde(rename = "cns:EmailAddressText")]
    address: String,
}

#[derive(Debug, Serialize)]
struct ContactIndividual {
    #[serde(rename = "cns:Surname")]
    surname: String,
}

#[derive(Debug, Serialize)]
struct Phone {
    #[serde(rename = "cns:ContactTypeText")]
    contact_type: String,
    #[serde(rename = "cns:PhoneNumber")]
    number: String,
}

#[derive(Debug, Serialize)]
struct OrderPaxList {
    #[serde(rename = "cns:Pax")]
    passengers: Vec<OrderPax>,
}

#[derive(Debug, Serialize)]
struct OrderPax {
    #[serde(rename = "cns:IdentityDoc")]
    identity_doc: IdentityDoc,
    #[serde(rename = "cns:Individual")]
    individual: Individual,
    #[serde(rename = "cns:LangUsage")]
    lang: LangUsage,
    #[serde(rename = "cns:PaxID")]
    id: String,
    #[serde(rename = "cns:PTC")]
    ptc: String,
}

#[derive(Debug, Serialize)]
struct IdentityDoc {
    #[serde(rename = "cns:ExpiryDate")]
    expiry_date: String,
    #[serde(rename = "cns:IdentityDocID")]
    doc_id: String,
    #[serde(rename = "cns:IdentityDocTypeCode")]
    doc_type: String,
    #[serde(rename = "cns:IssuingCountryCode")]
    issuing_country: String,
    #[serde(rename = "cns:ResidenceCountryCode")]
    residence_country: String,
    #[serde(rename = "cns:Surname")]
    surname: String,
}

#[derive(Debug, Serialize)]
struct Individual {
    #[serde(rename = "cns:Birthdate")]
    birthdate: String,
    #[serde(rename = "cns:GenderCode")]
    gender: String,
    #[serde(rename = "cns:GivenName")]
    given_name: String,
    #[serde(rename = "cns:IndividualID")]
    id: String,
    #[serde(rename = "cns:Surname")]
    surname: String,
    #[serde(rename = "cns:TitleName")]
    title: String,
}

#[derive(Debug, Serialize)]
struct PaymentFunctions {
    #[serde(rename = "cns:PaymentProcessingDetails")]
    details: PaymentProcessingDetails,
}

#[derive(Debug, Serialize)]
struct PaymentProcessingDetails {
    #[serde(rename = "cns:Amount")]
    amount: PaymentAmount,
    #[serde(rename = "cns:PaymentMethod")]
    method: PaymentMethod,
}

#[derive(Debug, Serialize)]
struct PaymentAmount {
    #[serde(rename = "@CurCode")]
    currency: String,
    #[serde(rename = "$value")]
    value: String,
}

#[derive(Debug, Serialize)]
struct PaymentMethod {
    #[serde(rename = "cns:SettlementPlan")]
    settlement: SettlementPlan,
}

#[derive(Debug, Serialize)]
struct SettlementPlan {
    // "CA" = cash settlement at the office
    #[serde(rename = "cns:PaymentTypeCode")]
    payment_type: String,
}

pub fn order_create_request(config: &GatewayConfig, order: &OrderRequest) -> OrderCreateRq {
    let passenger = &order.passenger;

    OrderCreateRq {
        xmlns_n1: MESSAGE_NS,
        xmlns_cns: COMMON_NS,
        distribution_chain: distribution_chain(config),
        pos: pos(config),
        request: OrderCreateRequestBody {
            create_order: CreateOrder {
                accepted: AcceptedOfferList {
                    offers: vec![SelectedOffer {
                        offer_ref: order.selection.offer_id.clone(),
                        owner_code: config.carrier_code.clone(),
                        item: SelectedOfferItem {
                            offer_item_ref: order.selection.offer_item_id.clone(),
                            pax_ref: "PAX1".to_string(),
                        },
                    }],
                },
            },
            data_lists: OrderDataLists {
                contacts: ContactInfoList {
                    contacts: vec![
                        ContactInfo {
                            id: "CTCPAX1_1".to_string(),
                            purpose: None,
                            email: EmailAddress {
                                contact_type: Some("Home".to_string()),
                                address: passenger.email.clone(),
                            },
                            individual: ContactIndividual {
                                surname: passenger.surname.clone(),
                            },
                            individual_ref: "PAX1".to_string(),
                            phone: Some(Phone {
                                contact_type: "Mobile".to_string(),
                                number: passenger.phone.clone(),
                            }),
                        },
                        ContactInfo {
                            id: "CTCPAX1_2".to_string(),
                            purpose: Some("NTF".to_string()),
                            email: EmailAddress {
                                contact_type: None,
                                address: passenger.email.clone(),
                            },
                            individual: ContactIndividual {
                                surname: passenger.surname.clone(),
                            },
                            individual_ref: "PAX1".to_string(),
                            phone: None,
                        },
                    ],
                },
                pax_list: OrderPaxList {
                    passengers: vec![OrderPax {
                        identity_doc: IdentityDoc {
                            expiry_date: passenger.document_expiry.format(DATE_FORMAT).to_string(),
                            doc_id: passenger.document_id.clone(),
                            doc_type: "PT".to_string(),
                            issuing_country: config.country_code.clone(),
                            residence_country: config.country_code.clone(),
                            surname: passenger.surname.clone(),
                        },
                        individual: Individual {
                            birthdate: passenger.birthdate.format(DATE_FORMAT).to_string(),
                            gender: passenger.gender_code.clone(),
                            given_name: passenger.given_name.clone(),
                            id: "PAX1".to_string(),
                            surname: passenger.surname.clone(),
                            title: passenger.title.clone(),
                        },
                        lang: LangUsage {
                            code: "EN".to_string(),
                        },
                        id: "PAX1".to_string(),
                        ptc: PaxType::Adult.ptc_code().to_string(),
                    }],
                },
            },
            payment: PaymentFunctions {
                details: PaymentProcessingDetails {
                    amount: PaymentAmount {
                        currency: order.currency.clone(),
                        value: format!("{:.2}", order.total_amount),
                    },
                    method: PaymentMethod {
                        settlement: SettlementPlan {
                            payment_type: "CA".to_string(),
                        },
                    },
                },
            },
        },
    }
}
