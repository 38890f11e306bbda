// NDC client: draws fresh security material per request, renders the typed
// envelope, sends it through the transport and decodes the reply.

use bytes::Bytes;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::envelope::{self, EnvelopeError, RequestPayload};
use crate::model::{NormalizedSearch, OfferSelection, OrderRequest, PaxManifest, SearchCriteria};
use crate::normalizer::{self, NormalizeError};
use crate::response::{self, AirShoppingRs, OfferPriceRs, OrderCreateRs, ResponseError, SoapBody};
use crate::security::WsSecurity;
use crate::transport::{SoapTransport, TransportError};
use thiserror::Error;

pub const AIR_SHOPPING_ACTION: &str = "http://webservices.amadeus.com/NDC_AirShopping_21.3";
pub const OFFER_PRICE_ACTION: &str = "http://webservices.amadeus.com/NDC_OfferPrice_21.3";
pub const ORDER_CREATE_ACTION: &str = "http://webservices.amadeus.com/NDC_OrderCreate_21.3";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("request envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("response error: {0}")]
    Response(#[from] ResponseError),

    #[error("server fault {code}: {message}")]
    ServerFault { code: String, message: String },

    #[error("response body carried no {0} payload")]
    MissingPayload(&'static str),

    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("unknown or expired fare key {0}")]
    UnknownFareKey(String),
}

pub struct NdcClient<T: SoapTransport> {
    config: GatewayConfig,
    security: WsSecurity,
    transport: T,
}

impl<T: SoapTransport> NdcClient<T> {
    pub fn new(config: GatewayConfig, transport: T) -> Self {
        let security = WsSecurity::new(config.credentials.clone());
        Self {
            config,
            security,
            transport,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn air_shopping(
        &self,
        criteria: &SearchCriteria,
        manifest: &PaxManifest,
    ) -> Result<AirShoppingRs, GatewayError> {
        let rq = envelope::air_shopping_request(&self.config, criteria, manifest);
        let body = self
            .call(AIR_SHOPPING_ACTION, RequestPayload::AirShopping(rq))
            .await?;
        body.air_shopping
            .ok_or(GatewayError::MissingPayload("IATA_AirShoppingRS"))
    }

    pub async fn offer_price(
        &self,
        selection: &OfferSelection,
        manifest: &PaxManifest,
    ) -> Result<OfferPriceRs, GatewayError> {
        let rq = envelope::offer_price_request(&self.config, selection, manifest);
        let body = self
            .call(OFFER_PRICE_ACTION, RequestPayload::OfferPrice(rq))
            .await?;
        body.offer_price
            .ok_or(GatewayError::MissingPayload("IATA_OfferPriceRS"))
    }

    pub async fn order_create(&self, order: &OrderRequest) -> Result<OrderCreateRs, GatewayError> {
        let rq = envelope::order_create_request(&self.config, order);
        let body = self
            .call(ORDER_CREATE_ACTION, RequestPayload::OrderCreate(rq))
            .await?;
        body.order_create
            .ok_or(GatewayError::MissingPayload("IATA_OrderCreateRS"))
    }

    // Shop and normalize in one step.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        manifest: &PaxManifest,
    ) -> Result<NormalizedSearch, GatewayError> {
        let rs = self.air_shopping(criteria, manifest).await?;
        Ok(normalizer::normalize(&rs, manifest)?)
    }

    // Single request path: every call draws a fresh single-use bundle.
    async fn call(
        &self,
        action: &'static str,
        payload: RequestPayload,
    ) -> Result<SoapBody, GatewayError> {
        let bundle = self.security.bundle();
        let request = envelope::soap_request(&self.config, &bundle, action, payload);
        let xml = envelope::to_xml(&request)?;
        debug!(action, bytes = xml.len(), "sending SOAP request");

        let raw = match self
            .transport
            .send(&self.config.endpoint, action, Bytes::from(xml))
            .await
        {
            Ok(raw) => raw,
            // Fault documents ride on HTTP error statuses; surface them as
            // faults rather than opaque transport failures when possible.
            Err(TransportError::Http { status, body }) => {
                if let Ok(envelope) = response::parse_envelope(&body) {
                    if let Some(fault) = envelope.body.fault {
                        return Err(GatewayError::ServerFault {
                            code: fault.code,
                            message: fault.message,
                        });
                    }
                }
                return Err(GatewayError::Transport(TransportError::Http {
                    status,
                    body,
                }));
            }
            Err(error) => return Err(error.into()),
        };

        let text = String::from_utf8_lossy(&raw);
        debug!(action, bytes = text.len(), "received SOAP response");
        let envelope = response::parse_envelope(&text)?;

        if let Some(fault) = envelope.body.fault {
            return Err(GatewayError::ServerFault {
                code: fault.code,
                message: fault.message,
            });
        }

        Ok(envelope.body)
    }
}
