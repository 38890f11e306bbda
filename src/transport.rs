// Transport boundary: one capability, send an envelope to an endpoint under
// a SOAPAction and hand back the raw reply bytes. Everything above it is
// transport-agnostic, which is what makes the client testable.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError::Network(error.to_string())
    }
}

#[async_trait]
pub trait SoapTransport: Send + Sync + 'static {
    async fn send(
        &self,
        endpoint: &str,
        soap_action: &str,
        envelope: Bytes,
    ) -> Result<Bytes, TransportError>;
}

// A shared transport can be handed to several owners.
#[async_trait]
impl<T: SoapTransport + ?Sized> SoapTransport for std::sync::Arc<T> {
    async fn send(
        &self,
        endpoint: &str,
        soap_action: &str,
        envelope: Bytes,
    ) -> Result<Bytes, TransportError> {
        (**self).send(endpoint, soap_action, envelope).await
    }
}

// reqwest-backed transport. The cookie store matters: the remote pins
// conversations to a node via session cookies.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SoapTransport for HttpTransport {
    async fn send(
        &self,
        endpoint: &str,
        soap_action: &str,
        envelope: Bytes,
    ) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "text/xml;charset=UTF-8")
            .header("SOAPAction", soap_action)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}

// Scripted transport for client and façade tests: pops canned replies in
// order and records everything it was asked to send.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub endpoint: String,
        pub soap_action: String,
        pub envelope: String,
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<String, TransportError>>>,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_response(&self, xml: impl Into<String>) {
            self.responses.lock().push_back(Ok(xml.into()));
        }

        pub fn push_error(&self, error: TransportError) {
            self.responses.lock().push_back(Err(error));
        }

        pub fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().clone()
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().len()
        }
    }

    #[async_trait]
    impl SoapTransport for ScriptedTransport {
        async fn send(
            &self,
            endpoint: &str,
            soap_action: &str,
            envelope: Bytes,
        ) -> Result<Bytes, TransportError> {
            self.sent.lock().push(SentRequest {
                endpoint: endpoint.to_string(),
                soap_action: soap_action.to_string(),
                envelope: String::from_utf8_lossy(&envelope).into_owned(),
            });
            match self.responses.lock().pop_front() {
                Some(Ok(xml)) => Ok(Bytes::from(xml)),
                Some(Err(error)) => Err(error),
                None => Err(TransportError::Network(
                    "scripted transport has no response left".to_string(),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;

    #[tokio::test]
    async fn test_scripted_transport_replays_in_order() {
        let transport = ScriptedTransport::new();
        transport.push_response("<first/>");
        transport.push_error(TransportError::Http {
            status: 500,
            body: "boom".to_string(),
        });

        let first = transport
            .send("https://example.test", "action-a", Bytes::from_static(b"<rq/>"))
            .await
            .unwrap();
        assert_eq!(first, Bytes::from_static(b"<first/>"));

        let second = transport
            .send("https://example.test", "action-b", Bytes::from_static(b"<rq/>"))
            .await;
        assert!(matches!(
            second,
            Err(TransportError::Http { status: 500, .. })
        ));

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].soap_action, "action-a");
        assert_eq!(sent[1].envelope, "<rq/>");
    }
}
