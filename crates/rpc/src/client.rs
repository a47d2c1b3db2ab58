#![warn(missing_docs)]
//! HttpTransport for remote calls between nodes use reqwest::Client.
//!
//! Sample:
//! let transport = HttpTransport::new(Timeout::default())?;
//! let pred = transport.get_pred(&node).await?;
use async_trait::async_trait;
use chordring_core::dht::Did;
use chordring_core::dht::NodeInfo;
use chordring_core::dht::TableRep;
use chordring_core::dht::TableRow;
use chordring_core::error::Error;
use chordring_core::error::Result;
use chordring_core::transport::Transport;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::method::Method;
use crate::prelude::reqwest::Client as HttpClient;
use crate::types::IdQuery;
use crate::types::KeyQuery;
use crate::types::KeyValueQuery;
use crate::types::Timeout;

/// Transport over the `/dht` routes.
/// * client: a instance of reqwest::Client, its connection pool is shared
///   by every call of the process.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    /// Every request is bounded by `timeout`.
    pub fn new(timeout: Timeout) -> crate::error::Result<Self> {
        let client = HttpClient::builder().timeout(timeout.into()).build()?;
        Ok(Self { client })
    }

    fn request(&self, method: Method, addr: &Url) -> Result<RequestBuilder> {
        let url = addr
            .join(&method.path())
            .map_err(|e| Error::failed(method.op(), e))?;
        Ok(self
            .client
            .request(method.http_method(), url)
            .header(
                http::header::ACCEPT,
                http::header::HeaderValue::from_static("application/json"),
            ))
    }

    /// Send and turn anything but a success status into `Failed`.
    async fn send(&self, method: Method, req: RequestBuilder) -> Result<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| Error::failed(method.op(), e))?;
        let status = resp.status();
        if status.as_u16() >= 300 {
            return Err(Error::failed(method.op(), format!("status {}", status)));
        }
        Ok(resp)
    }

    async fn parse<T: DeserializeOwned>(method: Method, resp: Response) -> Result<T> {
        resp.json::<T>()
            .await
            .map_err(|e| Error::failed(method.op(), e))
    }

    async fn fetch<T: DeserializeOwned>(&self, method: Method, req: RequestBuilder) -> Result<T> {
        let resp = self.send(method, req).await?;
        Self::parse(method, resp).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_node_info(&self, addr: &Url) -> Result<NodeInfo> {
        let req = self.request(Method::NodeInfo, addr)?;
        self.fetch(Method::NodeInfo, req).await
    }

    async fn get_pred(&self, node: &NodeInfo) -> Result<Option<NodeInfo>> {
        let req = self.request(Method::Pred, &node.addr)?;
        self.fetch(Method::Pred, req).await
    }

    async fn get_succ(&self, node: &NodeInfo) -> Result<NodeInfo> {
        let req = self.request(Method::Succ, &node.addr)?;
        self.fetch(Method::Succ, req).await
    }

    async fn find_successor(&self, addr: &Url, id: Did) -> Result<NodeInfo> {
        let req = self
            .request(Method::Find, addr)?
            .query(&IdQuery { id: id.into() });
        self.fetch(Method::Find, req).await
    }

    async fn closest_preceding_finger(&self, node: &NodeInfo, id: Did) -> Result<NodeInfo> {
        let method = Method::FindClosestPrecedingFinger;
        let req = self
            .request(method, &node.addr)?
            .query(&IdQuery { id: id.into() });
        self.fetch(method, req).await
    }

    async fn notify(&self, node: &NodeInfo, record: TableRep) -> Result<Option<TableRep>> {
        let method = Method::Notify;
        let id = record
            .info
            .as_ref()
            .map(|x| u64::from(x.id))
            .ok_or_else(|| Error::invalid("notify without candidate"))?;
        let resp = self
            .request(method, &node.addr)?
            .query(&IdQuery { id })
            .json(&record)
            .send()
            .await
            .map_err(|e| Error::failed(method.op(), e))?;
        match resp.status() {
            StatusCode::NOT_MODIFIED => {
                tracing::debug!("{} declined notify", node);
                Ok(None)
            }
            status if status.as_u16() >= 300 => {
                Err(Error::failed(method.op(), format!("status {}", status)))
            }
            _ => Ok(Some(Self::parse(method, resp).await?)),
        }
    }

    async fn get(&self, node: &NodeInfo, key: &str) -> Result<Vec<String>> {
        let req = self
            .request(Method::GetValue, &node.addr)?
            .query(&KeyQuery {
                key: key.to_string(),
            });
        let row: TableRow = self.fetch(Method::GetValue, req).await?;
        Ok(row.vals)
    }

    async fn add(&self, node: &NodeInfo, key: &str, value: &str) -> Result<()> {
        let req = self
            .request(Method::Add, &node.addr)?
            .json(&TableRep::single(key, value));
        self.send(Method::Add, req).await?;
        Ok(())
    }

    async fn delete(&self, node: &NodeInfo, key: &str, value: &str) -> Result<()> {
        let req = self
            .request(Method::Delete, &node.addr)?
            .query(&KeyValueQuery {
                key: key.to_string(),
                value: value.to_string(),
            });
        self.send(Method::Delete, req).await?;
        Ok(())
    }
}
