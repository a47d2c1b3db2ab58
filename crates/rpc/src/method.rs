//! Rpc methods.
#![warn(missing_docs)]

use super::error::Error;
use super::error::Result;

/// Operations a node serves under `/dht`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Method {
    /// Retrieve Node info, also the liveness probe
    NodeInfo,
    /// Retrieve predecessor
    Pred,
    /// Retrieve successor
    Succ,
    /// Resolve the successor of an id
    Find,
    /// Closest preceding finger of an id
    FindClosestPrecedingFinger,
    /// Assert candidacy as predecessor
    Notify,
    /// Values of a key
    GetValue,
    /// Bind a value to a key
    Add,
    /// Remove a binding
    Delete,
    /// Snapshot of the node
    Inspect,
}

impl Method {
    /// Return method's name as `&str`
    pub fn as_str(&self) -> &str {
        match self {
            Method::NodeInfo => "info",
            Method::Pred => "pred",
            Method::Succ => "succ",
            Method::Find => "find",
            Method::FindClosestPrecedingFinger => "findClosestPrecedingFinger",
            Method::Notify => "notify",
            Method::GetValue => "getValue",
            Method::Add => "add",
            Method::Delete => "delete",
            Method::Inspect => "inspect",
        }
    }

    /// Route of the method.
    pub fn path(&self) -> String {
        format!("/dht/{}", self.as_str())
    }

    /// Http verb of the method.
    pub fn http_method(&self) -> http::Method {
        match self {
            Method::Notify | Method::Add => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
            _ => http::Method::GET,
        }
    }

    /// Operation name carried by failures, e.g. `GET /dht/pred`.
    pub fn op(&self) -> String {
        format!("{} {}", self.http_method(), self.path())
    }
}

#[allow(clippy::to_string_trait_impl)]
impl ToString for Method {
    fn to_string(&self) -> String {
        self.as_str().to_owned()
    }
}

impl TryFrom<&str> for Method {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self> {
        Ok(match value {
            "info" => Self::NodeInfo,
            "pred" => Self::Pred,
            "succ" => Self::Succ,
            "find" => Self::Find,
            "findClosestPrecedingFinger" => Self::FindClosestPrecedingFinger,
            "notify" => Self::Notify,
            "getValue" => Self::GetValue,
            "add" => Self::Add,
            "delete" => Self::Delete,
            "inspect" => Self::Inspect,
            _ => return Err(Error::InvalidMethod(value.to_string())),
        })
    }
}
