//! DHT types about ring members, bindings records and the `Chord` protocol.
#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use super::did::Did;
use crate::error::Error;
use crate::error::Result;

/// Identity of a ring member: its position and where to reach it.
/// Immutable once constructed. Two NodeInfo are the same member iff their
/// ids are equal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Position on the ring.
    pub id: Did,
    /// Base url of the node's service.
    pub addr: Url,
}

impl NodeInfo {
    /// Create a new NodeInfo.
    pub fn new(id: Did, addr: Url) -> Self {
        Self { id, addr }
    }
}

impl PartialEq for NodeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeInfo {}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.addr)
    }
}

/// A key and its value set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// The key
    pub key: String,
    /// All values bound under the key.
    pub vals: Vec<String>,
}

impl TableRow {
    /// Create a row.
    pub fn new(key: impl Into<String>, vals: Vec<String>) -> Self {
        Self {
            key: key.into(),
            vals,
        }
    }
}

/// Bindings record exchanged between nodes.
///
/// The same shape carries a notify request (`info` is the candidate), a
/// bindings transfer (`entry` holds the moved bindings) and an add request
/// (exactly one row with one value).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TableRep {
    /// Sender of the record.
    #[serde(default)]
    pub info: Option<NodeInfo>,
    /// Successor of the sender, if known.
    #[serde(default)]
    pub succ: Option<NodeInfo>,
    /// Bindings.
    #[serde(default)]
    pub entry: Vec<TableRow>,
}

impl TableRep {
    /// A notify request asserting `info` as predecessor.
    pub fn notify(info: NodeInfo) -> Self {
        Self {
            info: Some(info),
            succ: None,
            entry: vec![],
        }
    }

    /// A bindings transfer record sent by `info`.
    pub fn transfer(info: NodeInfo, succ: NodeInfo, entry: Vec<TableRow>) -> Self {
        Self {
            info: Some(info),
            succ: Some(succ),
            entry,
        }
    }

    /// An add request carrying one binding.
    pub fn single(key: &str, value: &str) -> Self {
        Self {
            info: None,
            succ: None,
            entry: vec![TableRow::new(key, vec![value.to_string()])],
        }
    }

    /// The binding of an add request, which must hold exactly one row with
    /// exactly one value.
    pub fn as_single(&self) -> Result<(&str, &str)> {
        match self.entry.as_slice() {
            [row] if row.vals.len() == 1 => Ok((row.key.as_str(), row.vals[0].as_str())),
            _ => Err(Error::invalid(
                "expect exactly one key with exactly one value",
            )),
        }
    }
}

/// Chord is a distributed hash table (DHT) algorithm that is designed to efficiently
/// distribute data across peer-to-peer network nodes. You may want to browse its
/// [wiki](https://en.wikipedia.org/wiki/Chord_(peer-to-peer)) before you read this.
///
/// Every method here only reads and writes local state. Some methods return an
/// `Action` which tells the caller which remote call is needed to continue, e.g.
/// the next hop of a lookup. The caller executes it and feeds the result back.
pub trait Chord<Action> {
    /// Join a ring whose member `successor` was found to be our successor.
    fn join(&self, successor: NodeInfo) -> Result<Action>;

    /// Ask DHT for the successor of Did.
    /// May return a remote action for the successor is recorded in another node.
    fn find_successor(&self, did: Did) -> Result<Action>;

    /// Highest finger strictly between self and `did`, or self.
    fn closest_preceding_finger(&self, did: Did) -> Result<NodeInfo>;

    /// Handle a node asserting candidacy as our predecessor.
    /// Returns the bindings moved to the candidate when it is accepted,
    /// `None` when it is rejected.
    fn notify(&self, candidate: NodeInfo) -> Result<Option<Vec<TableRow>>>;

    /// The local half of stabilize: `succ_pred` is the predecessor reported
    /// by the current successor.
    fn stabilize(&self, succ_pred: Option<NodeInfo>) -> Result<Action>;

    /// Pick the next finger to fix.
    /// According to the paper, only one finger should be fixed at a time.
    fn fix_fingers(&self) -> Result<Action>;
}
