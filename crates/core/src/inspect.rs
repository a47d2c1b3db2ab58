//! Read-only snapshots of a node, served by the inspect route.
use serde::Deserialize;
use serde::Serialize;

use crate::dht::PeerRing;
use crate::dht::TableRow;
use crate::error::Result;
use crate::swarm::NodeState;
use crate::swarm::Swarm;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmInspect {
    pub state: NodeState,
    pub dht: DHTInspect,
    pub storage: StorageInspect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DHTInspect {
    pub id: u64,
    pub addr: String,
    pub successor: String,
    #[serde(default)]
    pub predecessor: Option<String>,
    /// Runs of equal entries as (node, first index, last index).
    pub finger_table: Vec<(String, u64, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInspect {
    pub keys: usize,
    pub items: Vec<TableRow>,
}

impl SwarmInspect {
    pub fn inspect(swarm: &Swarm) -> Result<Self> {
        let dht = swarm.dht();
        Ok(Self {
            state: swarm.state()?,
            dht: DHTInspect::inspect(&dht)?,
            storage: StorageInspect::inspect(&dht),
        })
    }
}

impl DHTInspect {
    pub fn inspect(dht: &PeerRing) -> Result<Self> {
        let successor = dht.successor()?.to_string();
        let predecessor = dht.predecessor()?.map(|x| x.to_string());
        let finger_table = {
            let finger = dht.lock_finger()?;
            compress_iter(finger.list().iter().map(|x| x.to_string()))
        };
        Ok(Self {
            id: dht.did().into(),
            addr: dht.info.addr.to_string(),
            successor,
            predecessor,
            finger_table,
        })
    }
}

impl StorageInspect {
    pub fn inspect(dht: &PeerRing) -> Self {
        Self {
            keys: dht.storage.count(),
            items: dht.storage.get_all(),
        }
    }
}

/// Collapse consecutive equal items into (item, first index, last index).
pub fn compress_iter<T>(iter: impl Iterator<Item = T>) -> Vec<(T, u64, u64)>
where T: PartialEq {
    let mut result: Vec<(T, u64, u64)> = vec![];
    for (i, x) in iter.enumerate() {
        let i = i as u64;
        match result.last_mut() {
            Some((last, _, end)) if *last == x => *end = i,
            _ => result.push((x, i, i)),
        }
    }
    result
}
