//! Chord algorithm implement.
#![warn(missing_docs)]
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use super::types::Chord;
use super::FingerTable;
use crate::dht::Did;
use crate::dht::IdSpace;
use crate::dht::NodeInfo;
use crate::dht::TableRow;
use crate::error::Error;
use crate::error::Result;
use crate::storage::MemStorage;

/// PeerRing is the local ring state of a node.
/// All nodes in the network form a clockwise ring in the order of Did.
/// This struct takes its name from that.
/// PeerRing implemented [Chord] algorithm.
///
/// Locks are always taken in the order predecessor, successor, finger.
pub struct PeerRing {
    /// The identity of current node.
    pub info: NodeInfo,
    /// The identifier space of the ring.
    pub space: IdSpace,
    /// [FingerTable] help node to find successor quickly.
    pub finger: Arc<Mutex<FingerTable>>,
    /// The next node on the ring. Equals `info` for a singleton ring.
    pub successor: Arc<Mutex<NodeInfo>>,
    /// The previous node on the ring.
    pub predecessor: Arc<Mutex<Option<NodeInfo>>>,
    /// Bindings of the keys in the ownership interval.
    pub storage: MemStorage,
}

/// Type alias is just for making the code easy to read.
type Target = NodeInfo;

/// `PeerRing` use this to describe the result of [Chord] algorithm. Sometimes it's a
/// direct result, sometimes it's an action that is continued externally.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerRingAction {
    /// No result, the whole manipulation is done internally.
    None,
    /// Found some node.
    Some(NodeInfo),
    /// Trigger a remote action.
    RemoteAction(Target, RemoteAction),
}

/// Some of the process needs to be done remotely. This enum is used to describe that.
/// The caller runs the remote call and feeds the result back into `PeerRing`.
///
/// In the following comments `node_a` is the target declared in [PeerRingAction].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteAction {
    /// Need `node_a` to find the successor of did.
    FindSuccessor(Did),
    /// Need `node_a` to find the successor of did, then store it at the
    /// finger index.
    FindSuccessorForFix(usize, Did),
    /// Let `node_a` [notify](Chord::notify) the node.
    Notify(NodeInfo),
}

impl PeerRing {
    /// Create a new PeerRing as a singleton ring: successor is self and
    /// there is no predecessor.
    pub fn new(info: NodeInfo, space: IdSpace) -> Result<Self> {
        if !space.contains(info.id) {
            return Err(Error::invalid(format!(
                "identifier {} is outside of a {} bits ring",
                info.id,
                space.bits()
            )));
        }
        Ok(Self {
            finger: Arc::new(Mutex::new(FingerTable::new(info.clone(), space))),
            successor: Arc::new(Mutex::new(info.clone())),
            predecessor: Arc::new(Mutex::new(None)),
            storage: MemStorage::new(),
            space,
            info,
        })
    }

    /// Did of current node.
    pub fn did(&self) -> Did {
        self.info.id
    }

    /// Lock and return MutexGuard of successor.
    pub fn lock_successor(&self) -> Result<MutexGuard<'_, NodeInfo>> {
        self.successor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of finger table.
    pub fn lock_finger(&self) -> Result<MutexGuard<'_, FingerTable>> {
        self.finger.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of predecessor.
    pub fn lock_predecessor(&self) -> Result<MutexGuard<'_, Option<NodeInfo>>> {
        self.predecessor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Snapshot of successor.
    pub fn successor(&self) -> Result<NodeInfo> {
        Ok(self.lock_successor()?.clone())
    }

    /// Snapshot of predecessor.
    pub fn predecessor(&self) -> Result<Option<NodeInfo>> {
        Ok(self.lock_predecessor()?.clone())
    }

    /// Replace successor. Finger 0 mirrors it and the rest of the table
    /// learns about the node.
    pub fn set_successor(&self, node: NodeInfo) -> Result<()> {
        let mut successor = self.lock_successor()?;
        let mut finger = self.lock_finger()?;
        tracing::debug!("{} set successor {}", self.info, node);
        finger.set(0, node.clone());
        finger.join(&node);
        *successor = node;
        Ok(())
    }

    /// Store the result of a finger lookup.
    pub fn set_finger(&self, index: usize, node: NodeInfo) -> Result<()> {
        if index >= self.space.bits() as usize {
            return Err(Error::FingerIndexOutOfRange(index));
        }
        if index == 0 {
            return self.set_successor(node);
        }
        self.lock_finger()?.set(index, node);
        Ok(())
    }

    /// Remove a failed node from the ring state.
    /// A matching predecessor is cleared. If it was the successor, fall back
    /// to the nearest remaining finger, or to self.
    pub fn remove(&self, did: Did) -> Result<()> {
        let mut predecessor = self.lock_predecessor()?;
        let mut successor = self.lock_successor()?;
        let mut finger = self.lock_finger()?;
        if predecessor.as_ref().map(|p| p.id) == Some(did) {
            *predecessor = None;
        }
        finger.remove(did);
        if successor.id == did {
            let next = finger.first().unwrap_or_else(|| self.info.clone());
            tracing::info!("{} lost successor {}, fall back to {}", self.info, did, next);
            finger.set(0, next.clone());
            *successor = next;
        }
        Ok(())
    }

    /// Whether `did` lies in the ownership interval (predecessor, self].
    /// Without predecessor the node owns the whole ring.
    pub fn owns(&self, did: Did) -> Result<bool> {
        Ok(match &*self.lock_predecessor()? {
            Some(pred) => self.space.between_right_incl(pred.id, did, self.info.id),
            None => true,
        })
    }

    /// All values bound under `key` on this node.
    pub fn get(&self, key: &str) -> Vec<String> {
        self.storage.get(key)
    }

    /// Bind `value` under `key` on this node.
    pub fn add(&self, key: &str, value: &str) -> Result<()> {
        let _predecessor = self.lock_predecessor()?;
        self.storage.add(key, value);
        Ok(())
    }

    /// Remove one binding from this node.
    pub fn delete(&self, key: &str, value: &str) -> Result<()> {
        let _predecessor = self.lock_predecessor()?;
        self.storage.delete(key, value)
    }

    /// Install bindings handed over by the successor.
    pub fn install(&self, rows: Vec<TableRow>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        tracing::info!("{} install {} keys", self.info, rows.len());
        let _predecessor = self.lock_predecessor()?;
        self.storage.install(rows);
        Ok(())
    }
}

impl Chord<PeerRingAction> for PeerRing {
    /// Take `successor` as the successor, forget any predecessor.
    /// The successor learns about us on our next stabilize.
    fn join(&self, successor: NodeInfo) -> Result<PeerRingAction> {
        if successor.id == self.info.id && successor.addr != self.info.addr {
            return Err(Error::invalid(format!(
                "identifier {} is already taken by {}",
                self.info.id, successor.addr
            )));
        }
        *self.lock_predecessor()? = None;
        self.set_successor(successor)?;
        Ok(PeerRingAction::None)
    }

    /// Find the successor of a Did.
    /// May return a remote action for the successor is recorded in another node.
    fn find_successor(&self, did: Did) -> Result<PeerRingAction> {
        let successor = self.successor()?;
        let action = if self.space.between_right_incl(self.info.id, did, successor.id) {
            PeerRingAction::Some(successor)
        } else {
            let closest = self.closest_preceding_finger(did)?;
            // Nothing closer than self in fingers, so walk to the successor.
            let next = if closest == self.info {
                successor
            } else {
                closest
            };
            PeerRingAction::RemoteAction(next, RemoteAction::FindSuccessor(did))
        };
        tracing::debug!(
            "find_successor: self: {}, did: {}, result: {:?}",
            self.info,
            did,
            action
        );
        Ok(action)
    }

    fn closest_preceding_finger(&self, did: Did) -> Result<NodeInfo> {
        Ok(self.lock_finger()?.closest_preceding(did))
    }

    /// Accept `candidate` if there is no predecessor or it lies strictly
    /// between the predecessor and self. On acceptance the bindings that now
    /// belong to the candidate are removed from local storage and returned.
    fn notify(&self, candidate: NodeInfo) -> Result<Option<Vec<TableRow>>> {
        if candidate.id == self.info.id {
            return Ok(None);
        }
        let mut predecessor = self.lock_predecessor()?;
        let space = self.space;
        let candidate_id = candidate.id;
        let moved = match &*predecessor {
            Some(pred) if !space.between(pred.id, candidate_id, self.info.id) => {
                tracing::debug!("{} reject predecessor {}, keep {}", self.info, candidate, pred);
                return Ok(None);
            }
            Some(pred) => {
                let pred_id = pred.id;
                self.storage.extract(|k| {
                    space.between_right_incl(pred_id, space.hash_key(k), candidate_id)
                })
            }
            None => {
                let self_id = self.info.id;
                self.storage.extract(|k| {
                    !space.between_right_incl(candidate_id, space.hash_key(k), self_id)
                })
            }
        };
        tracing::info!(
            "{} accept predecessor {}, hand over {} keys",
            self.info,
            candidate,
            moved.len()
        );
        self.lock_finger()?.join(&candidate);
        *predecessor = Some(candidate);
        Ok(Some(moved))
    }

    /// Adopt the successor's predecessor if it sits between self and the
    /// successor, then ask to notify the (new) successor.
    fn stabilize(&self, succ_pred: Option<NodeInfo>) -> Result<PeerRingAction> {
        if let Some(p) = succ_pred {
            let successor = self.successor()?;
            if self.space.between(self.info.id, p.id, successor.id) {
                self.set_successor(p)?;
            }
        }
        let successor = self.successor()?;
        if successor == self.info {
            return Ok(PeerRingAction::None);
        }
        Ok(PeerRingAction::RemoteAction(
            successor,
            RemoteAction::Notify(self.info.clone()),
        ))
    }

    /// Fix the finger at the rotating index.
    /// According to the paper, this method should be called periodically.
    fn fix_fingers(&self) -> Result<PeerRingAction> {
        let (index, start) = {
            let mut finger = self.lock_finger()?;
            let index = finger.next_fix_index();
            (index, finger.start(index))
        };

        // Caution here that there are also locks in find_successor.
        // The finger table must not be locked before calling it.
        match self.find_successor(start)? {
            PeerRingAction::Some(node) => {
                self.set_finger(index, node)?;
                Ok(PeerRingAction::None)
            }
            PeerRingAction::RemoteAction(next, RemoteAction::FindSuccessor(did)) => Ok(
                PeerRingAction::RemoteAction(next, RemoteAction::FindSuccessorForFix(index, did)),
            ),
            act => Err(Error::PeerRingUnexpectedAction(act)),
        }
    }
}
