#![warn(missing_docs)]
use std::ops::Index;

use derivative::Derivative;
use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::dht::IdSpace;
use crate::dht::NodeInfo;

/// Finger table of Chord DHT.
/// Entry `i` approximates the successor of `did + 2^i`. Entries may be stale,
/// they only shorten lookups and are never trusted for correctness.
/// An entry pointing to the owner means "nothing better known".
#[derive(Derivative, Clone, Debug, Serialize, Deserialize)]
#[derivative(PartialEq)]
pub struct FingerTable {
    owner: NodeInfo,
    space: IdSpace,
    finger: Vec<NodeInfo>,
    #[derivative(PartialEq = "ignore")]
    pub(super) fix_finger_index: usize,
}

impl FingerTable {
    /// builder, every entry starts as the owner itself
    pub fn new(owner: NodeInfo, space: IdSpace) -> Self {
        let size = space.bits() as usize;
        Self {
            finger: vec![owner.clone(); size],
            owner,
            space,
            fix_finger_index: 0,
        }
    }

    /// Number of entries, always `m`.
    pub fn size(&self) -> usize {
        self.finger.len()
    }

    /// Number of entries pointing to another node.
    pub fn len(&self) -> usize {
        self.finger.iter().filter(|x| **x != self.owner).count()
    }

    /// Returns `true` if no entry points to another node.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<&NodeInfo> {
        self.finger.get(index)
    }

    /// Start of entry `index`.
    pub fn start(&self, index: usize) -> Did {
        self.space.finger_start(self.owner.id, index)
    }

    /// setter
    pub fn set(&mut self, index: usize, node: NodeInfo) {
        tracing::debug!("set finger table index: {} node: {}", index, node);
        if index >= self.finger.len() {
            tracing::error!("set finger index out of range, index: {}", index);
            return;
        }
        self.finger[index] = node;
    }

    /// Return the index to fix in this round and move the cursor forward.
    pub fn next_fix_index(&mut self) -> usize {
        let index = self.fix_finger_index;
        self.fix_finger_index = (index + 1) % self.finger.len();
        index
    }

    /// Nearest node after the owner among all entries, if any.
    pub fn first(&self) -> Option<NodeInfo> {
        self.finger
            .iter()
            .filter(|x| **x != self.owner)
            .min_by_key(|x| self.space.bias(self.owner.id, x.id))
            .cloned()
    }

    /// Remove a failed node from the finger table.
    /// Each run of entries pointing to it is replaced with the entry right
    /// after the run, or the owner when the run reaches the end.
    pub fn remove(&mut self, did: Did) {
        let size = self.finger.len();
        let mut idx = 0;
        while idx < size {
            if self.finger[idx].id != did {
                idx += 1;
                continue;
            }
            let start = idx;
            while idx < size && self.finger[idx].id == did {
                idx += 1;
            }
            let fill = self
                .finger
                .get(idx)
                .cloned()
                .unwrap_or_else(|| self.owner.clone());
            for entry in &mut self.finger[start..idx] {
                *entry = fill.clone();
            }
        }
    }

    /// Learn about `node`: every entry for which it is a closer successor of
    /// the entry start than the current value is updated.
    pub fn join(&mut self, node: &NodeInfo) {
        if *node == self.owner {
            return;
        }
        for k in 0..self.finger.len() {
            let start = self.start(k);
            // Entries still holding the owner compete with the owner's own position.
            if self.space.bias(start, node.id) < self.space.bias(start, self.finger[k].id) {
                self.finger[k] = node.clone();
            }
        }
    }

    /// Check finger is contains some node
    pub fn contains(&self, did: Did) -> bool {
        self.finger.iter().any(|x| x.id == did)
    }

    /// Scan from the highest entry down and return the first one strictly
    /// between the owner and `did`. Returns the owner if none qualifies.
    pub fn closest_preceding(&self, did: Did) -> NodeInfo {
        for entry in self.finger.iter().rev() {
            if self.space.between(self.owner.id, entry.id, did) {
                return entry.clone();
            }
        }
        self.owner.clone()
    }

    /// get finger list
    pub fn list(&self) -> &Vec<NodeInfo> {
        &self.finger
    }
}

impl Index<usize> for FingerTable {
    type Output = NodeInfo;
    fn index(&self, index: usize) -> &Self::Output {
        &self.finger[index]
    }
}
