//! Identifier space of the ring.
//!
//! A [Did] is a position on a finite ring R(P) where P = 2^m. All ring
//! comparisons go through [IdSpace], which knows `m`, so wraparound at
//! `0 / 2^m - 1` is handled in exactly one place.
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use sha1::Digest;
use sha1::Sha1;

use crate::error::Error;
use crate::error::Result;

/// Did is an identifier on the ring. It only has meaning together with the
/// [IdSpace] it was reduced into.
#[derive(Copy, Clone, Eq, Ord, PartialEq, PartialOrd, Debug, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Did(u64);

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw conversion, the value is not reduced. Use [IdSpace::did] for that.
impl From<u64> for Did {
    fn from(id: u64) -> Did {
        Did(id)
    }
}

impl From<Did> for u64 {
    fn from(did: Did) -> u64 {
        did.0
    }
}

impl FromStr for Did {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<u64>()
            .map(Did)
            .map_err(|_| Error::invalid(format!("bad identifier {s}")))
    }
}

/// The m-bit identifier space.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct IdSpace {
    bits: u8,
}

impl IdSpace {
    /// Create an identifier space of `bits` bits.
    pub fn new(bits: u8) -> Result<Self> {
        if bits == 0 || bits > 63 {
            return Err(Error::InvalidIdSpace(bits));
        }
        Ok(Self { bits })
    }

    /// Number of bits, which is also the number of finger entries.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// 2^m
    pub fn size(&self) -> u64 {
        1u64 << self.bits
    }

    /// Reduce an integer into the ring.
    pub fn did(&self, v: u64) -> Did {
        Did(v % self.size())
    }

    /// Check that a did was produced by this space.
    pub fn contains(&self, did: Did) -> bool {
        did.0 < self.size()
    }

    /// Clockwise distance from `a` to `b`.
    pub fn distance(&self, a: Did, b: Did) -> u64 {
        b.0.wrapping_sub(a.0) % self.size()
    }

    /// Position of `did` seen from `base`, i.e. `did - base` on the ring.
    pub fn bias(&self, base: Did, did: Did) -> u64 {
        self.distance(base, did)
    }

    /// Whether x lies in the open arc (a, b). With a == b that is the whole
    /// ring except a.
    pub fn between(&self, a: Did, x: Did, b: Did) -> bool {
        let dx = self.bias(a, x);
        if a == b {
            return dx != 0;
        }
        dx > 0 && dx < self.bias(a, b)
    }

    /// Whether x lies in the arc (a, b]. With a == b that is the whole ring.
    pub fn between_right_incl(&self, a: Did, x: Did, b: Did) -> bool {
        if a == b {
            return true;
        }
        let dx = self.bias(a, x);
        dx > 0 && dx <= self.bias(a, b)
    }

    /// Start of the i-th finger of `did`: (did + 2^i) mod 2^m.
    pub fn finger_start(&self, did: Did, index: usize) -> Did {
        let offset = 1u64 << (index as u32 % self.bits as u32);
        self.did(did.0.wrapping_add(offset))
    }

    /// Hash a key onto the ring with the first eight bytes of its sha1.
    pub fn hash_key(&self, key: &str) -> Did {
        let mut hasher = Sha1::new();
        hasher.update(key.as_bytes());
        let bytes = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&bytes[..8]);
        self.did(u64::from_be_bytes(head))
    }
}

/// Sort dids clockwise, starting from a base did.
pub trait SortRing {
    /// Order by clockwise distance from `base`.
    fn sort_ring(&mut self, space: &IdSpace, base: Did);
}

impl SortRing for Vec<Did> {
    fn sort_ring(&mut self, space: &IdSpace, base: Did) {
        self.sort_by_key(|x| space.bias(base, *x));
    }
}
