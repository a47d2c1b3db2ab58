use std::fs;
use std::io;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::error::Result;
use crate::prelude::chordring_core::consts::DEFAULT_FIX_FINGERS_INTERVAL_MS;
use crate::prelude::chordring_core::consts::DEFAULT_ID_BITS;
use crate::prelude::chordring_core::consts::DEFAULT_REQUEST_TIMEOUT_MS;
use crate::prelude::chordring_core::consts::DEFAULT_STABILIZE_INTERVAL_MS;
use crate::prelude::chordring_rpc::types::Timeout;
use crate::prelude::IdSpace;
use crate::prelude::NodeInfo;
use crate::processor::ProcessorConfig;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_CONFIG_PATH: &str = "~/.chordring/config.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:50000";
pub const DEFAULT_EXTERNAL_URL: &str = "http://127.0.0.1:50000/";

/// Configuration of a node, stored as YAML.
/// Every field may be omitted from the file and then takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// m, the ring holds 2^m identifiers.
    pub id_bits: u8,
    /// Explicit position on the ring. Defaults to the hash of `external_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<u64>,
    /// Socket address the http server listens on.
    pub bind_addr: String,
    /// Address advertised to other nodes.
    pub external_url: String,
    /// Any member of the ring to join. A new ring is created when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introducer: Option<String>,
    pub stabilize_interval_ms: u64,
    pub fix_fingers_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Hop budget of a lookup, 2·m when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_bits: DEFAULT_ID_BITS,
            node_id: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            external_url: DEFAULT_EXTERNAL_URL.to_string(),
            introducer: None,
            stabilize_interval_ms: DEFAULT_STABILIZE_INTERVAL_MS,
            fix_fingers_interval_ms: DEFAULT_FIX_FINGERS_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_hops: None,
        }
    }
}

impl TryFrom<Config> for ProcessorConfig {
    type Error = Error;
    fn try_from(config: Config) -> Result<Self> {
        let space = IdSpace::new(config.id_bits)?;
        let addr = Url::parse(&config.external_url)?;
        let id = match config.node_id {
            Some(id) if id >= space.size() => {
                return Err(Error::InvalidNodeId(id, config.id_bits));
            }
            Some(id) => space.did(id),
            None => space.hash_key(addr.as_str()),
        };
        let introducer = config
            .introducer
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        Ok(Self {
            space,
            info: NodeInfo::new(id, addr),
            introducer,
            stabilize_interval: Duration::from_millis(config.stabilize_interval_ms),
            fix_fingers_interval: Duration::from_millis(config.fix_fingers_interval_ms),
            request_timeout: Timeout::from(config.request_timeout_ms),
            max_hops: config.max_hops,
        })
    }
}

impl Config {
    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self).map_err(|e| Error::SerializeError(e.to_string()))?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        serde_yaml::from_reader(f_rdr).map_err(|e| Error::DeserializeError(e.to_string()))
    }
}
