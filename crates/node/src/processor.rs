#![warn(missing_docs)]

//! Processor of a chordring node: the swarm plus its maintenance daemons.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::error::Result;
use crate::prelude::chordring_core::inspect::SwarmInspect;
use crate::prelude::chordring_rpc::types::Timeout;
use crate::prelude::Did;
use crate::prelude::HttpTransport;
use crate::prelude::IdSpace;
use crate::prelude::NodeInfo;
use crate::prelude::Stabilizer;
use crate::prelude::Swarm;
use crate::prelude::SwarmBuilder;
use crate::prelude::Transport;

/// Runtime parameters of a [Processor], usually built from a
/// [crate::native::config::Config].
#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    /// The identifier space.
    pub space: IdSpace,
    /// Identity advertised to other nodes.
    pub info: NodeInfo,
    /// Member to join through, `None` creates a new ring.
    pub introducer: Option<Url>,
    /// Period of stabilize.
    pub stabilize_interval: Duration,
    /// Period of fix_fingers.
    pub fix_fingers_interval: Duration,
    /// Bound of every remote call.
    pub request_timeout: Timeout,
    /// Hop budget of a lookup.
    pub max_hops: Option<usize>,
}

/// Builder of [Processor].
pub struct ProcessorBuilder {
    config: ProcessorConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ProcessorBuilder {
    /// initialize a [ProcessorBuilder] with a [ProcessorConfig].
    pub fn from_config(config: ProcessorConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Replace the default [HttpTransport].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the [Processor].
    pub fn build(self) -> Result<Processor> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(self.config.request_timeout)?),
        };
        let mut builder =
            SwarmBuilder::new(self.config.info.clone(), self.config.space, transport);
        if let Some(max_hops) = self.config.max_hops {
            builder = builder.max_hops(max_hops);
        }
        let swarm = Arc::new(builder.build()?);
        let stabilizer = Arc::new(Stabilizer::new(swarm.clone()));

        Ok(Processor {
            swarm,
            stabilizer,
            config: self.config,
            token: CancellationToken::new(),
            daemons: Mutex::new(vec![]),
        })
    }
}

/// Processor owns a [Swarm] and the daemons keeping it stable.
pub struct Processor {
    /// a swarm instance
    pub swarm: Arc<Swarm>,
    stabilizer: Arc<Stabilizer>,
    config: ProcessorConfig,
    token: CancellationToken,
    daemons: Mutex<Vec<JoinHandle<()>>>,
}

impl Processor {
    /// Get current did
    pub fn did(&self) -> Did {
        self.swarm.did()
    }

    /// The stabilization runner of this node.
    pub fn stabilizer(&self) -> Arc<Stabilizer> {
        self.stabilizer.clone()
    }

    /// Join the ring of the configured introducer, or create a new ring
    /// when there is none.
    pub async fn join_or_create(&self) -> Result<()> {
        match &self.config.introducer {
            Some(introducer) => self.swarm.join(introducer).await?,
            None => self.swarm.create()?,
        }
        Ok(())
    }

    /// Spawn stabilize and fix_fingers as independent tasks.
    pub fn listen(&self) -> Result<()> {
        let mut daemons = self
            .daemons
            .lock()
            .map_err(|_| Error::TaskError("daemon registry poisoned".to_string()))?;
        if !daemons.is_empty() {
            return Ok(());
        }
        daemons.push(tokio::spawn(self.stabilizer.clone().wait(
            self.config.stabilize_interval,
            self.token.child_token(),
        )));
        daemons.push(tokio::spawn(self.stabilizer.clone().wait_fix_fingers(
            self.config.fix_fingers_interval,
            self.token.child_token(),
        )));
        tracing::info!(
            "{} stabilize every {:?}, fix fingers every {:?}",
            self.swarm.info(),
            self.config.stabilize_interval,
            self.config.fix_fingers_interval
        );
        Ok(())
    }

    /// Token cancelled by [Processor::shutdown], other services of the node
    /// may stop on it.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop the daemons and wait for them to finish.
    pub async fn shutdown(&self) -> Result<()> {
        self.token.cancel();
        let daemons = {
            let mut daemons = self
                .daemons
                .lock()
                .map_err(|_| Error::TaskError("daemon registry poisoned".to_string()))?;
            std::mem::take(&mut *daemons)
        };
        for handle in daemons {
            handle
                .await
                .map_err(|e| Error::TaskError(e.to_string()))?;
        }
        tracing::info!("{} stopped", self.swarm.info());
        Ok(())
    }

    /// Snapshot of the node.
    pub fn inspect(&self) -> Result<SwarmInspect> {
        Ok(self.swarm.inspect()?)
    }
}
