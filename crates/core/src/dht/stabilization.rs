//! Stabilization run daemons to maintain dht.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::dht::Chord;
use crate::dht::NodeInfo;
use crate::dht::PeerRing;
use crate::dht::PeerRingAction;
use crate::dht::PeerRingRemoteAction;
use crate::dht::TableRep;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::Swarm;
use crate::transport::Transport;

/// The stabilization runner.
#[derive(Clone)]
pub struct Stabilizer {
    swarm: Arc<Swarm>,
    transport: Arc<dyn Transport>,
    dht: Arc<PeerRing>,
}

impl Stabilizer {
    /// Create a new stabilization runner.
    pub fn new(swarm: Arc<Swarm>) -> Self {
        let dht = swarm.dht();
        let transport = swarm.transport();
        Self {
            swarm,
            transport,
            dht,
        }
    }

    /// Run stabilization once.
    pub async fn stabilize(&self) -> Result<()> {
        tracing::debug!("STABILIZATION check_predecessor start");
        if let Err(e) = self.check_predecessor().await {
            tracing::error!("[stabilize] Failed on check predecessor {:?}", e);
        }
        tracing::debug!("STABILIZATION check_predecessor end");
        tracing::debug!("STABILIZATION notify_successor start");
        let res = self.notify_successor().await;
        tracing::debug!("STABILIZATION notify_successor end");
        res
    }

    /// Clear the predecessor if it does not answer a probe.
    pub async fn check_predecessor(&self) -> Result<()> {
        let Some(predecessor) = self.dht.predecessor()? else {
            return Ok(());
        };
        if predecessor == self.dht.info {
            return Ok(());
        }
        if self.transport.is_failed(&predecessor).await {
            tracing::warn!("STABILIZATION predecessor {} failed", predecessor);
            self.dht.remove(predecessor.id)?;
        }
        Ok(())
    }

    /// Ask the successor for its predecessor, adopt it when it is closer,
    /// then notify the successor and install the bindings it hands over.
    pub async fn notify_successor(&self) -> Result<()> {
        let successor = self.dht.successor()?;
        let succ_pred = if successor == self.dht.info {
            self.dht.predecessor()?
        } else {
            match self.transport.get_pred(&successor).await {
                Ok(p) => p,
                Err(e) => {
                    self.check_successor_failure(&successor).await?;
                    return Err(e);
                }
            }
        };

        match self.dht.stabilize(succ_pred)? {
            PeerRingAction::None => Ok(()),
            PeerRingAction::RemoteAction(next, PeerRingRemoteAction::Notify(info)) => {
                tracing::debug!("STABILIZATION notify_successor: {}", next);
                let res = self.transport.notify(&next, TableRep::notify(info)).await;
                match res {
                    Ok(Some(record)) => self.dht.install(record.entry),
                    Ok(None) => Ok(()),
                    Err(e) => {
                        self.check_successor_failure(&next).await?;
                        Err(e)
                    }
                }
            }
            act => Err(Error::PeerRingUnexpectedAction(act)),
        }
    }

    async fn check_successor_failure(&self, successor: &NodeInfo) -> Result<()> {
        if self.transport.is_failed(successor).await {
            tracing::warn!("STABILIZATION successor {} failed", successor);
            self.dht.remove(successor.id)?;
        }
        Ok(())
    }

    /// Fix one finger from finger table, this is a DHT operation.
    pub async fn fix_fingers(&self) -> Result<()> {
        match self.dht.fix_fingers()? {
            PeerRingAction::None => Ok(()),
            PeerRingAction::RemoteAction(
                next,
                PeerRingRemoteAction::FindSuccessorForFix(index, did),
            ) => {
                tracing::debug!("STABILIZATION fix_fingers: {} {}", index, did);
                let node = self
                    .swarm
                    .route(PeerRingAction::RemoteAction(
                        next,
                        PeerRingRemoteAction::FindSuccessor(did),
                    ))
                    .await?;
                self.dht.set_finger(index, node)
            }
            act => {
                tracing::error!("Invalid PeerRing Action");
                Err(Error::PeerRingUnexpectedAction(act))
            }
        }
    }

    /// Run stabilization in a loop until `token` is cancelled.
    pub async fn wait(self: Arc<Self>, interval: Duration, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => self
                    .stabilize()
                    .await
                    .unwrap_or_else(|e| tracing::error!("failed to stabilize {:?}", e)),
            }
        }
        tracing::debug!("stabilize loop of {} stopped", self.dht.info);
    }

    /// Run fix fingers in a loop until `token` is cancelled.
    pub async fn wait_fix_fingers(self: Arc<Self>, interval: Duration, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => self
                    .fix_fingers()
                    .await
                    .unwrap_or_else(|e| tracing::warn!("failed to fix fingers {:?}", e)),
            }
        }
        tracing::debug!("fix fingers loop of {} stopped", self.dht.info);
    }
}
