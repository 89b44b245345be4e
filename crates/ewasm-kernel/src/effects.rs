//! Deferred host effects
//!
//! Host functions do not touch kernel bookkeeping directly. They queue an
//! [`Effect`] and the kernel applies the queue when the caller awaits
//! `on_done`, so gas and return data are only observable after that point.

use ewasm_primitives::Gas;
use tokio::sync::mpsc;

/// Side effect raised by a host function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Charge gas
    UseGas(Gas),
    /// Stage a return payload
    Return(Vec<u8>),
    /// Stage a revert payload
    Revert(Vec<u8>),
}

/// Producer half, owned by the host state of a store
#[derive(Debug, Clone)]
pub struct EffectSender(mpsc::UnboundedSender<Effect>);

impl EffectSender {
    /// Queue an effect
    pub fn push(&self, effect: Effect) -> anyhow::Result<()> {
        self.0
            .send(effect)
            .map_err(|e| anyhow::anyhow!("effect queue closed: {:?}", e.0))
    }
}

/// Consumer half, owned by the kernel
#[derive(Debug)]
pub struct EffectQueue(mpsc::UnboundedReceiver<Effect>);

impl EffectQueue {
    /// Wait for pending effects and take them in the order they were raised
    pub async fn settle(&mut self) -> Vec<Effect> {
        tokio::task::yield_now().await;
        let mut settled = Vec::new();
        while let Ok(effect) = self.0.try_recv() {
            settled.push(effect);
        }
        settled
    }
}

/// Create a connected sender/queue pair
pub fn channel() -> (EffectSender, EffectQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EffectSender(tx), EffectQueue(rx))
}
