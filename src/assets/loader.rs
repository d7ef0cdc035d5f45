use std::sync::{Arc, mpsc};

use crate::assets::decode::parse_svg;
use crate::foundation::error::{MarionetteError, MarionetteResult};

/// Where decode jobs run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// On the rayon global pool; results arrive on a later tick.
    #[default]
    Background,
    /// On the submitting thread; results are still delivered through the queue.
    Inline,
}

/// Completion of one decode job, addressed to a constraint slot.
#[derive(Debug)]
pub struct DecodeEvent {
    pub slot: usize,
    pub result: MarionetteResult<Arc<usvg::Tree>>,
}

/// Decode job queue.
///
/// Jobs may finish at any time; their results sit in a channel until the simulation thread
/// drains it, so loaded-state bookkeeping never happens inside a worker.
pub struct ArtLoader {
    mode: DecodeMode,
    tx: mpsc::Sender<DecodeEvent>,
    rx: mpsc::Receiver<DecodeEvent>,
    pending: usize,
}

impl std::fmt::Debug for ArtLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtLoader")
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .finish()
    }
}

impl ArtLoader {
    pub fn new(mode: DecodeMode) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            mode,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Jobs submitted whose events have not been drained yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn submit(&mut self, slot: usize, markup: Arc<str>) {
        self.pending += 1;
        match self.mode {
            DecodeMode::Inline => {
                let result = parse_svg(markup.as_bytes());
                // The receiver lives in `self`, so this send cannot fail.
                let _ = self.tx.send(DecodeEvent { slot, result });
            }
            DecodeMode::Background => {
                let tx = self.tx.clone();
                rayon::spawn(move || {
                    let result = parse_svg(markup.as_bytes());
                    // A dropped receiver means the rig is gone; nothing left to notify.
                    let _ = tx.send(DecodeEvent { slot, result });
                });
            }
        }
    }

    /// Take every completion that has arrived so far without blocking.
    pub fn drain(&mut self) -> Vec<DecodeEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            out.push(ev);
        }
        self.pending = self.pending.saturating_sub(out.len());
        out
    }

    /// Block until every submitted job has reported back.
    pub fn wait(&mut self) -> MarionetteResult<Vec<DecodeEvent>> {
        let mut out = self.drain();
        while self.pending > 0 {
            let ev = self.rx.recv().map_err(|_| {
                MarionetteError::decode("decode channel disconnected unexpectedly")
            })?;
            self.pending -= 1;
            out.push(ev);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
