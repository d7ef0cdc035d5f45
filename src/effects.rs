use std::sync::{Arc, Mutex, mpsc};

/// Mode transitions a stage reports outward (e.g. to an audio collaborator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectSignal {
    /// Pointer pressed: rigs switched to excited mode.
    Excited,
    /// Pointer released: rigs back to idle.
    Idle,
}

/// Receiver of [`EffectSignal`]s. The stage never waits on or reads back from a sink.
pub trait EffectSink {
    fn signal(&mut self, signal: EffectSignal);
}

/// Drops every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn signal(&mut self, _signal: EffectSignal) {}
}

/// Keeps every signal; clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingEffects {
    log: Arc<Mutex<Vec<EffectSignal>>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<EffectSignal> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EffectSink for RecordingEffects {
    fn signal(&mut self, signal: EffectSignal) {
        match self.log.lock() {
            Ok(mut log) => log.push(signal),
            Err(poisoned) => poisoned.into_inner().push(signal),
        }
    }
}

impl EffectSink for mpsc::Sender<EffectSignal> {
    fn signal(&mut self, signal: EffectSignal) {
        // A hung-up listener is not the stage's problem.
        let _ = self.send(signal);
    }
}

#[cfg(test)]
#[path = "../tests/unit/effects.rs"]
mod tests;
