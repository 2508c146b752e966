//! Channel boundary between the landmark callback and the frame loop.
//!
//! The tracker callback only sends batches; the frame loop drains every
//! pending batch through the [`HandTracker`] before ticking the simulation, so
//! debounce counts camera frames and never display frames.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::hand::{HandState, HandTracker};
use crate::landmarks::LandmarkBatch;
use crate::world::WorldMapper;

/// Cheap cloneable handle given to whatever produces landmarks.
#[derive(Clone, Debug)]
pub struct LandmarkSender {
    tx: Sender<LandmarkBatch>,
}

impl LandmarkSender {
    /// Returns `false` once the pipeline has been dropped.
    pub fn send(&self, batch: LandmarkBatch) -> bool {
        self.tx.send(batch).is_ok()
    }
}

pub struct HandPipeline {
    rx: Receiver<LandmarkBatch>,
    tracker: HandTracker,
    latest: HandState,
}

impl HandPipeline {
    pub fn new(tracker: HandTracker) -> (Self, LandmarkSender) {
        let (tx, rx) = mpsc::channel();
        let pipeline = Self {
            rx,
            tracker,
            latest: HandState::default(),
        };
        (pipeline, LandmarkSender { tx })
    }

    pub fn tracker_mut(&mut self) -> &mut HandTracker {
        &mut self.tracker
    }

    /// Ingest all queued batches in arrival order; returns the newest snapshot.
    pub fn pump(&mut self, mapper: &impl WorldMapper) -> &HandState {
        loop {
            match self.rx.try_recv() {
                Ok(batch) => self.latest = self.tracker.ingest(&batch, mapper),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("landmark senders dropped");
                    break;
                }
            }
        }
        &self.latest
    }

    pub fn latest(&self) -> &HandState {
        &self.latest
    }
}
