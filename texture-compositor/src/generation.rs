//! Generation tags for discarding superseded computes.
use crate::error::CompositorError;
use crate::texture::CompositeTexture;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic generation counter shared by one session and its in-flight computes.
#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    latest: Arc<AtomicU64>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new compute. Every earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Make every outstanding ticket stale without starting a compute.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Handle carried by one compute.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    /// Ticket not tied to any session, for one-shot computes (CLI, tests).
    pub fn detached() -> Self {
        GenerationTracker::new().begin()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// `Ok` while current, `StaleComputeDiscarded` once superseded.
    pub fn check(&self) -> Result<(), CompositorError> {
        let latest = self.latest.load(Ordering::Acquire);
        if latest == self.generation {
            Ok(())
        } else {
            Err(CompositorError::StaleComputeDiscarded {
                generation: self.generation,
                latest,
            })
        }
    }
}

/// Last committed composite of a session.
///
/// Commits from stale tickets are refused, so a slow older compute can never
/// overwrite a newer result.
#[derive(Debug, Default, Clone)]
pub struct CompositeSlot {
    current: Option<CompositeTexture>,
    committed_generation: u64,
}

impl CompositeSlot {
    pub fn commit(
        &mut self,
        ticket: &Ticket,
        texture: CompositeTexture,
    ) -> Result<&CompositeTexture, CompositorError> {
        ticket.check()?;
        if ticket.generation() < self.committed_generation {
            return Err(CompositorError::StaleComputeDiscarded {
                generation: ticket.generation(),
                latest: self.committed_generation,
            });
        }
        self.committed_generation = ticket.generation();
        Ok(self.current.insert(texture))
    }

    pub fn current(&self) -> Option<&CompositeTexture> {
        self.current.as_ref()
    }

    pub fn committed_generation(&self) -> u64 {
        self.committed_generation
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
