//! Session pooling
//!
//! Allocating a fresh arena per frame would churn the allocator; instead a
//! painter keeps released arenas and hands them back out on the next
//! acquire, reset but with their pool capacity intact. One painter serves
//! any number of sequential frames; for parallel viewport tiles, acquire
//! one session per tile up front.

use crate::backend::ImageTable;
use crate::config::PaintConfig;
use crate::paint::arena::PaintArena;
use crate::paint::session::{PaintSession, RenderContext};

/// Factory and reuse pool for [`PaintSession`]s
pub struct Painter {
    config: PaintConfig,
    free: Vec<PaintArena>,
}

impl Painter {
    /// Create a painter with the given pool capacities
    #[must_use]
    pub fn new(config: PaintConfig) -> Self {
        Self {
            config,
            free: Vec::new(),
        }
    }

    /// Take a session for one render pass, reusing a released arena when
    /// one is available.
    #[must_use]
    pub fn acquire<'a>(&mut self, images: &'a dyn ImageTable, ctx: RenderContext) -> PaintSession<'a> {
        let arena = match self.free.pop() {
            Some(mut arena) => {
                arena.reset();
                arena
            }
            None => {
                log::trace!("painter pool empty, allocating arena");
                PaintArena::new(&self.config)
            }
        };
        PaintSession::new(images, ctx, arena)
    }

    /// Return a finished session's arena to the pool
    pub fn release(&mut self, session: PaintSession<'_>) {
        self.free.push(session.into_arena());
    }

    /// Number of arenas currently idle in the pool
    #[must_use]
    pub fn idle_arenas(&self) -> usize {
        self.free.len()
    }
}
