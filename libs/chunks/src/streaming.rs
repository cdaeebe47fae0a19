use bevy::log::{debug, warn};
use glam::{IVec2, Vec2};
use std::fmt;

use crate::content::{self, ContentBackend};
use crate::index::{ChunkRecord, SpatialIndex};
use crate::seed::cell_seed;
use crate::types::GenerationParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamAction {
    Spawned(IVec2),
    Despawned(IVec2),
}

#[derive(Debug)]
pub enum StreamError<E> {
    Materialize { cell: IVec2, source: E },
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Materialize { cell, source } => {
                write!(f, "failed to materialize chunk {cell}: {source}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for StreamError<E> {}

/// Cell containing `position`, rounding half-way points to the even cell.
pub fn center_cell(position: Vec2, chunk_size: f32) -> IVec2 {
    let scaled = position / chunk_size;
    IVec2::new(
        scaled.x.round_ties_even() as i32,
        scaled.y.round_ties_even() as i32,
    )
}

/// Square block of cells that should be live, bounds inclusive.
///
/// The block spans `size` cells starting `size / 2` below the center, so an
/// even size sits one cell further toward negative coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamWindow {
    pub min: IVec2,
    pub max: IVec2,
}

impl StreamWindow {
    pub fn around(center: IVec2, size: u32) -> Self {
        let size = size.max(1).min(i32::MAX as u32) as i32;
        let min = center.saturating_sub(IVec2::splat(size / 2));
        let max = min.saturating_add(IVec2::splat(size - 1));
        Self { min, max }
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.cmpge(self.min).all() && cell.cmple(self.max).all()
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| (min.y..=max.y).map(move |y| IVec2::new(x, y)))
    }

    pub fn cell_count(&self) -> usize {
        let extent = (self.max - self.min + IVec2::ONE).as_uvec2();
        extent.x as usize * extent.y as usize
    }
}

/// Keeps the set of live chunks equal to the window around a tracked point.
///
/// `H` is whatever the content backend hands back for a materialized chunk.
pub struct StreamingController<H> {
    params: GenerationParams,
    index: SpatialIndex<H>,
    /// Center of the last tick that fully converged.
    settled: Option<IVec2>,
}

impl<H> StreamingController<H> {
    pub fn new(params: GenerationParams) -> Self {
        Self {
            params,
            index: SpatialIndex::default(),
            settled: None,
        }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn index(&self) -> &SpatialIndex<H> {
        &self.index
    }

    pub fn center(&self) -> Option<IVec2> {
        self.settled
    }

    pub fn window_at(&self, tracked: Vec2) -> StreamWindow {
        let center = center_cell(tracked, self.params.chunk_size());
        StreamWindow::around(center, self.params.window_size())
    }

    pub fn chunk_origin(&self, cell: IVec2) -> Vec2 {
        cell.as_vec2() * self.params.chunk_size()
    }

    /// Runs one streaming pass for the tracked position.
    ///
    /// Grows every missing window cell, then releases every live cell outside
    /// the window. A failed materialization stops the pass; cells grown
    /// before it stay live and the next tick picks up where this one stopped.
    pub fn tick<B>(
        &mut self,
        tracked: Vec2,
        backend: &mut B,
    ) -> Result<Vec<StreamAction>, StreamError<B::Error>>
    where
        B: ContentBackend<Handle = H>,
    {
        let center = center_cell(tracked, self.params.chunk_size());
        if self.settled == Some(center) {
            return Ok(Vec::new());
        }

        let window = StreamWindow::around(center, self.params.window_size());
        debug!(
            "streaming window moved to center {center} ({} .. {})",
            window.min, window.max
        );

        // Not converged until both phases finish.
        self.settled = None;
        let mut actions = Vec::new();

        for cell in window.cells() {
            if self.index.contains(cell) {
                continue;
            }
            self.grow(cell, backend)?;
            actions.push(StreamAction::Spawned(cell));
        }

        for cell in self.index.cells_where(|cell| !window.contains(cell)) {
            if self.release(cell, backend) {
                actions.push(StreamAction::Despawned(cell));
            }
        }

        self.settled = Some(center);
        Ok(actions)
    }

    /// Removes `cell` from the index, then destroys its content.
    ///
    /// Shrink only asks for cells it read from the index, so a missing record
    /// means the index and the live content have diverged.
    fn release<B>(&mut self, cell: IVec2, backend: &mut B) -> bool
    where
        B: ContentBackend<Handle = H>,
    {
        debug_assert!(
            self.index.contains(cell),
            "released chunk {cell} is not in the index"
        );
        let Some(record) = self.index.remove(cell) else {
            warn!("released chunk {cell} is not in the index");
            return false;
        };
        backend.destroy(record.into_content());
        debug!("released chunk {cell}");
        true
    }

    fn grow<B>(&mut self, cell: IVec2, backend: &mut B) -> Result<(), StreamError<B::Error>>
    where
        B: ContentBackend<Handle = H>,
    {
        let origin = self.chunk_origin(cell);
        let seed = cell_seed(cell.x, cell.y, self.params.salt());
        let placed = content::generate(
            cell,
            origin,
            self.params.chunk_size(),
            seed,
            self.params.catalog(),
            backend,
        )
        .map_err(|source| StreamError::Materialize { cell, source })?;

        debug!("generated chunk {cell} with seed {seed}");
        let record = ChunkRecord::new(cell, origin, seed, placed.placement, placed.handle);
        if let Some(displaced) = self.index.insert(record) {
            backend.destroy(displaced.into_content());
        }
        Ok(())
    }
}
