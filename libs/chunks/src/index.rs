use bevy::log::warn;
use glam::{IVec2, Vec2};
use std::collections::HashMap;

use crate::content::Placement;

/// A live chunk. Built once when its cell enters the window and never changed.
#[derive(Debug)]
pub struct ChunkRecord<H> {
    cell: IVec2,
    origin: Vec2,
    seed: i32,
    placement: Placement,
    content: H,
}

impl<H> ChunkRecord<H> {
    pub fn new(cell: IVec2, origin: Vec2, seed: i32, placement: Placement, content: H) -> Self {
        Self {
            cell,
            origin,
            seed,
            placement,
            content,
        }
    }

    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn content(&self) -> &H {
        &self.content
    }

    pub fn into_content(self) -> H {
        self.content
    }
}

/// Sparse map from cell coordinate to live chunk.
#[derive(Debug)]
pub struct SpatialIndex<H> {
    chunks: HashMap<IVec2, ChunkRecord<H>>,
}

impl<H> Default for SpatialIndex<H> {
    fn default() -> Self {
        Self {
            chunks: HashMap::new(),
        }
    }
}

impl<H> SpatialIndex<H> {
    pub fn contains(&self, cell: IVec2) -> bool {
        self.chunks.contains_key(&cell)
    }

    pub fn get(&self, cell: IVec2) -> Option<&ChunkRecord<H>> {
        self.chunks.get(&cell)
    }

    /// Inserts a record under its own cell.
    ///
    /// A second insert for an occupied cell means the caller skipped its
    /// presence check. Debug builds assert; release builds warn, overwrite and
    /// hand back the displaced record so its content can still be released.
    pub fn insert(&mut self, record: ChunkRecord<H>) -> Option<ChunkRecord<H>> {
        let cell = record.cell;
        let displaced = self.chunks.insert(cell, record);
        debug_assert!(displaced.is_none(), "duplicate chunk insert at {cell}");
        if displaced.is_some() {
            warn!("duplicate chunk insert at {cell}, previous record overwritten");
        }
        displaced
    }

    pub fn remove(&mut self, cell: IVec2) -> Option<ChunkRecord<H>> {
        self.chunks.remove(&cell)
    }

    /// Snapshot of the cells matching `predicate`. Order is unspecified.
    pub fn cells_where(&self, mut predicate: impl FnMut(IVec2) -> bool) -> Vec<IVec2> {
        self.chunks
            .keys()
            .copied()
            .filter(|cell| predicate(*cell))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &ChunkRecord<H>)> {
        self.chunks.iter().map(|(cell, record)| (*cell, record))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: i32, y: i32, content: u32) -> ChunkRecord<u32> {
        let cell = IVec2::new(x, y);
        let origin = cell.as_vec2() * 10.0;
        let placement = Placement {
            cell,
            chunk_origin: origin,
            position: origin,
            catalog_index: 0,
        };
        ChunkRecord::new(cell, origin, 0, placement, content)
    }

    #[test]
    fn insert_lookup_remove() {
        let mut index = SpatialIndex::default();
        assert!(index.is_empty());

        assert!(index.insert(record(1, -2, 7)).is_none());
        assert!(index.contains(IVec2::new(1, -2)));
        assert!(!index.contains(IVec2::new(-2, 1)));
        assert_eq!(index.get(IVec2::new(1, -2)).map(|r| *r.content()), Some(7));
        assert_eq!(index.len(), 1);

        let removed = index.remove(IVec2::new(1, -2)).unwrap();
        assert_eq!(removed.into_content(), 7);
        assert!(index.remove(IVec2::new(1, -2)).is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn cells_where_filters_snapshot() {
        let mut index = SpatialIndex::default();
        for x in -2..=2 {
            index.insert(record(x, 0, x as u32));
        }
        let mut far = index.cells_where(|c| c.x.abs() > 1);
        far.sort_by_key(|c| c.x);
        assert_eq!(far, vec![IVec2::new(-2, 0), IVec2::new(2, 0)]);
        assert_eq!(index.iter().count(), 5);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate chunk insert")]
    fn duplicate_insert_asserts_in_debug() {
        let mut index = SpatialIndex::default();
        index.insert(record(0, 0, 1));
        index.insert(record(0, 0, 2));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn duplicate_insert_overwrites_in_release() {
        let mut index = SpatialIndex::default();
        index.insert(record(0, 0, 1));
        let displaced = index.insert(record(0, 0, 2)).unwrap();
        assert_eq!(displaced.into_content(), 1);
        assert_eq!(index.get(IVec2::ZERO).map(|r| *r.content()), Some(2));
        assert_eq!(index.len(), 1);
    }
}
