use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Display;

use crate::types::{ContentCatalog, ContentDescriptor};

/// Where a chunk's decorative object goes, and which one it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Cell of the owning chunk.
    pub cell: IVec2,
    /// World-space origin of the owning chunk.
    pub chunk_origin: Vec2,
    /// World-space (x, z) position of the object.
    pub position: Vec2,
    pub catalog_index: usize,
}

impl Placement {
    /// Position relative to the owning chunk's origin.
    pub fn local_offset(&self) -> Vec2 {
        self.position - self.chunk_origin
    }
}

/// Something that can turn a placement into live content and tear it down again.
///
/// Implemented by the engine side. `destroy` takes the handle by value, so a
/// handle can only ever be released once.
pub trait ContentBackend {
    type Handle;
    type Error: Display;

    fn materialize(
        &mut self,
        descriptor: &ContentDescriptor,
        placement: &Placement,
    ) -> Result<Self::Handle, Self::Error>;

    fn destroy(&mut self, handle: Self::Handle);
}

#[derive(Debug)]
pub struct PlacedContent<H> {
    pub placement: Placement,
    pub handle: H,
}

/// Draws the placement of a chunk's content from its own seeded stream.
///
/// Draw order is fixed: x, then y, then the catalog index. `catalog_len` must
/// be non-zero, which [`ContentCatalog`] guarantees.
pub fn plan_placement(
    cell: IVec2,
    origin: Vec2,
    chunk_size: f32,
    seed: i32,
    catalog_len: usize,
) -> Placement {
    let mut rng = StdRng::seed_from_u64(u64::from(seed as u32));

    let half = chunk_size / 2.0;
    let min = origin - Vec2::splat(half);
    let max = min + Vec2::splat(chunk_size);

    let x = sample_axis(&mut rng, min.x, max.x);
    let y = sample_axis(&mut rng, min.y, max.y);
    let catalog_index = rng.random_range(0..catalog_len);

    Placement {
        cell,
        chunk_origin: origin,
        position: Vec2::new(x, y),
        catalog_index,
    }
}

// Far from the origin f32 can round `min + chunk_size` back down to `min`,
// and a draw from `min..max` can round up onto `max`. Results stay in
// `[min, max)` and exactly one draw is consumed either way, so later draws
// keep their place in the stream.
fn sample_axis(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min {
        let value = rng.random_range(min..max);
        if value >= max { max.next_down() } else { value }
    } else {
        let _: f32 = rng.random();
        min
    }
}

pub fn generate<B: ContentBackend>(
    cell: IVec2,
    origin: Vec2,
    chunk_size: f32,
    seed: i32,
    catalog: &ContentCatalog,
    backend: &mut B,
) -> Result<PlacedContent<B::Handle>, B::Error> {
    let placement = plan_placement(cell, origin, chunk_size, seed, catalog.len());
    // Index drawn from [0, len), so the lookup always hits.
    let descriptor = &catalog.as_slice()[placement.catalog_index];
    let handle = backend.materialize(descriptor, &placement)?;
    Ok(PlacedContent { placement, handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_stays_inside_chunk_bounds() {
        let chunk_size = 10.0;
        for seed in -200..200 {
            let origin = Vec2::new(30.0, -50.0);
            let p = plan_placement(IVec2::new(3, -5), origin, chunk_size, seed, 4);
            assert!(p.position.x >= 25.0 && p.position.x < 35.0, "{p:?}");
            assert!(p.position.y >= -55.0 && p.position.y < -45.0, "{p:?}");
            assert!(p.catalog_index < 4);
            assert_eq!(p.local_offset(), p.position - origin);
        }
    }

    #[test]
    fn placement_stays_below_upper_edge_far_from_origin() {
        let chunk_size = 10.0;
        for cell in [IVec2::splat(100_000), IVec2::new(400_000, -1_000_000)] {
            let origin = cell.as_vec2() * chunk_size;
            let min = origin - Vec2::splat(chunk_size / 2.0);
            let max = min + Vec2::splat(chunk_size);
            for seed in -5_000..5_000 {
                let p = plan_placement(cell, origin, chunk_size, seed, 2);
                assert!(p.position.x >= min.x && p.position.x < max.x, "{p:?}");
                assert!(p.position.y >= min.y && p.position.y < max.y, "{p:?}");
            }
        }
    }

    #[test]
    fn same_seed_same_placement() {
        let a = plan_placement(IVec2::ZERO, Vec2::ZERO, 8.0, 1234, 3);
        let b = plan_placement(IVec2::ZERO, Vec2::ZERO, 8.0, 1234, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn single_entry_catalog_always_selects_it() {
        for seed in 0..50 {
            assert_eq!(plan_placement(IVec2::ZERO, Vec2::ZERO, 1.0, seed, 1).catalog_index, 0);
        }
    }

    #[test]
    fn every_catalog_entry_is_reachable() {
        let mut hits = [false; 3];
        for seed in 0..300 {
            hits[plan_placement(IVec2::ZERO, Vec2::ZERO, 1.0, seed, 3).catalog_index] = true;
        }
        assert!(hits.iter().all(|h| *h));
    }
}
