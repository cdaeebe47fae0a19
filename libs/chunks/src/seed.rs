use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Derives the seed of the chunk at `(cell_x, cell_y)`.
///
/// Each coordinate drives its own pseudo-random stream; the streams are
/// combined as `r(x) + r(y) * r(max(x, y)) + salt` with 32-bit wraparound.
/// The result depends on nothing but the three arguments.
pub fn cell_seed(cell_x: i32, cell_y: i32, salt: i32) -> i32 {
    let x = normalize_coord(cell_x);
    let y = normalize_coord(cell_y);

    first_draw(x)
        .wrapping_add(first_draw(y).wrapping_mul(first_draw(x.max(y))))
        .wrapping_add(salt)
}

/// Maps a signed coordinate into the non-negative stream domain.
///
/// Negative values are shifted up by 2^32, so `-n` and `n` never share a stream.
fn normalize_coord(value: i32) -> u64 {
    u64::from(value as u32)
}

fn first_draw(stream_seed: u64) -> i32 {
    StdRng::seed_from_u64(stream_seed).next_u32() as i32
}
