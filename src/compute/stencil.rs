//! Discrete Laplacian on a toroidal grid.
//!
//! Five-point stencil with periodic boundaries: every edge wraps, so
//! the grid has no border cells and no special cases in the update.

/// Compute the five-point Laplacian of a 2D grid.
/// Returns a newly allocated flat vector.
///
/// Uses periodic boundary conditions (wraps at edges). This is the
/// reference implementation; the hot path is [`laplacian_into`].
pub fn laplacian(grid: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; width * height];

    for y in 0..height {
        for x in 0..width {
            let xm = (x + width - 1) % width;
            let xp = (x + 1) % width;
            let ym = (y + height - 1) % height;
            let yp = (y + 1) % height;

            out[y * width + x] = grid[y * width + xm]
                + grid[y * width + xp]
                + grid[ym * width + x]
                + grid[yp * width + x]
                - 4.0 * grid[y * width + x];
        }
    }

    out
}

/// Five-point Laplacian into a pre-allocated buffer.
/// Hoists the row wraps out of the inner loop for cache-friendly
/// row-major access.
#[inline]
pub fn laplacian_into(grid: &[f32], out: &mut [f32], width: usize, height: usize) {
    debug_assert_eq!(grid.len(), width * height);
    debug_assert_eq!(out.len(), width * height);

    for y in 0..height {
        let row = y * width;
        let row_up = ((y + height - 1) % height) * width;
        let row_down = ((y + 1) % height) * width;

        for x in 0..width {
            let xm = if x == 0 { width - 1 } else { x - 1 };
            let xp = if x + 1 == width { 0 } else { x + 1 };

            out[row + x] = grid[row + xm] + grid[row + xp] + grid[row_up + x] + grid[row_down + x]
                - 4.0 * grid[row + x];
        }
    }
}
