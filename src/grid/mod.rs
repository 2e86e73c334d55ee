//! Tile-based coverage accounting over the room floor.
//!
//! The room is divided into square tiles of `tile_size` pixels. Each tile
//! carries a cleaning-pass counter, saturating at the configured
//! `clean_passes` threshold. Unvisited tiles whose center lies inside an
//! obstacle rectangle are *blocked*: they are skipped while marking and
//! excluded from the denominator of both coverage percentages, so 100%
//! coverage means "every tile the robot could conceivably reach has been
//! visited". A tile the footprint has entered never becomes blocked, so
//! the percentages are non-decreasing whatever the edit order.
//!
//! Storage is a flat row-major `Vec` with cached counters, in the manner
//! of an occupancy grid: percentages are O(1) queries, updates touch only
//! the tiles under the robot footprint.

use crate::core::{Circle, Rect};
use serde::{Deserialize, Serialize};

/// Observable state of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    /// Center lies inside an obstacle; never counted or marked.
    Blocked,
    /// Not yet entered by the robot footprint.
    Unvisited,
    /// Entered at least once, fewer than `clean_passes` passes.
    Visited,
    /// Reached the full cleaning-pass threshold.
    FullyCleaned,
}

/// Coverage grid over the room.
#[derive(Clone, Debug)]
pub struct TileGrid {
    cols: u32,
    rows: u32,
    tile_size: f32,
    clean_passes: u8,
    /// Cleaning passes per tile, saturating at `clean_passes`
    passes: Vec<u8>,
    /// Tiles excluded because an obstacle covers their center
    blocked: Vec<bool>,
    visited_tiles: u32,
    fully_cleaned_tiles: u32,
    blocked_tiles: u32,
}

impl TileGrid {
    /// Create a grid covering a `width` x `height` room.
    ///
    /// Dimensions round up so partial tiles at the right/bottom edges are
    /// still tracked.
    pub fn new(width: f32, height: f32, tile_size: f32, clean_passes: u8) -> Self {
        let cols = (width / tile_size).ceil() as u32;
        let rows = (height / tile_size).ceil() as u32;
        let cells = (cols * rows) as usize;
        Self {
            cols,
            rows,
            tile_size,
            clean_passes,
            passes: vec![0; cells],
            blocked: vec![false; cells],
            visited_tiles: 0,
            fully_cleaned_tiles: 0,
            blocked_tiles: 0,
        }
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile edge length in pixels
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Number of tiles that count toward coverage (blocked excluded)
    #[inline]
    pub fn countable_tiles(&self) -> u32 {
        self.cols * self.rows - self.blocked_tiles
    }

    /// Number of tiles visited at least once
    #[inline]
    pub fn visited_tiles(&self) -> u32 {
        self.visited_tiles
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        (row * self.cols + col) as usize
    }

    /// World-space rectangle of a tile
    #[inline]
    pub fn tile_rect(&self, col: u32, row: u32) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// State of a tile
    pub fn state(&self, col: u32, row: u32) -> TileState {
        let i = self.index(col, row);
        if self.blocked[i] {
            TileState::Blocked
        } else if self.passes[i] == 0 {
            TileState::Unvisited
        } else if self.passes[i] >= self.clean_passes {
            TileState::FullyCleaned
        } else {
            TileState::Visited
        }
    }

    /// Cleaning passes recorded for a tile
    pub fn passes(&self, col: u32, row: u32) -> u8 {
        self.passes[self.index(col, row)]
    }

    /// Mark a tile visited. Returns `true` only on the first
    /// Unvisited -> Visited transition; blocked tiles are ignored.
    pub fn mark_visited(&mut self, col: u32, row: u32) -> bool {
        let i = self.index(col, row);
        if self.blocked[i] || self.passes[i] > 0 {
            return false;
        }
        self.passes[i] = 1;
        self.visited_tiles += 1;
        if self.clean_passes <= 1 {
            self.fully_cleaned_tiles += 1;
        }
        true
    }

    /// Record one cleaning pass over a tile, saturating at the threshold.
    /// Blocked and unvisited tiles are ignored: a pass only counts on a
    /// tile the footprint has already entered this tick via
    /// [`mark_visited`](Self::mark_visited) or earlier.
    pub fn mark_cleaned(&mut self, col: u32, row: u32) {
        let i = self.index(col, row);
        if self.blocked[i] || self.passes[i] == 0 || self.passes[i] >= self.clean_passes {
            return;
        }
        self.passes[i] += 1;
        if self.passes[i] >= self.clean_passes {
            self.fully_cleaned_tiles += 1;
        }
    }

    /// Mark every tile intersected by the robot footprint as visited and
    /// record one cleaning pass on each. Returns the tiles that were newly
    /// visited (first entry) in row-major order.
    pub fn cover_footprint(&mut self, footprint: &Circle) -> Vec<(u32, u32)> {
        let mut newly_visited = Vec::new();
        let min_col = ((footprint.center.x - footprint.radius) / self.tile_size).floor() as i64;
        let max_col = ((footprint.center.x + footprint.radius) / self.tile_size).floor() as i64;
        let min_row = ((footprint.center.y - footprint.radius) / self.tile_size).floor() as i64;
        let max_row = ((footprint.center.y + footprint.radius) / self.tile_size).floor() as i64;

        for row in min_row.max(0)..=max_row.min(self.rows as i64 - 1) {
            for col in min_col.max(0)..=max_col.min(self.cols as i64 - 1) {
                let (col, row) = (col as u32, row as u32);
                if !footprint.intersects_rect(&self.tile_rect(col, row)) {
                    continue;
                }
                if self.mark_visited(col, row) {
                    newly_visited.push((col, row));
                } else {
                    self.mark_cleaned(col, row);
                }
            }
        }
        newly_visited
    }

    /// Rebuild the blocked mask from the current obstacle list.
    ///
    /// A tile is blocked when its center lies inside any obstacle, unless
    /// the robot footprint has already entered it. Footprint marking
    /// reaches tiles whose center an accepted obstacle may later cover
    /// (circle-tile intersection extends past the circle itself), and
    /// un-counting such a tile would shrink the coverage numerator faster
    /// than the denominator. Visited tiles therefore stay countable, which
    /// keeps both percentages non-decreasing across any edit order.
    pub fn set_blocked(&mut self, obstacles: &[Rect]) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let center = self.tile_rect(col, row).center();
                let i = self.index(col, row);
                self.blocked[i] = self.passes[i] == 0
                    && obstacles.iter().any(|o| o.contains_point(&center));
            }
        }
        self.recount();
    }

    /// Reset every tile to Unvisited, keeping the blocked mask.
    pub fn reset(&mut self) {
        self.passes.fill(0);
        self.visited_tiles = 0;
        self.fully_cleaned_tiles = 0;
    }

    /// Visited tiles / countable tiles, in percent.
    pub fn coverage_percentage(&self) -> f32 {
        let total = self.countable_tiles();
        if total == 0 {
            return 0.0;
        }
        self.visited_tiles as f32 / total as f32 * 100.0
    }

    /// Fully cleaned tiles / countable tiles, in percent.
    pub fn full_coverage_percentage(&self) -> f32 {
        let total = self.countable_tiles();
        if total == 0 {
            return 0.0;
        }
        self.fully_cleaned_tiles as f32 / total as f32 * 100.0
    }

    fn recount(&mut self) {
        self.visited_tiles = 0;
        self.fully_cleaned_tiles = 0;
        self.blocked_tiles = 0;
        for i in 0..self.passes.len() {
            if self.blocked[i] {
                self.blocked_tiles += 1;
            } else if self.passes[i] >= self.clean_passes {
                self.visited_tiles += 1;
                self.fully_cleaned_tiles += 1;
            } else if self.passes[i] > 0 {
                self.visited_tiles += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;

    fn grid() -> TileGrid {
        TileGrid::new(100.0, 100.0, 10.0, 2)
    }

    #[test]
    fn dimensions_round_up() {
        let g = TileGrid::new(805.0, 600.0, 10.0, 2);
        assert_eq!(g.cols(), 81);
        assert_eq!(g.rows(), 60);
        assert_eq!(g.tile_size(), 10.0);
    }

    #[test]
    fn visited_tiles_stay_countable_when_mask_covers_them() {
        let mut g = grid();
        g.mark_visited(2, 2);
        let coverage_before = g.coverage_percentage();

        // Obstacle over the visited tile's center
        g.set_blocked(&[Rect::new(20.0, 20.0, 10.0, 10.0)]);
        assert_eq!(g.state(2, 2), TileState::Visited);
        assert_eq!(g.visited_tiles(), 1);
        assert!(g.coverage_percentage() >= coverage_before);

        // An unvisited neighbor under the same mask still blocks
        g.set_blocked(&[Rect::new(20.0, 20.0, 20.0, 10.0)]);
        assert_eq!(g.state(3, 2), TileState::Blocked);
        assert_eq!(g.state(2, 2), TileState::Visited);
    }

    #[test]
    fn mark_visited_true_only_on_first_transition() {
        let mut g = grid();
        assert!(g.mark_visited(3, 4));
        assert!(!g.mark_visited(3, 4));
        assert_eq!(g.state(3, 4), TileState::Visited);
        assert_eq!(g.visited_tiles(), 1);
    }

    #[test]
    fn cleaning_passes_saturate_at_threshold() {
        let mut g = grid();
        g.mark_visited(0, 0);
        assert_eq!(g.state(0, 0), TileState::Visited);
        g.mark_cleaned(0, 0);
        assert_eq!(g.state(0, 0), TileState::FullyCleaned);
        g.mark_cleaned(0, 0);
        assert_eq!(g.passes(0, 0), 2);
    }

    #[test]
    fn blocked_tiles_excluded_from_denominator() {
        let mut g = grid();
        // Obstacle covering the centers of a 5x5 tile block
        g.set_blocked(&[Rect::new(0.0, 0.0, 50.0, 50.0)]);
        assert_eq!(g.countable_tiles(), 100 - 25);
        assert_eq!(g.state(0, 0), TileState::Blocked);
        assert!(!g.mark_visited(0, 0));
        assert_eq!(g.coverage_percentage(), 0.0);
    }

    #[test]
    fn footprint_covers_intersected_tiles_only() {
        let mut g = grid();
        let newly = g.cover_footprint(&Circle::new(Vec2::new(50.0, 50.0), 15.0));
        // Every returned tile actually intersects the circle
        assert!(!newly.is_empty());
        for &(c, r) in &newly {
            assert!(Circle::new(Vec2::new(50.0, 50.0), 15.0).intersects_rect(&g.tile_rect(c, r)));
        }
        // Far corner untouched
        assert_eq!(g.state(9, 9), TileState::Unvisited);
        // Second pass over the same spot visits nothing new
        assert!(g.cover_footprint(&Circle::new(Vec2::new(50.0, 50.0), 15.0)).is_empty());
    }

    #[test]
    fn footprint_near_wall_reaches_edge_tiles() {
        let mut g = grid();
        // Robot center one radius from the top-left corner
        g.cover_footprint(&Circle::new(Vec2::new(30.0, 30.0), 30.0));
        assert_ne!(g.state(0, 0), TileState::Unvisited);
        assert_ne!(g.state(3, 0), TileState::Unvisited);
    }

    #[test]
    fn reset_returns_all_tiles_to_unvisited() {
        let mut g = grid();
        g.cover_footprint(&Circle::new(Vec2::new(50.0, 50.0), 20.0));
        assert!(g.coverage_percentage() > 0.0);
        g.reset();
        assert_eq!(g.coverage_percentage(), 0.0);
        assert_eq!(g.state(5, 5), TileState::Unvisited);
    }

    #[test]
    fn percentages_reach_100_when_all_countable_tiles_cleaned() {
        let mut g = TileGrid::new(40.0, 40.0, 10.0, 1);
        for row in 0..4 {
            for col in 0..4 {
                g.mark_visited(col, row);
            }
        }
        assert_eq!(g.coverage_percentage(), 100.0);
        assert_eq!(g.full_coverage_percentage(), 100.0);
    }
}
