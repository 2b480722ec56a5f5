//! Rectangular walkable floor grid.
//!
//! Backs the [`NavSurface`] boundary with a flat walking plane: a
//! rectangular extent at a fixed height, minus axis-aligned obstacle
//! rects, discretized into cells for path queries. Paths come from a
//! breadth-first search over free cells followed by line-of-sight
//! corner pruning, so straight reachable goals produce two corners
//! and detours produce one corner per turn.

use crate::config::SurfaceConfig;
use crate::core::surface::NavSurface;
use crate::core::types::NavPoint;
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// Grid-backed walkable surface.
pub struct FloorGrid {
    config: SurfaceConfig,
    cols: usize,
    rows: usize,
    walkable: Vec<bool>,
    remaining_build_ticks: u32,
    built: bool,
}

impl FloorGrid {
    /// Build a grid surface from configuration.
    pub fn new(config: &SurfaceConfig) -> Result<Self> {
        if config.resolution <= 0.0 {
            return Err(Error::Config(format!(
                "surface resolution must be positive, got {}",
                config.resolution
            )));
        }
        if config.max_x <= config.min_x || config.max_z <= config.min_z {
            return Err(Error::Config(
                "surface extent is empty; check min/max bounds".to_string(),
            ));
        }

        let cols = (((config.max_x - config.min_x) / config.resolution).ceil() as usize).max(1);
        let rows = (((config.max_z - config.min_z) / config.resolution).ceil() as usize).max(1);

        let mut walkable = vec![true; cols * rows];
        for row in 0..rows {
            for col in 0..cols {
                let (cx, cz) = Self::center_of(config, col, row);
                let blocked = config
                    .obstacles
                    .iter()
                    .any(|o| cx >= o[0] && cz >= o[1] && cx <= o[2] && cz <= o[3]);
                if blocked {
                    walkable[row * cols + col] = false;
                }
            }
        }

        Ok(Self {
            cols,
            rows,
            walkable,
            remaining_build_ticks: config.build_ticks,
            built: config.build_ticks == 0,
            config: config.clone(),
        })
    }

    fn center_of(config: &SurfaceConfig, col: usize, row: usize) -> (f32, f32) {
        (
            config.min_x + (col as f32 + 0.5) * config.resolution,
            config.min_z + (row as f32 + 0.5) * config.resolution,
        )
    }

    fn cell_at(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        if x < self.config.min_x || z < self.config.min_z {
            return None;
        }
        let col = ((x - self.config.min_x) / self.config.resolution) as usize;
        let row = ((z - self.config.min_z) / self.config.resolution) as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((col, row))
    }

    fn is_free(&self, col: usize, row: usize) -> bool {
        self.walkable[row * self.cols + col]
    }

    fn is_point_free(&self, x: f32, z: f32) -> bool {
        match self.cell_at(x, z) {
            Some((col, row)) => self.is_free(col, row),
            None => false,
        }
    }

    /// Walkability along the segment, sampled at half-cell steps.
    fn is_line_free(&self, ax: f32, az: f32, bx: f32, bz: f32) -> bool {
        let dx = bx - ax;
        let dz = bz - az;
        let length = (dx * dx + dz * dz).sqrt();
        let steps = ((length / (self.config.resolution * 0.5)).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            if !self.is_point_free(ax + dx * t, az + dz * t) {
                return false;
            }
        }
        true
    }

    /// Breadth-first search over free cells, 4-connected.
    fn search(&self, start: (usize, usize), goal: (usize, usize)) -> Option<Vec<(usize, usize)>> {
        let start_idx = start.1 * self.cols + start.0;
        let goal_idx = goal.1 * self.cols + goal.0;

        let mut came_from: Vec<Option<usize>> = vec![None; self.cols * self.rows];
        let mut visited = vec![false; self.cols * self.rows];
        let mut queue = VecDeque::new();
        visited[start_idx] = true;
        queue.push_back(start_idx);

        while let Some(idx) = queue.pop_front() {
            if idx == goal_idx {
                let mut cells = Vec::new();
                let mut cursor = idx;
                loop {
                    cells.push((cursor % self.cols, cursor / self.cols));
                    match came_from[cursor] {
                        Some(prev) => cursor = prev,
                        None => break,
                    }
                }
                cells.reverse();
                return Some(cells);
            }

            let col = idx % self.cols;
            let row = idx / self.cols;
            let mut neighbors = [None; 4];
            if col > 0 {
                neighbors[0] = Some(idx - 1);
            }
            if col + 1 < self.cols {
                neighbors[1] = Some(idx + 1);
            }
            if row > 0 {
                neighbors[2] = Some(idx - self.cols);
            }
            if row + 1 < self.rows {
                neighbors[3] = Some(idx + self.cols);
            }
            for next in neighbors.into_iter().flatten() {
                if !visited[next] && self.walkable[next] {
                    visited[next] = true;
                    came_from[next] = Some(idx);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Collapse a cell chain to its turning corners via line of sight.
    fn prune_to_corners(&self, cells: &[(usize, usize)]) -> Vec<(f32, f32)> {
        let points: Vec<(f32, f32)> = cells
            .iter()
            .map(|&(col, row)| Self::center_of(&self.config, col, row))
            .collect();
        if points.len() <= 2 {
            return points;
        }

        let mut corners = vec![points[0]];
        let mut anchor = 0;
        while anchor + 1 < points.len() {
            let mut reach = anchor + 1;
            for candidate in (anchor + 1)..points.len() {
                let (ax, az) = points[anchor];
                let (cx, cz) = points[candidate];
                if self.is_line_free(ax, az, cx, cz) {
                    reach = candidate;
                }
            }
            corners.push(points[reach]);
            anchor = reach;
        }
        corners
    }
}

impl NavSurface for FloorGrid {
    fn has_data(&self) -> bool {
        self.built
    }

    fn build_if_missing(&mut self) {
        if self.built {
            return;
        }
        if self.remaining_build_ticks > 0 {
            self.remaining_build_ticks -= 1;
        }
        if self.remaining_build_ticks == 0 {
            self.built = true;
            log::info!(
                "Walkable surface built: {}x{} cells at {:.2} m",
                self.cols,
                self.rows,
                self.config.resolution
            );
        }
    }

    fn sample_nearest(&self, point: &NavPoint, radius: f32) -> Option<NavPoint> {
        if !self.built || radius <= 0.0 {
            return None;
        }

        let res = self.config.resolution;
        let col_lo = (((point.x - radius - self.config.min_x) / res).floor()).max(0.0) as usize;
        let row_lo = (((point.z - radius - self.config.min_z) / res).floor()).max(0.0) as usize;
        let col_hi =
            ((((point.x + radius - self.config.min_x) / res).ceil()) as usize).min(self.cols);
        let row_hi =
            ((((point.z + radius - self.config.min_z) / res).ceil()) as usize).min(self.rows);

        let dy = point.y - self.config.floor_y;
        let mut best: Option<(f32, NavPoint)> = None;
        for row in row_lo..row_hi {
            for col in col_lo..col_hi {
                if !self.is_free(col, row) {
                    continue;
                }
                // Nearest point inside this cell's footprint
                let cell_min_x = self.config.min_x + col as f32 * res;
                let cell_min_z = self.config.min_z + row as f32 * res;
                let cx = point.x.clamp(cell_min_x, (cell_min_x + res).min(self.config.max_x));
                let cz = point.z.clamp(cell_min_z, (cell_min_z + res).min(self.config.max_z));
                let dx = point.x - cx;
                let dz = point.z - cz;
                let dist_sq = dx * dx + dy * dy + dz * dz;
                if best.as_ref().map_or(true, |(d, _)| dist_sq < *d) {
                    best = Some((dist_sq, NavPoint::new(cx, self.config.floor_y, cz)));
                }
            }
        }

        match best {
            Some((dist_sq, snapped)) if dist_sq <= radius * radius => Some(snapped),
            _ => None,
        }
    }

    fn find_path(&self, from: &NavPoint, to: &NavPoint) -> Option<Vec<NavPoint>> {
        if !self.built {
            return None;
        }
        let start = self.cell_at(from.x, from.z).filter(|&(c, r)| self.is_free(c, r))?;
        let goal = self.cell_at(to.x, to.z).filter(|&(c, r)| self.is_free(c, r))?;

        let floor_y = self.config.floor_y;
        if start == goal {
            return Some(vec![from.with_y(floor_y), to.with_y(floor_y)]);
        }

        let cells = self.search(start, goal)?;
        let mut corners: Vec<NavPoint> = self
            .prune_to_corners(&cells)
            .into_iter()
            .map(|(x, z)| NavPoint::new(x, floor_y, z))
            .collect();

        // Endpoints are the exact query points, not cell centers
        if let Some(first) = corners.first_mut() {
            *first = from.with_y(floor_y);
        }
        if let Some(last) = corners.last_mut() {
            *last = to.with_y(floor_y);
        }
        Some(corners)
    }
}
