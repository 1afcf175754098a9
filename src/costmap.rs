use core::fmt;

use grid_util::point::Point;

use crate::error::CostmapError;

/// Raw cell cost values, following the usual navigation costmap conventions.
pub mod costs {
    /// Free space.
    pub const FREE: u8 = 0;
    /// Within the robot's inscribed radius of an obstacle.
    pub const INSCRIBED: u8 = 253;
    /// Obstacle.
    pub const LETHAL: u8 = 254;
    /// Unknown space.
    pub const NO_INFORMATION: u8 = 255;
}

/// A row-major snapshot of per-cell traversal costs. The planners only read it; callers own it
/// and hand a fresh (or updated) snapshot to every planning call.
#[derive(Clone, Debug, PartialEq)]
pub struct Costmap {
    width: usize,
    height: usize,
    /// Meters per cell.
    resolution: f64,
    /// World coordinate of the corner of cell (0, 0).
    origin: (f64, f64),
    costs: Vec<u8>,
}

impl Costmap {
    pub fn new(
        width: usize,
        height: usize,
        resolution: f64,
        costs: Vec<u8>,
    ) -> Result<Costmap, CostmapError> {
        if width == 0 || height == 0 {
            return Err(CostmapError::Empty);
        }
        if costs.len() != width * height {
            return Err(CostmapError::SizeMismatch {
                expected: width * height,
                actual: costs.len(),
            });
        }
        Ok(Costmap {
            width,
            height,
            resolution,
            origin: (0.0, 0.0),
            costs,
        })
    }

    /// A costmap with unit resolution where every cell has the same cost.
    pub fn filled(width: usize, height: usize, value: u8) -> Costmap {
        Costmap {
            width,
            height,
            resolution: 1.0,
            origin: (0.0, 0.0),
            costs: vec![value; width * height],
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Costmap {
        self.origin = (x, y);
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Costmap {
        self.resolution = resolution;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn costs(&self) -> &[u8] {
        &self.costs
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    pub fn compute_ix(&self, point: Point) -> usize {
        debug_assert!(self.in_bounds(point));
        point.y as usize * self.width + point.x as usize
    }

    pub fn ix_to_point(&self, ix: usize) -> Point {
        Point::new((ix % self.width) as i32, (ix / self.width) as i32)
    }

    /// Raw cost of an in-bounds cell.
    pub fn get(&self, point: Point) -> u8 {
        self.costs[self.compute_ix(point)]
    }

    pub fn get_checked(&self, point: Point) -> Option<u8> {
        if self.in_bounds(point) {
            Some(self.get(point))
        } else {
            None
        }
    }

    pub fn set(&mut self, point: Point, value: u8) {
        let ix = self.compute_ix(point);
        self.costs[ix] = value;
    }

    /// Sets every in-bounds cell of the `w` by `h` rectangle with corner `(x, y)`.
    pub fn set_rect(&mut self, x: i32, y: i32, w: i32, h: i32, value: u8) {
        for yy in y..y + h {
            for xx in x..x + w {
                let p = Point::new(xx, yy);
                if self.in_bounds(p) {
                    self.set(p, value);
                }
            }
        }
    }

    /// Cell containing the world position, if it lies on the map.
    pub fn world_to_grid(&self, wx: f64, wy: f64) -> Option<Point> {
        let gx = ((wx - self.origin.0) / self.resolution).floor();
        let gy = ((wy - self.origin.1) / self.resolution).floor();
        if gx < 0.0 || gy < 0.0 || gx >= self.width as f64 || gy >= self.height as f64 {
            return None;
        }
        Some(Point::new(gx as i32, gy as i32))
    }

    /// World position of the centre of a cell.
    pub fn grid_to_world(&self, point: Point) -> (f64, f64) {
        (
            self.origin.0 + (point.x as f64 + 0.5) * self.resolution,
            self.origin.1 + (point.y as f64 + 0.5) * self.resolution,
        )
    }
}

impl fmt::Display for Costmap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Costmap:")?;
        for row in self.costs.chunks(self.width) {
            let values = row
                .iter()
                .map(|&c| match c {
                    costs::FREE => '.',
                    costs::INSCRIBED | costs::LETHAL => '#',
                    costs::NO_INFORMATION => '?',
                    _ => '+',
                })
                .collect::<String>();
            writeln!(f, "{}", values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_cost_array() {
        assert_eq!(
            Costmap::new(3, 3, 0.05, vec![0; 8]),
            Err(CostmapError::SizeMismatch {
                expected: 9,
                actual: 8
            })
        );
        assert_eq!(Costmap::new(0, 3, 0.05, vec![]), Err(CostmapError::Empty));
        assert!(Costmap::new(3, 2, 0.05, vec![0; 6]).is_ok());
    }

    #[test]
    fn indexing_is_row_major() {
        let mut costmap = Costmap::filled(4, 3, costs::FREE);
        let p = Point::new(3, 1);
        costmap.set(p, 77);
        assert_eq!(costmap.costs()[7], 77);
        assert_eq!(costmap.ix_to_point(7), p);
        assert_eq!(costmap.get_checked(Point::new(4, 1)), None);
        assert_eq!(costmap.get_checked(Point::new(0, -1)), None);
    }

    #[test]
    fn set_rect_clips_to_bounds() {
        let mut costmap = Costmap::filled(3, 3, costs::FREE);
        costmap.set_rect(1, 1, 5, 5, costs::LETHAL);
        let lethal = costmap
            .costs()
            .iter()
            .filter(|&&c| c == costs::LETHAL)
            .count();
        assert_eq!(lethal, 4);
    }

    #[test]
    fn world_grid_conversion() {
        let costmap = Costmap::new(10, 10, 0.5, vec![0; 100])
            .unwrap()
            .with_origin(-2.5, 0.0);
        assert_eq!(costmap.world_to_grid(0.0, 0.0), Some(Point::new(5, 0)));
        assert_eq!(costmap.world_to_grid(-3.0, 0.0), None);
        assert_eq!(costmap.world_to_grid(0.0, 5.0), None);
        let (wx, wy) = costmap.grid_to_world(Point::new(5, 0));
        assert!((wx - 0.25).abs() < 1e-9);
        assert!((wy - 0.25).abs() < 1e-9);
    }
}
