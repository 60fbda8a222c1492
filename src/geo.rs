//! Conversion between raster cells and real-world coordinates.
//!
//! Raster rows grow downwards while world coordinates are Cartesian, so row 0 maps onto the top
//! of the extent (maximum Y) and the Y coordinate decreases with the row index.

use crate::cell::Cell;

/// Affine placement of the raster in world space: the top-left corner of the extent and the
/// size of a pixel along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTransform {
    pub x_min: f64,
    pub y_max: f64,
    pub x_res: f64,
    pub y_res: f64,
}

impl Default for GeoTransform {
    /// Unit pixels with the top-left corner at the origin.
    fn default() -> Self {
        GeoTransform {
            x_min: 0.0,
            y_max: 0.0,
            x_res: 1.0,
            y_res: 1.0,
        }
    }
}

impl GeoTransform {
    pub fn new(x_min: f64, y_max: f64, x_res: f64, y_res: f64) -> GeoTransform {
        GeoTransform {
            x_min,
            y_max,
            x_res,
            y_res,
        }
    }

    /// Placement from the bottom-left corner of the extent, as most layer providers report it.
    pub fn from_extent(x_min: f64, y_min: f64, x_res: f64, y_res: f64, height: usize) -> Self {
        GeoTransform::new(x_min, y_min + height as f64 * y_res, x_res, y_res)
    }

    /// World coordinates `[x, y]` of the centre of a cell.
    pub fn cell_center(&self, cell: &Cell) -> [f64; 2] {
        [
            self.x_min + (cell.col as f64 + 0.5) * self.x_res,
            self.y_max - (cell.row as f64 + 0.5) * self.y_res,
        ]
    }

    /// Cell containing the given world coordinates, if it lies inside a `height` x `width`
    /// raster.
    pub fn cell_at(&self, x: f64, y: f64, height: usize, width: usize) -> Option<Cell> {
        let col = ((x - self.x_min) / self.x_res).floor();
        let row = ((self.y_max - y) / self.y_res).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let cell = Cell::new(row as usize, col as usize);
        (cell.row < height && cell.col < width).then_some(cell)
    }

    /// Euclidean distance between two cell centres in world units.
    pub fn distance(&self, a: &Cell, b: &Cell) -> f64 {
        let [ax, ay] = self.cell_center(a);
        let [bx, by] = self.cell_center(b);
        euclidean(&[ax, ay], &[bx, by])
    }
}

pub(crate) fn euclidean(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}
