//! Coarse two-dimensional scalar grid with zero-valued borders.
//!
//! A `Field` stores `width * height` f64 node values in row-major layout.
//! Unlike a texture, indices outside the grid are not wrapped: reads return
//! `0.0` so samplers near the viewport edge never fail.

use crate::error::FieldError;

/// A dense grid of finite scalar values indexed by node coordinates `(i, j)`.
#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

/// Checked `width * height`, rejecting zero and overflow.
fn checked_len(width: usize, height: usize) -> Result<usize, FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(FieldError::InvalidDimensions)
}

impl Field {
    /// Creates a zero-filled grid of the given node dimensions.
    ///
    /// Returns `FieldError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a grid filled with `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, FieldError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Creates a grid from a pre-built row-major vector.
    ///
    /// Returns `FieldError::DimensionMismatch` if `data.len() != width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, FieldError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(FieldError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Grid width in nodes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in nodes.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Changes the node dimensions, keeping the allocation when it is large enough.
    ///
    /// Existing values are not preserved in any meaningful layout; callers
    /// regenerate the whole grid afterwards. Returns `true` if the shape changed.
    pub fn reshape(&mut self, width: usize, height: usize) -> Result<bool, FieldError> {
        let len = checked_len(width, height)?;
        if width == self.width && height == self.height {
            return Ok(false);
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(len, 0.0);
        Ok(true)
    }

    fn index(&self, i: isize, j: isize) -> Option<usize> {
        if i < 0 || j < 0 {
            return None;
        }
        let (i, j) = (i as usize, j as usize);
        if i >= self.width || j >= self.height {
            return None;
        }
        Some(j * self.width + i)
    }

    /// Gets the value at node `(i, j)`, or `0.0` when the node is outside the grid.
    pub fn get(&self, i: isize, j: isize) -> f64 {
        self.index(i, j).map_or(0.0, |idx| self.data[idx])
    }
}
