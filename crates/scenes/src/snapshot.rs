//! PNG export of a rendered [`Pixmap`].
//!
//! Feature-gated behind `png` (default on) so the wasm host can depend on
//! this crate without pulling in the `image` crate.

use contour_field_core::error::FieldError;
use std::path::Path;

use crate::pixmap::Pixmap;

/// Writes the pixmap's backing store as an RGBA PNG.
///
/// Returns `FieldError::InvalidDimensions` if the backing size overflows
/// `u32`, or `FieldError::Io` on write failure.
pub fn write_png(pixmap: &Pixmap, path: &Path) -> Result<(), FieldError> {
    let (w, h) = pixmap.device_size();
    let w = u32::try_from(w).map_err(|_| FieldError::InvalidDimensions)?;
    let h = u32::try_from(h).map_err(|_| FieldError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, pixmap.to_rgba8())
        .ok_or_else(|| FieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FieldError::Io(e.to_string()))
}
