/// Maps a possibly out-of-range `(x, y)` onto a row-major index, wrapping both axes.
pub fn get_wrapping_index(x: isize, y: isize, width: usize, height: usize) -> usize {
    let (width, height) = (width as isize, height as isize);
    (y.rem_euclid(height) * width + x.rem_euclid(width)) as usize
}

/// Clamps to `[0, 1]`. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}
