//! Small math helpers shared by the delay line, LFO and engine.

/// Flush denormal values to zero.
///
/// Denormal floats are extremely slow on many CPUs. Applied to every sample
/// that enters a delay line so decaying history never drifts into the
/// denormal range.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if libm::fabsf(x) < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation between `a` and `b`.
///
/// Written as `frac * b + (1 - frac) * a` rather than `a + (b - a) * frac`.
/// For `frac` in `[0, 1]` the result stays within `[min(a, b), max(a, b)]`
/// up to one or two ulps of rounding, and hits `a` and `b` exactly at the
/// endpoints.
#[inline]
pub fn lerp(a: f32, b: f32, frac: f32) -> f32 {
    frac * b + (1.0 - frac) * a
}

/// Wrap a phase value into `[0.0, 1.0)`.
///
/// Cheap path for the common case of a single overshoot; falls back to
/// `floor` for anything further out.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    if (0.0..1.0).contains(&phase) {
        return phase;
    }
    let wrapped = phase - libm::floorf(phase);
    // floor can round x - floor(x) up to exactly 1.0 for tiny negative x
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
