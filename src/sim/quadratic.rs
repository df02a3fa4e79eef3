//! Closed-form quadratic solver for time-to-collision

/// Real roots of `a·t² + b·t + c = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    /// Negative discriminant
    None,
    /// Zero discriminant
    One(f64),
    /// Positive discriminant; `(-b + √d) / 2a` first, then `(-b - √d) / 2a`
    Two(f64, f64),
}

impl Roots {
    /// Earliest usable collision time
    ///
    /// The sole nonnegative root if only one qualifies, the smaller one if
    /// both do, and `None` if neither does.
    pub fn earliest_nonnegative(self) -> Option<f64> {
        match self {
            Roots::None => None,
            Roots::One(t) => (t >= 0.0).then_some(t),
            Roots::Two(t1, t2) => match (t1 >= 0.0, t2 >= 0.0) {
                (true, true) => Some(t1.min(t2)),
                (true, false) => Some(t1),
                (false, true) => Some(t2),
                (false, false) => None,
            },
        }
    }
}

/// Solve `a·t² + b·t + c = 0`. `a` must be nonzero.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    debug_assert!(a != 0.0, "solve_quadratic called with zero leading coefficient");

    let d = b * b - 4.0 * a * c;
    if d > 0.0 {
        let sqrt_d = d.sqrt();
        Roots::Two((-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a))
    } else if d == 0.0 {
        Roots::One(-b / (2.0 * a))
    } else {
        Roots::None
    }
}

/// Time for a body at `velocity` with constant `accel` to cover `distance`
/// along one axis: roots of `accel·t² + 2·velocity·t - 2·distance = 0`
pub fn time_to_cover(accel: f64, velocity: f64, distance: f64) -> Option<f64> {
    solve_quadratic(accel, 2.0 * velocity, -2.0 * distance).earliest_nonnegative()
}
