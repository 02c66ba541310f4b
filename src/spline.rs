use crate::icme_rate_errors::IcmeRateError;

/// Minimum number of knots for a quadratic interpolant.
const MIN_KNOTS: usize = 3;

/// C¹ quadratic interpolating spline.
///
/// On each knot interval the curve is the quadratic matching both knot
/// values and the left-knot derivative; derivatives chain through the
/// knots, so value and slope are continuous. The starting derivative is
/// taken from the parabola through the first three knots, which makes the
/// spline reproduce any globally quadratic data exactly.
///
/// Queries outside the knot span are an error, never an extrapolation.
#[derive(Debug, Clone)]
pub struct QuadraticSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// first derivative at each knot
    z: Vec<f64>,
}

impl QuadraticSpline {
    /// Build the spline through `(x, y)` control points.
    ///
    /// Arguments
    /// -----------------
    /// * `x`: knot abscissae, strictly increasing, at least 3.
    /// * `y`: knot values, same length as `x`.
    ///
    /// Return
    /// ----------
    /// * The spline, or [`IcmeRateError::InvalidKnots`] /
    ///   [`IcmeRateError::SeriesLengthMismatch`] on malformed input.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, IcmeRateError> {
        if x.len() != y.len() {
            return Err(IcmeRateError::SeriesLengthMismatch {
                left: x.len(),
                right: y.len(),
            });
        }
        if x.len() < MIN_KNOTS || x.windows(2).any(|w| w[0] >= w[1]) {
            return Err(IcmeRateError::InvalidKnots { min: MIN_KNOTS });
        }

        // Slope at x[0] from the parabola through the first three knots
        let (x0, x1, x2) = (x[0], x[1], x[2]);
        let z0 = y[0] * (2.0 * x0 - x1 - x2) / ((x0 - x1) * (x0 - x2))
            + y[1] * (x0 - x2) / ((x1 - x0) * (x1 - x2))
            + y[2] * (x0 - x1) / ((x2 - x0) * (x2 - x1));

        let mut z = Vec::with_capacity(x.len());
        z.push(z0);
        for i in 0..x.len() - 1 {
            let secant = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
            z.push(2.0 * secant - z[i]);
        }

        Ok(Self { x, y, z })
    }

    /// Knot span `(first, last)` over which the spline is defined.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Evaluate the spline at `t`.
    ///
    /// Return
    /// ----------
    /// * The interpolated value, or [`IcmeRateError::OutOfDomain`] when `t`
    ///   lies outside the knot span.
    pub fn eval(&self, t: f64) -> Result<f64, IcmeRateError> {
        let (start, end) = self.domain();
        if !(start..=end).contains(&t) {
            return Err(IcmeRateError::OutOfDomain { t, start, end });
        }

        // interval index such that x[i] <= t, clamped to the last interval
        let i = self
            .x
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(self.x.len() - 2);

        let h = self.x[i + 1] - self.x[i];
        let dx = t - self.x[i];
        Ok(self.y[i] + self.z[i] * dx + (self.z[i + 1] - self.z[i]) / (2.0 * h) * dx * dx)
    }

    /// Evaluate at each grid point; fails on the first out-of-domain query.
    pub fn eval_grid(&self, grid: &[f64]) -> Result<Vec<f64>, IcmeRateError> {
        grid.iter().map(|&t| self.eval(t)).collect()
    }
}

#[cfg(test)]
mod spline_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolates_knots() {
        let x = vec![0.0, 1.0, 2.5, 4.0, 5.0];
        let y = vec![3.0, -1.0, 2.0, 2.0, 7.5];
        let s = QuadraticSpline::new(x.clone(), y.clone()).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert_relative_eq!(s.eval(*xi).unwrap(), *yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_reproduces_quadratic() {
        let x: Vec<f64> = (0..6).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v * v - 3.0 * v + 1.0).collect();
        let s = QuadraticSpline::new(x, y).unwrap();
        for t in [0.5, 2.25, 3.9, 4.999] {
            let expected = 2.0 * t * t - 3.0 * t + 1.0;
            assert_relative_eq!(s.eval(t).unwrap(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_out_of_domain() {
        let s = QuadraticSpline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
        assert!(matches!(
            s.eval(2.0 + 1e-9),
            Err(IcmeRateError::OutOfDomain { .. })
        ));
        assert!(matches!(
            s.eval(-0.1),
            Err(IcmeRateError::OutOfDomain { .. })
        ));
        // endpoints are inside the domain
        assert!(s.eval(0.0).is_ok());
        assert!(s.eval(2.0).is_ok());
    }

    #[test]
    fn test_rejects_bad_knots() {
        assert!(matches!(
            QuadraticSpline::new(vec![0.0, 1.0], vec![0.0, 1.0]),
            Err(IcmeRateError::InvalidKnots { .. })
        ));
        assert!(matches!(
            QuadraticSpline::new(vec![0.0, 1.0, 1.0], vec![0.0, 1.0, 2.0]),
            Err(IcmeRateError::InvalidKnots { .. })
        ));
        assert!(matches!(
            QuadraticSpline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]),
            Err(IcmeRateError::SeriesLengthMismatch { .. })
        ));
    }
}
