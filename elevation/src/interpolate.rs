/// Strategy combining the four raster samples around a point.
///
/// `x_frac` and `y_frac` are fractional pixel offsets from the
/// north-west corner sample; implementations must agree with the raw
/// samples at the corners.
pub trait Interpolator {
    fn interpolate(&self, sw: f32, se: f32, nw: f32, ne: f32, x_frac: f32, y_frac: f32) -> f32;
}

/// Caller-selected interpolation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Bilinear,
    Hyperbolic,
}

impl InterpolationMode {
    /// Resolves the mode to its strategy, once per query.
    pub fn interpolator(self) -> &'static dyn Interpolator {
        match self {
            Self::Bilinear => &BilinearInterpolator,
            Self::Hyperbolic => &HyperbolicInterpolator,
        }
    }
}

/// Weighted bilinear average of the four corners.
pub struct BilinearInterpolator;

impl Interpolator for BilinearInterpolator {
    fn interpolate(&self, sw: f32, se: f32, nw: f32, ne: f32, x_frac: f32, y_frac: f32) -> f32 {
        let north = nw + (ne - nw) * x_frac;
        let south = sw + (se - sw) * x_frac;
        north + (south - north) * y_frac
    }
}

/// Inverse-square-distance weighting of the four corners.
///
/// Pulls harder toward the nearest sample than bilinear does, which
/// renders smoother ridgelines on steep terrain.
pub struct HyperbolicInterpolator;

impl Interpolator for HyperbolicInterpolator {
    fn interpolate(&self, sw: f32, se: f32, nw: f32, ne: f32, x_frac: f32, y_frac: f32) -> f32 {
        let corners = [
            (nw, 0.0, 0.0),
            (ne, 1.0, 0.0),
            (sw, 0.0, 1.0),
            (se, 1.0, 1.0),
        ];
        let mut numerator = 0.0f32;
        let mut denominator = 0.0f32;
        for (height, corner_x, corner_y) in corners {
            let distance_sq = (x_frac - corner_x).powi(2) + (y_frac - corner_y).powi(2);
            if distance_sq == 0.0 {
                return height;
            }
            let weight = 1.0 / distance_sq;
            numerator += weight * height;
            denominator += weight;
        }
        numerator / denominator
    }
}
