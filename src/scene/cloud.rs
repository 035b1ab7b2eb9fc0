//! Random scatter sampling for vapor, fire and smoke clouds.
//!
//! All sampling draws from a caller-supplied generator so scenes can be
//! reproduced with a seeded source.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::warn;

use super::primitive::CloudPoint;
use crate::Point;

/// Marker size rule for a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerSize {
    Fixed(f32),
    /// Uniform in `[min, max)`.
    Uniform(f32, f32),
}

/// One layer of a scatter cloud.
///
/// Horizontal positions are normally distributed around `center` with
/// standard deviation `spread`; heights are uniform in `z_range`.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub center: Point,
    pub spread: f64,
    pub z_range: (f64, f64),
    pub count: usize,
    pub size: MarkerSize,
    pub opacity: f32,
}

/// Draws `band.count` points.
///
/// An unusable spread (negative or non-finite) gives an empty band.
pub fn sample_band<R: Rng + ?Sized>(rng: &mut R, band: &Band) -> Vec<CloudPoint> {
    let (nx, ny) = match (
        Normal::new(band.center.x, band.spread),
        Normal::new(band.center.y, band.spread),
    ) {
        (Ok(nx), Ok(ny)) => (nx, ny),
        _ => {
            warn!(spread = band.spread, "skipping cloud band with invalid spread");
            return Vec::new();
        }
    };
    let (z_lo, z_hi) = band.z_range;

    (0..band.count)
        .map(|_| CloudPoint {
            position: Point::new(nx.sample(rng), ny.sample(rng), uniform(rng, z_lo, z_hi)),
            size: marker_size(rng, band.size),
            opacity: band.opacity,
        })
        .collect()
}

/// Copy of `points` squashed vertically by `z_scale`, with freshly drawn sizes.
pub fn flatten<R: Rng + ?Sized>(
    rng: &mut R,
    points: &[CloudPoint],
    z_scale: f64,
    size: MarkerSize,
    opacity: f32,
) -> Vec<CloudPoint> {
    points
        .iter()
        .map(|p| CloudPoint {
            position: Point::new(p.position.x, p.position.y, p.position.z * z_scale),
            size: marker_size(rng, size),
            opacity,
        })
        .collect()
}

/// Uniform sample in `[lo, hi)`; collapses to `lo` for an empty or unbounded range.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo && (hi - lo).is_finite() {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn marker_size<R: Rng + ?Sized>(rng: &mut R, size: MarkerSize) -> f32 {
    match size {
        MarkerSize::Fixed(s) => s,
        MarkerSize::Uniform(lo, hi) => {
            if hi > lo && (hi - lo).is_finite() {
                rng.gen_range(lo..hi)
            } else {
                lo
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn band(count: usize) -> Band {
        Band {
            center: Point::new(10., -5., 0.),
            spread: 2.,
            z_range: (0.1, 3.),
            count,
            size: MarkerSize::Uniform(30., 200.),
            opacity: 0.5,
        }
    }

    #[test]
    fn test_sample_band_counts_and_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pts = sample_band(&mut rng, &band(2000));
        assert_eq!(pts.len(), 2000);
        for p in &pts {
            assert!(p.position.z >= 0.1 && p.position.z < 3.);
            assert!(p.size >= 30. && p.size < 200.);
            assert_eq!(p.opacity, 0.5);
        }
        // Sample mean close to the band centre
        let n = pts.len() as f64;
        let mx = pts.iter().map(|p| p.position.x).sum::<f64>() / n;
        let my = pts.iter().map(|p| p.position.y).sum::<f64>() / n;
        assert!((mx - 10.).abs() < 0.3);
        assert!((my + 5.).abs() < 0.3);
        // Sample standard deviation close to the spread
        let sx = (pts.iter().map(|p| (p.position.x - mx).powi(2)).sum::<f64>() / n).sqrt();
        assert!((sx - 2.).abs() < 0.3);
    }

    #[test]
    fn test_sample_band_is_reproducible() {
        let a = sample_band(&mut ChaCha8Rng::seed_from_u64(42), &band(50));
        let b = sample_band(&mut ChaCha8Rng::seed_from_u64(42), &band(50));
        let c = sample_band(&mut ChaCha8Rng::seed_from_u64(43), &band(50));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_spread_gives_empty_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut b = band(10);
        b.spread = f64::NAN;
        assert!(sample_band(&mut rng, &b).is_empty());
        b.spread = -1.;
        assert!(sample_band(&mut rng, &b).is_empty());
    }

    #[test]
    fn test_empty_z_range_collapses() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut b = band(10);
        b.z_range = (0.1, 0.1);
        b.size = MarkerSize::Fixed(15.);
        let pts = sample_band(&mut rng, &b);
        assert!(pts.iter().all(|p| p.position.z == 0.1 && p.size == 15.));
    }

    #[test]
    fn test_unbounded_ranges_do_not_panic() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut b = band(10);
        b.z_range = (0.1, f64::INFINITY);
        b.size = MarkerSize::Uniform(10., f32::INFINITY);
        let pts = sample_band(&mut rng, &b);
        assert_eq!(pts.len(), 10);
        assert!(pts.iter().all(|p| p.position.z == 0.1 && p.size == 10.));

        b.z_range = (-f64::MAX, f64::MAX);
        assert!(sample_band(&mut rng, &b).iter().all(|p| p.position.z == -f64::MAX));
    }

    #[test]
    fn test_flatten_halves_heights() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pts = sample_band(&mut rng, &band(20));
        let low = flatten(&mut rng, &pts, 0.5, MarkerSize::Fixed(10.), 0.8);
        for (a, b) in pts.iter().zip(low.iter()) {
            assert_eq!(a.position.x, b.position.x);
            assert!((b.position.z - a.position.z * 0.5).abs() < 1e-12);
            assert_eq!(b.opacity, 0.8);
        }
    }
}
