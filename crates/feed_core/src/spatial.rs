//! Spatial operations: great-circle distance and randomized locations around
//! a city center.
//!
//! This module provides:
//!
//! - **haversine_km**: distance between two [`Location`]s on a 6371 km sphere
//! - **GeoSampler**: uniform-disk or Gaussian-clustered location sampling
//!
//! Offsets are converted to degrees with a flat 111 km/degree approximation,
//! which is accurate enough at city scale.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::records::Location;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.0;

/// Largest sampling radius accepted; keeps estimates at city scale.
pub const MAX_RADIUS_KM: f64 = 50.0;

pub fn haversine_km(a: Location, b: Location) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// How offsets from the anchor point are drawn.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationStrategy {
    /// Uniform areal density inside the radius.
    #[default]
    UniformDisk,
    /// Per-axis normal offsets (sigma = radius / 2), truncated to +/- radius.
    Gaussian,
}

#[derive(Debug, Clone)]
pub struct GeoSampler {
    center: Location,
    radius_km: f64,
    strategy: LocationStrategy,
    normal: Normal<f64>,
}

impl GeoSampler {
    pub fn try_new(center: Location, radius_km: f64, strategy: LocationStrategy) -> FeedResult<Self> {
        if !(center.latitude.abs() < 90.0 && center.longitude.abs() <= 180.0) {
            return Err(FeedError::Config(format!(
                "city center ({}, {}) is not a valid coordinate",
                center.latitude, center.longitude
            )));
        }
        if !(radius_km > 0.0 && radius_km <= MAX_RADIUS_KM) {
            return Err(FeedError::Config(format!(
                "radius {radius_km} km must be in (0, {MAX_RADIUS_KM}]"
            )));
        }
        let normal = Normal::new(0.0, radius_km / 2.0)
            .map_err(|error| FeedError::Config(format!("gaussian sampler: {error}")))?;
        Ok(Self {
            center,
            radius_km,
            strategy,
            normal,
        })
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn strategy(&self) -> LocationStrategy {
        self.strategy
    }

    /// Upper bound on the distance between the anchor and any sampled point.
    pub fn max_offset_km(&self) -> f64 {
        match self.strategy {
            LocationStrategy::UniformDisk => self.radius_km,
            LocationStrategy::Gaussian => self.radius_km * std::f64::consts::SQRT_2,
        }
    }

    /// Sample a location around the configured city center.
    pub fn sample_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Location {
        self.sample_near(self.center, rng)
    }

    /// Sample a location around `base` with the configured radius.
    pub fn sample_near<R: Rng + ?Sized>(&self, base: Location, rng: &mut R) -> Location {
        let (north_km, east_km) = match self.strategy {
            LocationStrategy::UniformDisk => {
                let theta = rng.gen_range(0.0..std::f64::consts::TAU);
                let r = self.radius_km * rng.gen::<f64>().sqrt();
                (r * theta.cos(), r * theta.sin())
            }
            LocationStrategy::Gaussian => {
                let north = self.normal.sample(rng).clamp(-self.radius_km, self.radius_km);
                let east = self.normal.sample(rng).clamp(-self.radius_km, self.radius_km);
                (north, east)
            }
        };
        offset_location(base, north_km, east_km)
    }
}

fn offset_location(base: Location, north_km: f64, east_km: f64) -> Location {
    let delta_lat = north_km / KM_PER_DEGREE;
    let delta_lon = east_km / (KM_PER_DEGREE * base.latitude.to_radians().cos());
    Location::new(base.latitude + delta_lat, base.longitude + delta_lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn nyc() -> Location {
        Location::new(40.7128, -74.0060)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = nyc();
        assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_positive() {
        let a = nyc();
        let b = Location::new(40.7580, -73.9855);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-12);
        assert!(ab > 5.0 && ab < 6.0, "Midtown is ~5.3 km from downtown, got {ab}");
    }

    #[test]
    fn triangle_inequality_holds_for_sampled_points() {
        let sampler = GeoSampler::try_new(nyc(), 10.0, LocationStrategy::UniformDisk).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let a = sampler.sample_location(&mut rng);
            let b = sampler.sample_location(&mut rng);
            let c = sampler.sample_location(&mut rng);
            assert!(haversine_km(a, c) <= haversine_km(a, b) + haversine_km(b, c) + 1e-9);
        }
    }

    #[test]
    fn uniform_disk_stays_within_radius() {
        let sampler = GeoSampler::try_new(nyc(), 3.3, LocationStrategy::UniformDisk).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            let loc = sampler.sample_location(&mut rng);
            assert!(haversine_km(nyc(), loc) <= sampler.max_offset_km() * 1.01);
        }
    }

    #[test]
    fn gaussian_is_truncated_and_clusters_near_center() {
        let sampler = GeoSampler::try_new(nyc(), 5.0, LocationStrategy::Gaussian).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut inside_half_radius = 0;
        let n = 4_000;
        for _ in 0..n {
            let d = haversine_km(nyc(), sampler.sample_location(&mut rng));
            assert!(d <= sampler.max_offset_km() * 1.01);
            if d <= 2.5 {
                inside_half_radius += 1;
            }
        }
        // Chi distribution with 2 dof at one sigma: ~39% of the mass.
        let share = inside_half_radius as f64 / n as f64;
        assert!(share > 0.3 && share < 0.5, "share within sigma was {share}");
    }

    #[test]
    fn sample_near_uses_base_location() {
        let sampler = GeoSampler::try_new(nyc(), 2.0, LocationStrategy::UniformDisk).unwrap();
        let base = Location::new(40.80, -73.95);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let loc = sampler.sample_near(base, &mut rng);
            assert!(haversine_km(base, loc) <= 2.0 * 1.01);
        }
    }

    #[test]
    fn invalid_radius_or_center_is_rejected() {
        assert!(GeoSampler::try_new(nyc(), 0.0, LocationStrategy::UniformDisk).is_err());
        assert!(GeoSampler::try_new(nyc(), 500.0, LocationStrategy::Gaussian).is_err());
        assert!(GeoSampler::try_new(Location::new(95.0, 0.0), 1.0, LocationStrategy::Gaussian).is_err());
    }
}
