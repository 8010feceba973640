//! Walking transfers derived from stop positions.
//!
//! Timetables often ship without transfers, or with only a few. This
//! module proposes a walk between every pair of stops that lie within a
//! given radius of each other. It compares every pair of stops, so it is
//! meant for preparing data ahead of time rather than for use during a
//! search.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{DomainError, Stop, StopId, Transfer};

/// Default walking speed (metres per second).
pub const DEFAULT_WALKING_SPEED_MPS: f64 = 1.4;

/// Produces symmetric walking transfers between nearby stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferGenerator {
    walking_speed_mps: f64,
}

impl TransferGenerator {
    /// Create a generator with a custom walking speed.
    pub fn new(walking_speed_mps: f64) -> Result<Self, DomainError> {
        if !walking_speed_mps.is_finite() || walking_speed_mps <= 0.0 {
            return Err(DomainError::InvalidWalkingSpeed(walking_speed_mps));
        }
        Ok(Self { walking_speed_mps })
    }

    pub fn walking_speed_mps(&self) -> f64 {
        self.walking_speed_mps
    }

    /// Seconds needed to walk `distance_m`, rounded up.
    pub fn walking_secs(&self, distance_m: f64) -> u32 {
        (distance_m / self.walking_speed_mps).ceil() as u32
    }

    /// Generate transfers between every pair of stops at most `radius_m`
    /// apart.
    ///
    /// Each pair yields two transfers, one per direction, with the same
    /// duration and distance. All generated transfers are marked
    /// accessible.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDistance`] if `radius_m` is negative or
    /// not finite.
    ///
    /// ```
    /// use transit_server::domain::{Coordinates, Stop, StopId};
    /// use transit_server::transfers::TransferGenerator;
    ///
    /// let stop = |id: &str, lng: f64| {
    ///     Stop::new(StopId::parse(id).unwrap(), id, Coordinates::new(0.0, lng).unwrap())
    /// };
    /// // About 111 m apart
    /// let stops = vec![stop("A", 0.0), stop("B", 0.001)];
    ///
    /// let generator = TransferGenerator::default();
    /// let transfers = generator.generate(&stops, 200.0).unwrap();
    /// assert_eq!(transfers.len(), 2);
    /// assert_eq!(transfers[0].duration_secs, 80);
    ///
    /// assert!(generator.generate(&stops, 100.0).unwrap().is_empty());
    /// assert!(generator.generate(&stops, f64::NAN).is_err());
    /// ```
    pub fn generate(&self, stops: &[Stop], radius_m: f64) -> Result<Vec<Transfer>, DomainError> {
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(DomainError::InvalidDistance(radius_m));
        }

        let mut transfers = Vec::new();

        for (i, a) in stops.iter().enumerate() {
            for b in &stops[i + 1..] {
                if a.id == b.id {
                    continue;
                }

                let distance_m = a.distance_m(b);
                if distance_m > radius_m {
                    continue;
                }

                let duration = self.walking_secs(distance_m);
                let forward =
                    Transfer::new(a.id.clone(), b.id.clone(), duration, distance_m, true)?;
                let backward = forward.reversed();
                transfers.push(forward);
                transfers.push(backward);
            }
        }

        debug!(
            stops = stops.len(),
            radius_m,
            transfers = transfers.len(),
            "Generated walking transfers"
        );

        Ok(transfers)
    }
}

impl Default for TransferGenerator {
    fn default() -> Self {
        Self {
            walking_speed_mps: DEFAULT_WALKING_SPEED_MPS,
        }
    }
}

/// Add generated transfers to an existing list.
///
/// A generated transfer is skipped when the list already holds a transfer
/// between the same stops in the same direction. Returns the number added.
pub fn merge_transfers(existing: &mut Vec<Transfer>, generated: Vec<Transfer>) -> usize {
    let mut present: HashSet<(StopId, StopId)> = existing
        .iter()
        .map(|t| (t.from.clone(), t.to.clone()))
        .collect();

    let before = existing.len();
    for transfer in generated {
        if present.insert((transfer.from.clone(), transfer.to.clone())) {
            existing.push(transfer);
        }
    }
    existing.len() - before
}
