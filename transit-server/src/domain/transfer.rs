//! Walking transfers between nearby stops.

use super::{DomainError, StopId};

/// A directed walking connection between two stops.
///
/// A walk that can be made in both directions is stored as two transfers.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: StopId,
    pub to: StopId,
    pub duration_secs: u32,
    distance_m: f64,
    pub accessible: bool,
}

impl Transfer {
    /// Create a transfer, validating the walking distance.
    pub fn new(
        from: StopId,
        to: StopId,
        duration_secs: u32,
        distance_m: f64,
        accessible: bool,
    ) -> Result<Self, DomainError> {
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(DomainError::InvalidDistance(distance_m));
        }
        Ok(Self {
            from,
            to,
            duration_secs,
            distance_m,
            accessible,
        })
    }

    /// Walking distance in metres.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// The same walk in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            ..self.clone()
        }
    }
}
