// ABOUTME: Raw location fix as delivered by a positioning source
// ABOUTME: Position, altitude, instantaneous speed and device timestamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::geo::spherical_distance_m;

/// A single position event from the location producer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    #[serde(default)]
    pub altitude: f64,
    /// Instantaneous speed reported by the device, in m/s
    #[serde(default)]
    pub speed: f64,
    /// Device/GPS clock time in epoch milliseconds
    pub time: i64,
}

impl LocationFix {
    /// Create a fix without altitude or speed information
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, time: i64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
            speed: 0.0,
            time,
        }
    }

    /// Set the altitude
    #[must_use]
    pub const fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    /// Set the device-reported speed
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Great-circle distance to another coordinate, in meters
    #[must_use]
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        spherical_distance_m(self.latitude, self.longitude, latitude, longitude)
    }
}
