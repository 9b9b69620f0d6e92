// ABOUTME: Great-circle distance between latitude/longitude pairs
// ABOUTME: Haversine formula on a spherical Earth model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::units::EARTH_RADIUS_M;

/// Shortest surface distance between two coordinates, in meters.
#[must_use]
pub fn spherical_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (lat1.to_radians().cos() * lat2.to_radians().cos())
        .mul_add((dlon / 2.0).sin().powi(2), (dlat / 2.0).sin().powi(2));
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Latitude offset in degrees that corresponds to `meters` due north.
///
/// Handy for building synthetic tracks; exact on the sphere model.
#[must_use]
pub fn meters_to_latitude_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}
