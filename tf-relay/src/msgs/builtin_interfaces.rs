/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Definitions for the ROS2 `builtin_interfaces` package.
//!
//! Based on definitions taken from <https://github.com/ros2/rcl_interfaces/tree/rolling/builtin_interfaces/msg>

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Represents a specific point in ROS Time.
///
/// # Examples
/// - The time `-1.7` seconds is represented as `{ sec: -2, nanosec: 300_000_000 }`
/// - The time `1.7` seconds is represented as `{ sec: 1,  nanosec: 700_000_000 }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    /// The seconds component, valid over all `int32` values.
    pub sec: i32,

    /// The nanoseconds component, valid in the range `[0, 1_000_000_000)`.
    pub nanosec: u32,
}

impl Time {
    pub fn new(sec: i32, nanosec: u32) -> Self {
        Self { sec, nanosec }
    }

    /// Builds a time from signed nanoseconds, normalizing `nanosec` into `[0, 1e9)`.
    ///
    /// Seconds outside the `int32` range saturate.
    pub fn from_nanos(nanos: i64) -> Self {
        let sec = nanos.div_euclid(NANOS_PER_SEC);
        let nanosec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
        Self {
            sec: sec.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            nanosec,
        }
    }

    pub fn as_nanos(&self) -> i64 {
        (self.sec as i64) * NANOS_PER_SEC + (self.nanosec as i64)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + (self.nanosec as f64) / 1_000_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_nanos() {
        let time = Time {
            sec: 1,
            nanosec: 700_000_000,
        };
        assert_eq!(time.as_nanos(), 1_700_000_000);

        let time = Time {
            sec: -2,
            nanosec: 300_000_000,
        };
        assert_eq!(time.as_nanos(), -1_700_000_000);
    }

    #[test]
    fn test_from_nanos_normalizes_negative_times() {
        assert_eq!(Time::from_nanos(-1_700_000_000), Time::new(-2, 300_000_000));
        assert_eq!(Time::from_nanos(1_700_000_000), Time::new(1, 700_000_000));
        assert_eq!(Time::from_nanos(0), Time::default());
    }

    #[test]
    fn test_from_nanos_saturates_seconds() {
        assert_eq!(Time::from_nanos(i64::MAX).sec, i32::MAX);
        assert_eq!(Time::from_nanos(i64::MIN).sec, i32::MIN);
    }

    #[test]
    fn test_as_secs_f64() {
        assert_eq!(Time::new(1, 700_000_000).as_secs_f64(), 1.7);
        assert_eq!(Time::new(-2, 300_000_000).as_secs_f64(), -1.7);
    }
}
