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

//! Time source used to stamp transforms the relay produces itself.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::msgs::builtin_interfaces::Time;

pub trait Clock: Send + Sync {
    fn now(&self) -> Time;
}

/// Wall-clock time relative to the UNIX epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Time::from_nanos(elapsed.as_nanos().min(i64::MAX as u128) as i64),
            Err(before_epoch) => {
                let nanos = before_epoch.duration().as_nanos().min(i64::MAX as u128) as i64;
                Time::from_nanos(-nanos)
            }
        }
    }
}

/// A clock frozen at a given time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Time);

impl Clock for FixedClock {
    fn now(&self) -> Time {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now().sec > 1_577_836_800);
    }

    #[test]
    fn fixed_clock_returns_its_time() {
        let clock = FixedClock(Time::new(42, 7));
        assert_eq!(clock.now(), Time::new(42, 7));
    }
}
