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

//! Stable event names and field formatters shared by the relay's tracing events.
//!
//! Log scrapers match on `event=<name>`, so the names below are part of the
//! operational contract and should not be renamed casually.

pub mod events {
    pub const RELAY_START: &str = "relay_start";
    pub const RELAY_STOP: &str = "relay_stop";
    pub const STATIC_PUBLISHED: &str = "static_published";
    pub const INGRESS_RECEIVE: &str = "ingress_receive";
    pub const INGRESS_DECODE_FAILED: &str = "ingress_decode_failed";
    pub const INGRESS_INVALID_TRANSFORM: &str = "ingress_invalid_transform";
    pub const INGRESS_SEND_TO_QUEUE_FAILED: &str = "ingress_send_to_queue_failed";
    pub const EGRESS_SEND_ATTEMPT: &str = "egress_send_attempt";
    pub const EGRESS_SEND_OK: &str = "egress_send_ok";
    pub const EGRESS_SEND_FAILED: &str = "egress_send_failed";
    pub const EGRESS_LAGGED: &str = "egress_lagged";
    pub const EGRESS_WORKER_EXIT: &str = "egress_worker_exit";
}

pub mod fields {
    use crate::msgs::builtin_interfaces::Time;
    use crate::msgs::geometry_msgs::TransformStamped;

    pub fn format_stamp(stamp: &Time) -> String {
        format!("{}.{:09}", stamp.sec, stamp.nanosec)
    }

    pub fn format_frames(transform: &TransformStamped) -> String {
        format!(
            "{}->{}",
            transform.header.frame_id, transform.child_frame_id
        )
    }

    /// Message logged for every published transform, static or dynamic. Log
    /// scrapers match on this wording.
    pub fn format_published(transform: &TransformStamped) -> String {
        format!(
            "Published static transform from '{}' to '{}'",
            transform.header.frame_id, transform.child_frame_id
        )
    }

}
