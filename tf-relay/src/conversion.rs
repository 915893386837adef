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

//! Conversions from incoming messages to the transforms the relay broadcasts.

use crate::config::StaticTransformConfig;
use crate::msgs::builtin_interfaces::Time;
use crate::msgs::geometry_msgs::{Quaternion, Transform, TransformStamped, Vector3};
use crate::msgs::nav_msgs::Odometry;
use crate::msgs::std_msgs::Header;
use crate::RelayError;

/// Largest accepted deviation of `|q|^2` from one.
pub const QUATERNION_NORMALIZATION_TOLERANCE: f64 = 10e-3;

/// Copies the stamp and pose of `odometry` into a `parent -> child` transform.
///
/// The frame ids carried by the odometry message itself are ignored.
pub fn odometry_to_transform(odometry: &Odometry, parent: &str, child: &str) -> TransformStamped {
    let pose = &odometry.pose.pose;
    TransformStamped {
        header: Header::new(odometry.header.stamp, parent),
        child_frame_id: child.to_string(),
        transform: Transform {
            translation: Vector3::new(pose.position.x, pose.position.y, pose.position.z),
            rotation: Quaternion::new(
                pose.orientation.x,
                pose.orientation.y,
                pose.orientation.z,
                pose.orientation.w,
            ),
        },
    }
}

pub fn static_transform(stamp: Time, config: &StaticTransformConfig) -> TransformStamped {
    TransformStamped {
        header: Header::new(stamp, config.parent_frame.as_str()),
        child_frame_id: config.child_frame.clone(),
        transform: config.transform(),
    }
}

/// Rejects transforms that a tf2 buffer would refuse to insert.
pub fn validate_transform(transform: &TransformStamped) -> Result<(), RelayError> {
    let invalid = |reason: String| RelayError::InvalidTransform {
        parent: transform.header.frame_id.clone(),
        child: transform.child_frame_id.clone(),
        reason,
    };

    let Transform {
        translation,
        rotation,
    } = &transform.transform;

    let components = [
        translation.x,
        translation.y,
        translation.z,
        rotation.x,
        rotation.y,
        rotation.z,
        rotation.w,
    ];
    if components.iter().any(|value| !value.is_finite()) {
        return Err(invalid("non-finite component".to_string()));
    }

    let norm_squared = rotation.norm_squared();
    if (norm_squared - 1.0).abs() > QUATERNION_NORMALIZATION_TOLERANCE {
        return Err(invalid(format!(
            "rotation is not normalized (|q|^2 = {norm_squared})"
        )));
    }

    Ok(())
}
