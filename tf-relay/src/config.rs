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

//! Relay configuration, loaded from a JSON5 file.
//!
//! Every field is optional in the file; missing fields take the defaults of the
//! lidar-equipped robot the relay was first written for.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::conversion::{static_transform, validate_transform};
use crate::msgs::builtin_interfaces::Time;
use crate::msgs::geometry_msgs::{Quaternion, Transform, Vector3};
use crate::RelayError;

pub const DEFAULT_NODE_NAME: &str = "tf_static_broadcaster";
pub const DEFAULT_ODOM_TOPIC: &str = "/dlio/odom_node/odom";
pub const DEFAULT_QUEUE_DEPTH: usize = 10;
pub const MAX_QUEUE_DEPTH: usize = 65_536;
pub const DEFAULT_TF_TOPIC: &str = "/tf";
pub const DEFAULT_TF_STATIC_TOPIC: &str = "/tf_static";
pub const DEFAULT_PARENT_FRAME: &str = "map";
pub const DEFAULT_CHILD_FRAME: &str = "base_link";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub node_name: String,
    /// Topic carrying `nav_msgs/Odometry`.
    pub odom_topic: String,
    /// Depth of the keep-last queue between the odometry listener and the broadcaster.
    pub queue_depth: usize,
    pub tf_topic: String,
    pub tf_static_topic: String,
    /// Frame the odometry pose is expressed in, written into `header.frame_id`.
    pub parent_frame: String,
    /// Frame the odometry pose describes, written into `child_frame_id`.
    pub child_frame: String,
    /// Drop transforms with non-finite values or non-unit rotations.
    pub validate: bool,
    pub static_transforms: Vec<StaticTransformConfig>,
    pub zenoh: ZenohConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            node_name: DEFAULT_NODE_NAME.to_string(),
            odom_topic: DEFAULT_ODOM_TOPIC.to_string(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
            tf_topic: DEFAULT_TF_TOPIC.to_string(),
            tf_static_topic: DEFAULT_TF_STATIC_TOPIC.to_string(),
            parent_frame: DEFAULT_PARENT_FRAME.to_string(),
            child_frame: DEFAULT_CHILD_FRAME.to_string(),
            validate: true,
            static_transforms: vec![StaticTransformConfig::default()],
            zenoh: ZenohConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_json5(text: &str) -> Result<Self, RelayError> {
        let config: Self =
            json5::from_str(text).map_err(|err| RelayError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RelayError> {
        let path = path.as_ref();
        debug!("Loading relay configuration from {path:?}");
        let text = fs::read_to_string(path).map_err(|err| {
            RelayError::Config(format!("Unable to read {}: {err}", path.display()))
        })?;
        Self::from_json5(&text)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        let required = [
            ("node_name", &self.node_name),
            ("odom_topic", &self.odom_topic),
            ("tf_topic", &self.tf_topic),
            ("tf_static_topic", &self.tf_static_topic),
            ("parent_frame", &self.parent_frame),
            ("child_frame", &self.child_frame),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(RelayError::Config(format!("{field} must not be empty")));
        }

        if self.queue_depth == 0 {
            return Err(RelayError::Config(
                "queue_depth must be greater than zero".to_string(),
            ));
        }
        if self.queue_depth > MAX_QUEUE_DEPTH {
            return Err(RelayError::Config(format!(
                "queue_depth {} exceeds the maximum of {MAX_QUEUE_DEPTH}",
                self.queue_depth
            )));
        }

        if self.parent_frame == self.child_frame {
            return Err(RelayError::Config(format!(
                "parent_frame and child_frame are both '{}'",
                self.parent_frame
            )));
        }

        for static_transform in &self.static_transforms {
            static_transform.validate()?;
        }

        Ok(())
    }
}

/// A fixed transform published once on the static tf topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticTransformConfig {
    pub parent_frame: String,
    pub child_frame: String,
    /// `[x, y, z]` in meters.
    #[serde(default)]
    pub translation: [f64; 3],
    /// `[x, y, z, w]` quaternion.
    #[serde(default = "identity_rotation")]
    pub rotation: [f64; 4],
}

fn identity_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl Default for StaticTransformConfig {
    fn default() -> Self {
        Self {
            parent_frame: "base_link".to_string(),
            child_frame: "os_sensor".to_string(),
            translation: [0.15, 0.0, 0.158],
            rotation: identity_rotation(),
        }
    }
}

impl StaticTransformConfig {
    pub fn transform(&self) -> Transform {
        let [x, y, z] = self.translation;
        let [qx, qy, qz, qw] = self.rotation;
        Transform {
            translation: Vector3::new(x, y, z),
            rotation: Quaternion::new(qx, qy, qz, qw),
        }
    }

    fn validate(&self) -> Result<(), RelayError> {
        if self.parent_frame.trim().is_empty() || self.child_frame.trim().is_empty() {
            return Err(RelayError::Config(
                "static transform frames must not be empty".to_string(),
            ));
        }
        if self.parent_frame == self.child_frame {
            return Err(RelayError::Config(format!(
                "static transform parent and child are both '{}'",
                self.parent_frame
            )));
        }
        validate_transform(&static_transform(Time::default(), self))
            .map_err(|err| RelayError::Config(format!("static transform: {err}")))
    }
}

/// Settings for the zenoh transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZenohConfig {
    /// Path to a zenoh configuration file; zenoh defaults are used when absent.
    pub config_file: Option<PathBuf>,
    /// Prepended to every key expression, e.g. a robot namespace.
    pub key_prefix: Option<String>,
}
