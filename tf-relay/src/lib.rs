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

//! # tf-relay
//!
//! `tf-relay` republishes odometry as coordinate-frame transforms, the way a small
//! ROS2 node would: at startup it latches a fixed set of static transforms (by
//! default `base_link -> os_sensor`), then every `nav_msgs/Odometry` arriving on the
//! odometry topic is copied into a `map -> base_link` `TransformStamped` and
//! broadcast on `/tf`.
//!
//! The relay is middleware-agnostic: it talks to a [`Transport`] carrying CDR
//! payloads. [`LocalTransport`] is an in-process implementation; the
//! `tf-relay-zenoh` crate provides one on top of zenoh.
//!
//! ```
//! use std::sync::Arc;
//! use tf_relay::{LocalTransport, RelayConfig, SystemClock, TransformRelay};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = Arc::new(LocalTransport::new());
//! let relay = TransformRelay::new(
//!     RelayConfig::default(),
//!     transport.clone(),
//!     Arc::new(SystemClock),
//! )
//! .unwrap();
//!
//! relay.start().await.unwrap();
//! assert!(transport.latched("/tf_static").await.is_some());
//! relay.stop().await.unwrap();
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Messages and codec: ROS2 message structs and the CDR payload codec
//! - Conversion: odometry to transform copy and tf2-style validation
//! - Broadcasters: dynamic and latched static transform publishing
//! - Data plane: odometry ingress listener and transform egress worker
//! - Runtime: the dedicated worker thread boundary
//!
//! ## Observability model
//!
//! Library code emits `tracing` events with stable `event` names (see
//! [`observability`]) and never installs a global subscriber. Binaries and tests are
//! responsible for `tracing_subscriber` initialization.

pub mod broadcaster;
pub mod cdr;
pub mod clock;
pub mod config;
pub mod conversion;
mod data_plane;
mod error;
pub mod msgs;
#[doc(hidden)]
pub mod observability;
mod relay;
mod runtime;
pub mod transport;

pub use broadcaster::{StaticTransformBroadcaster, TransformBroadcaster};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{RelayConfig, StaticTransformConfig, ZenohConfig};
pub use error::RelayError;
pub use relay::TransformRelay;
pub use transport::{Durability, Listener, LocalTransport, Transport};
