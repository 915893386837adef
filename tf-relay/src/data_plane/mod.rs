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

//! Data-plane layer.
//!
//! Odometry arrives on the ingress listener, is converted into a transform, and is
//! queued on a bounded broadcast channel. A single egress worker drains that queue
//! into the [`TransformBroadcaster`](crate::broadcaster::TransformBroadcaster).
//!
//! The channel keeps the newest `queue_depth` transforms; when the worker falls
//! behind, the oldest ones are discarded, matching a keep-last subscription.

pub(crate) mod egress_worker;
pub(crate) mod ingress_listener;
