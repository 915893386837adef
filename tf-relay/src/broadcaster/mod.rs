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

//! tf2-style broadcasters that encode transforms and hand them to a [`Transport`].
//!
//! [`Transport`]: crate::transport::Transport

mod static_transform_broadcaster;
mod transform_broadcaster;

pub use static_transform_broadcaster::StaticTransformBroadcaster;
pub use transform_broadcaster::TransformBroadcaster;
