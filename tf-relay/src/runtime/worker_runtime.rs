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

//! Runtime helper for spawning worker forwarding loops.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::runtime::Builder;
use tokio::sync::broadcast::Receiver;

use crate::broadcaster::TransformBroadcaster;
use crate::msgs::geometry_msgs::TransformStamped;

/// Runs `run_loop` on a dedicated thread with its own current-thread runtime.
pub(crate) fn spawn_transform_forwarding_loop<F, Fut>(
    thread_name: String,
    broadcaster: Arc<TransformBroadcaster>,
    transform_receiver: Receiver<Arc<TransformStamped>>,
    run_loop: F,
) -> io::Result<JoinHandle<()>>
where
    F: FnOnce(Arc<TransformBroadcaster>, Receiver<Arc<TransformStamped>>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + 'static,
{
    let runtime = Builder::new_current_thread().enable_all().build()?;

    thread::Builder::new().name(thread_name).spawn(move || {
        runtime.block_on(run_loop(broadcaster, transform_receiver));
    })
}
