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

//! Topic-based publish/subscribe seam between the relay and the middleware.
//!
//! Payloads are opaque CDR bytes; topics are ROS2 topic names such as `/tf`.

use async_trait::async_trait;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::RelayError;

mod local;
pub use local::LocalTransport;

/// How long a published sample stays available to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Durability {
    /// Delivered to currently registered listeners only.
    Volatile,
    /// The last sample is kept and handed to listeners that register later.
    TransientLocal,
}

#[async_trait]
pub trait Listener: Send + Sync {
    async fn on_receive(&self, payload: Vec<u8>);
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        durability: Durability,
        payload: Vec<u8>,
    ) -> Result<(), RelayError>;

    async fn register_listener(
        &self,
        topic: &str,
        listener: Arc<dyn Listener>,
    ) -> Result<(), RelayError>;

    async fn unregister_listener(
        &self,
        topic: &str,
        listener: &Arc<dyn Listener>,
    ) -> Result<(), RelayError>;
}

/// Identity wrapper so listeners can be compared and hashed by allocation.
#[derive(Clone)]
pub struct ComparableListener {
    listener: Arc<dyn Listener>,
}

impl ComparableListener {
    pub fn new(listener: Arc<dyn Listener>) -> Self {
        Self { listener }
    }

    pub fn listener(&self) -> &Arc<dyn Listener> {
        &self.listener
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.listener) as *const ()
    }
}

impl Hash for ComparableListener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl PartialEq for ComparableListener {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ComparableListener {}

impl Debug for ComparableListener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparableListener")
            .field("addr", &self.addr())
            .finish()
    }
}
