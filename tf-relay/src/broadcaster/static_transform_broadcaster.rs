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

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cdr;
use crate::msgs::geometry_msgs::TransformStamped;
use crate::msgs::tf2_msgs::TFMessage;
use crate::transport::{Durability, Transport};
use crate::RelayError;

const STATIC_BROADCASTER_TAG: &str = "StaticTransformBroadcaster:";
const STATIC_BROADCASTER_FN_SEND_TAG: &str = "send_transforms():";

/// Publishes latched transforms.
///
/// The broadcaster remembers every transform it was given, keyed by child frame,
/// and republishes the whole set on each send so that a late subscriber only needs
/// the last sample to learn every static frame.
pub struct StaticTransformBroadcaster {
    transport: Arc<dyn Transport>,
    topic: String,
    latched: Mutex<Vec<TransformStamped>>,
}

impl StaticTransformBroadcaster {
    pub fn new(transport: Arc<dyn Transport>, topic: &str) -> Self {
        Self {
            transport,
            topic: topic.to_string(),
            latched: Mutex::new(Vec::new()),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub async fn send_transform(&self, transform: TransformStamped) -> Result<(), RelayError> {
        self.send_transforms(vec![transform]).await
    }

    pub async fn send_transforms(
        &self,
        transforms: Vec<TransformStamped>,
    ) -> Result<(), RelayError> {
        let mut latched = self.latched.lock().await;
        for transform in transforms {
            match latched
                .iter_mut()
                .find(|existing| existing.child_frame_id == transform.child_frame_id)
            {
                Some(existing) => *existing = transform,
                None => latched.push(transform),
            }
        }

        debug!(
            "{STATIC_BROADCASTER_TAG}:{STATIC_BROADCASTER_FN_SEND_TAG} publishing {} latched transforms on {}",
            latched.len(),
            self.topic
        );

        let payload = cdr::encode(&TFMessage {
            transforms: latched.clone(),
        })?;
        self.transport
            .publish(&self.topic, Durability::TransientLocal, payload)
            .await
    }

    pub async fn latched(&self) -> Vec<TransformStamped> {
        self.latched.lock().await.clone()
    }
}
