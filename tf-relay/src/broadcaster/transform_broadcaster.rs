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

use crate::cdr;
use crate::msgs::geometry_msgs::TransformStamped;
use crate::msgs::tf2_msgs::TFMessage;
use crate::transport::{Durability, Transport};
use crate::RelayError;

/// Publishes dynamic transforms, one `TFMessage` per send, without latching.
pub struct TransformBroadcaster {
    transport: Arc<dyn Transport>,
    topic: String,
}

impl TransformBroadcaster {
    pub fn new(transport: Arc<dyn Transport>, topic: &str) -> Self {
        Self {
            transport,
            topic: topic.to_string(),
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
        let payload = cdr::encode(&TFMessage { transforms })?;
        self.transport
            .publish(&self.topic, Durability::Volatile, payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::builtin_interfaces::Time;
    use crate::msgs::std_msgs::Header;
    use crate::transport::{Listener, LocalTransport};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingListener {
        messages: Mutex<Vec<TFMessage>>,
    }

    #[async_trait]
    impl Listener for CollectingListener {
        async fn on_receive(&self, payload: Vec<u8>) {
            let message = cdr::decode(&payload).expect("valid TFMessage");
            self.messages.lock().expect("lock messages").push(message);
        }
    }

    fn transform(child: &str) -> TransformStamped {
        TransformStamped {
            header: Header::new(Time::new(1, 0), "map"),
            child_frame_id: child.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn each_send_is_one_tf_message() {
        let transport = Arc::new(LocalTransport::new());
        let collector = Arc::new(CollectingListener::default());
        transport.register_listener("/tf", collector.clone()).await.unwrap();

        let broadcaster = TransformBroadcaster::new(transport.clone(), "/tf");
        broadcaster.send_transform(transform("base_link")).await.unwrap();
        broadcaster
            .send_transforms(vec![transform("a"), transform("b")])
            .await
            .unwrap();

        let messages = collector.messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].transforms, vec![transform("base_link")]);
        assert_eq!(messages[1].transforms.len(), 2);
        assert!(transport.latched("/tf").await.is_none());
    }
}
