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

//! In-process transport, used by tests and by applications embedding the relay.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::{ComparableListener, Durability, Listener, Transport};
use crate::RelayError;

const LOCAL_TRANSPORT_TAG: &str = "LocalTransport:";
const LOCAL_TRANSPORT_FN_PUBLISH_TAG: &str = "publish():";
const LOCAL_TRANSPORT_FN_REGISTER_TAG: &str = "register_listener():";

#[derive(Default)]
struct TopicState {
    listeners: Vec<ComparableListener>,
    latched: Option<Vec<u8>>,
}

/// Delivers every publish to the listeners registered on the same topic, in
/// registration order, before `publish` returns.
#[derive(Default)]
pub struct LocalTransport {
    topics: Mutex<HashMap<String, TopicState>>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn listener_count(&self, topic: &str) -> usize {
        self.topics
            .lock()
            .await
            .get(topic)
            .map_or(0, |state| state.listeners.len())
    }

    /// The sample currently latched on a transient-local topic.
    pub async fn latched(&self, topic: &str) -> Option<Vec<u8>> {
        self.topics
            .lock()
            .await
            .get(topic)
            .and_then(|state| state.latched.clone())
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn publish(
        &self,
        topic: &str,
        durability: Durability,
        payload: Vec<u8>,
    ) -> Result<(), RelayError> {
        let listeners = {
            let mut topics = self.topics.lock().await;
            let state = topics.entry(topic.to_string()).or_default();
            if durability == Durability::TransientLocal {
                state.latched = Some(payload.clone());
            }
            state.listeners.clone()
        };

        trace!(
            "{LOCAL_TRANSPORT_TAG}:{LOCAL_TRANSPORT_FN_PUBLISH_TAG} topic: {topic}, listeners: {}",
            listeners.len()
        );

        for listener in listeners {
            listener.listener().on_receive(payload.clone()).await;
        }
        Ok(())
    }

    async fn register_listener(
        &self,
        topic: &str,
        listener: Arc<dyn Listener>,
    ) -> Result<(), RelayError> {
        let comparable = ComparableListener::new(listener.clone());
        let latched = {
            let mut topics = self.topics.lock().await;
            let state = topics.entry(topic.to_string()).or_default();
            if state.listeners.contains(&comparable) {
                return Err(RelayError::AlreadyExists(topic.to_string()));
            }
            state.listeners.push(comparable);
            state.latched.clone()
        };

        debug!("{LOCAL_TRANSPORT_TAG}:{LOCAL_TRANSPORT_FN_REGISTER_TAG} registered on {topic}");

        if let Some(payload) = latched {
            listener.on_receive(payload).await;
        }
        Ok(())
    }

    async fn unregister_listener(
        &self,
        topic: &str,
        listener: &Arc<dyn Listener>,
    ) -> Result<(), RelayError> {
        let comparable = ComparableListener::new(listener.clone());
        let mut topics = self.topics.lock().await;
        let Some(state) = topics.get_mut(topic) else {
            return Err(RelayError::NotFound(topic.to_string()));
        };

        let before = state.listeners.len();
        state.listeners.retain(|registered| registered != &comparable);
        if state.listeners.len() == before {
            return Err(RelayError::NotFound(topic.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingListener {
        received: StdMutex<Vec<Vec<u8>>>,
    }

    impl RecordingListener {
        fn received(&self) -> Vec<Vec<u8>> {
            self.received.lock().expect("lock received").clone()
        }
    }

    #[async_trait]
    impl Listener for RecordingListener {
        async fn on_receive(&self, payload: Vec<u8>) {
            self.received.lock().expect("lock received").push(payload);
        }
    }

    #[tokio::test]
    async fn publish_reaches_listeners_of_the_topic_only() {
        let transport = LocalTransport::new();
        let on_tf = Arc::new(RecordingListener::default());
        let on_odom = Arc::new(RecordingListener::default());
        transport.register_listener("/tf", on_tf.clone()).await.unwrap();
        transport.register_listener("/odom", on_odom.clone()).await.unwrap();

        transport
            .publish("/tf", Durability::Volatile, vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(on_tf.received(), vec![vec![1, 2, 3]]);
        assert!(on_odom.received().is_empty());
    }

    #[tokio::test]
    async fn volatile_samples_are_not_replayed() {
        let transport = LocalTransport::new();
        transport
            .publish("/tf", Durability::Volatile, vec![1])
            .await
            .unwrap();

        let late = Arc::new(RecordingListener::default());
        transport.register_listener("/tf", late.clone()).await.unwrap();

        assert!(late.received().is_empty());
        assert!(transport.latched("/tf").await.is_none());
    }

    #[tokio::test]
    async fn transient_local_sample_is_replayed_to_late_listener() {
        let transport = LocalTransport::new();
        transport
            .publish("/tf_static", Durability::TransientLocal, vec![1])
            .await
            .unwrap();
        transport
            .publish("/tf_static", Durability::TransientLocal, vec![2])
            .await
            .unwrap();

        let late = Arc::new(RecordingListener::default());
        transport
            .register_listener("/tf_static", late.clone())
            .await
            .unwrap();

        assert_eq!(late.received(), vec![vec![2]]);
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let transport = LocalTransport::new();
        let listener: Arc<dyn Listener> = Arc::new(RecordingListener::default());

        transport.register_listener("/tf", listener.clone()).await.unwrap();
        let err = transport.register_listener("/tf", listener).await.unwrap_err();

        assert!(matches!(err, RelayError::AlreadyExists(_)));
        assert_eq!(transport.listener_count("/tf").await, 1);
    }

    #[tokio::test]
    async fn unregister_stops_delivery_and_rejects_unknown_listener() {
        let transport = LocalTransport::new();
        let recording = Arc::new(RecordingListener::default());
        let listener: Arc<dyn Listener> = recording.clone();

        transport.register_listener("/tf", listener.clone()).await.unwrap();
        transport.unregister_listener("/tf", &listener).await.unwrap();
        transport
            .publish("/tf", Durability::Volatile, vec![7])
            .await
            .unwrap();

        assert!(recording.received().is_empty());
        assert!(matches!(
            transport.unregister_listener("/tf", &listener).await,
            Err(RelayError::NotFound(_))
        ));
        assert!(matches!(
            transport.unregister_listener("/missing", &listener).await,
            Err(RelayError::NotFound(_))
        ));
    }
}
