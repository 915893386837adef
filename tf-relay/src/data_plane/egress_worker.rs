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

//! Egress worker that drains queued transforms into the transform broadcaster.

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::broadcaster::TransformBroadcaster;
use crate::msgs::geometry_msgs::TransformStamped;
use crate::observability::{events, fields};
use crate::runtime::worker_runtime::spawn_transform_forwarding_loop;

const COMPONENT: &str = "egress_worker";

pub(crate) struct TransformForwarder {
    id: String,
    handle: Option<JoinHandle<()>>,
}

impl TransformForwarder {
    pub(crate) fn new(
        relay_name: &str,
        broadcaster: Arc<TransformBroadcaster>,
        transform_receiver: Receiver<Arc<TransformStamped>>,
    ) -> io::Result<Self> {
        let id = Uuid::new_v4().hyphenated().to_string();
        let worker_id = id.clone();

        let handle = spawn_transform_forwarding_loop(
            format!("{relay_name}-egress"),
            broadcaster,
            transform_receiver,
            move |broadcaster, transform_receiver| async move {
                Self::transform_forwarding_loop(worker_id, broadcaster, transform_receiver).await;
            },
        )?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    /// Blocks until the worker thread has exited, which happens once every sender
    /// of its queue has been dropped.
    pub(crate) fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(
                    component = COMPONENT,
                    worker_id = self.id.as_str(),
                    "egress worker panicked"
                );
            }
        }
    }

    pub(crate) async fn transform_forwarding_loop(
        id: String,
        broadcaster: Arc<TransformBroadcaster>,
        mut transform_receiver: Receiver<Arc<TransformStamped>>,
    ) {
        let worker_id = id.as_str();
        loop {
            let transform = match transform_receiver.recv().await {
                Ok(transform) => transform,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        event = events::EGRESS_LAGGED,
                        component = COMPONENT,
                        worker_id,
                        skipped,
                        "egress worker fell behind, oldest transforms dropped"
                    );
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let frames = fields::format_frames(&transform);
            debug!(
                event = events::EGRESS_SEND_ATTEMPT,
                component = COMPONENT,
                worker_id,
                topic = broadcaster.topic(),
                frames = frames.as_str(),
                stamp = %fields::format_stamp(&transform.header.stamp),
                "broadcasting transform"
            );

            match broadcaster.send_transform((*transform).clone()).await {
                Ok(()) => debug!(
                    event = events::EGRESS_SEND_OK,
                    component = COMPONENT,
                    worker_id,
                    frames = frames.as_str(),
                    "{}",
                    fields::format_published(&transform)
                ),
                Err(err) => warn!(
                    event = events::EGRESS_SEND_FAILED,
                    component = COMPONENT,
                    worker_id,
                    frames = frames.as_str(),
                    %err,
                    "broadcasting transform failed"
                ),
            }
        }

        info!(
            event = events::EGRESS_WORKER_EXIT,
            component = COMPONENT,
            worker_id,
            "transform queue closed, egress worker exiting"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdr;
    use crate::msgs::builtin_interfaces::Time;
    use crate::msgs::std_msgs::Header;
    use crate::msgs::tf2_msgs::TFMessage;
    use crate::transport::{Durability, Listener, Transport};
    use crate::RelayError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::broadcast;

    #[derive(Default)]
    struct RecordingTransport {
        published: Mutex<Vec<(String, Durability, TFMessage)>>,
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn publish(
            &self,
            topic: &str,
            durability: Durability,
            payload: Vec<u8>,
        ) -> Result<(), RelayError> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok()
            {
                return Err(RelayError::transport(topic, "injected failure"));
            }
            let message = cdr::decode(&payload)?;
            self.published
                .lock()
                .expect("lock published")
                .push((topic.to_string(), durability, message));
            Ok(())
        }

        async fn register_listener(
            &self,
            _topic: &str,
            _listener: Arc<dyn Listener>,
        ) -> Result<(), RelayError> {
            Ok(())
        }

        async fn unregister_listener(
            &self,
            _topic: &str,
            _listener: &Arc<dyn Listener>,
        ) -> Result<(), RelayError> {
            Ok(())
        }
    }

    fn transform(sec: i32) -> Arc<TransformStamped> {
        Arc::new(TransformStamped {
            header: Header::new(Time::new(sec, 0), "map"),
            child_frame_id: "base_link".to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn forwards_queue_in_order_until_closed() {
        let transport = Arc::new(RecordingTransport::default());
        let broadcaster = Arc::new(TransformBroadcaster::new(transport.clone(), "/tf"));
        let (tx, rx) = broadcast::channel(8);

        tx.send(transform(1)).unwrap();
        tx.send(transform(2)).unwrap();
        drop(tx);

        TransformForwarder::transform_forwarding_loop("test".to_string(), broadcaster, rx).await;

        let published = transport.published.lock().unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, "/tf");
        assert_eq!(published[0].1, Durability::Volatile);
        assert_eq!(published[0].2.transforms[0].header.stamp, Time::new(1, 0));
        assert_eq!(published[1].2.transforms[0].header.stamp, Time::new(2, 0));
    }

    #[tokio::test]
    async fn lagging_keeps_newest_transforms() {
        let transport = Arc::new(RecordingTransport::default());
        let broadcaster = Arc::new(TransformBroadcaster::new(transport.clone(), "/tf"));
        let (tx, rx) = broadcast::channel(2);

        for sec in 1..=5 {
            tx.send(transform(sec)).unwrap();
        }
        drop(tx);

        TransformForwarder::transform_forwarding_loop("test".to_string(), broadcaster, rx).await;

        let stamps: Vec<i32> = transport
            .published
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, message)| message.transforms[0].header.stamp.sec)
            .collect();
        assert_eq!(stamps, vec![4, 5]);
    }

    #[tokio::test]
    async fn publish_failure_does_not_stop_worker() {
        let transport = Arc::new(RecordingTransport {
            failures_left: AtomicUsize::new(1),
            ..Default::default()
        });
        let broadcaster = Arc::new(TransformBroadcaster::new(transport.clone(), "/tf"));
        let (tx, rx) = broadcast::channel(8);

        tx.send(transform(1)).unwrap();
        tx.send(transform(2)).unwrap();
        drop(tx);

        TransformForwarder::transform_forwarding_loop("test".to_string(), broadcaster, rx).await;

        let published = transport.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].2.transforms[0].header.stamp, Time::new(2, 0));
    }

    #[test]
    fn spawned_worker_exits_when_senders_drop() {
        let transport = Arc::new(RecordingTransport::default());
        let broadcaster = Arc::new(TransformBroadcaster::new(transport.clone(), "/tf"));
        let (tx, rx) = broadcast::channel(8);

        let forwarder = TransformForwarder::new("test", broadcaster, rx).unwrap();
        assert!(!forwarder.id().is_empty());
        tx.send(transform(3)).unwrap();
        drop(tx);
        forwarder.join();

        let published = transport.published.lock().unwrap();
        assert_eq!(published.len(), 1);
    }
}
