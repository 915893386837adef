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

//! # tf-relay-zenoh
//!
//! A [`Transport`] for `tf-relay` on top of a zenoh session.
//!
//! ROS2 topics map onto zenoh key expressions the same way `zenoh-bridge-ros2dds`
//! and `rmw_zenoh` name them: the leading `/` is dropped and an optional namespace
//! prefix is prepended, so `/dlio/odom_node/odom` becomes `dlio/odom_node/odom`.
//! Payloads are the CDR bytes produced by [`tf_relay::cdr`].
//!
//! Transient-local publishes are kept per key and answered from a queryable, which
//! is how late joiners on zenoh retrieve latched data such as `/tf_static`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tf_relay::transport::ComparableListener;
use tf_relay::{Durability, Listener, RelayError, Transport, ZenohConfig};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};
use zenoh::pubsub::Subscriber;
use zenoh::query::Queryable;
use zenoh::{Session, Wait};

const ZENOH_TRANSPORT_TAG: &str = "ZenohTransport:";
const ZENOH_TRANSPORT_FN_PUBLISH_TAG: &str = "publish():";
const ZENOH_TRANSPORT_FN_REGISTER_TAG: &str = "register_listener():";
const ZENOH_TRANSPORT_FN_UNREGISTER_TAG: &str = "unregister_listener():";

type LatchedSamples = Arc<StdMutex<HashMap<String, Vec<u8>>>>;

/// Maps a ROS2 topic name onto a zenoh key expression.
pub fn topic_to_key_expr(key_prefix: Option<&str>, topic: &str) -> String {
    let topic = topic.trim_matches('/');
    match key_prefix.map(|prefix| prefix.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{topic}"),
        _ => topic.to_string(),
    }
}

pub struct ZenohTransport {
    session: Session,
    key_prefix: Option<String>,
    subscribers: Mutex<HashMap<(String, ComparableListener), Subscriber<()>>>,
    queryables: Mutex<HashMap<String, Queryable<()>>>,
    latched: LatchedSamples,
}

impl ZenohTransport {
    /// Opens a zenoh session from the optional configuration file.
    pub async fn new(config: &ZenohConfig) -> Result<Self, RelayError> {
        let zenoh_config = match &config.config_file {
            Some(path) => zenoh::Config::from_file(path).map_err(|err| {
                RelayError::Config(format!(
                    "Unable to load zenoh config {}: {err}",
                    path.display()
                ))
            })?,
            None => zenoh::Config::default(),
        };

        let session = zenoh::open(zenoh_config)
            .await
            .map_err(|err| RelayError::transport("<session>", err))?;
        debug!("{ZENOH_TRANSPORT_TAG} session opened: {}", session.zid());

        Ok(Self::with_session(session, config.key_prefix.clone()))
    }

    pub fn with_session(session: Session, key_prefix: Option<String>) -> Self {
        Self {
            session,
            key_prefix,
            subscribers: Mutex::new(HashMap::new()),
            queryables: Mutex::new(HashMap::new()),
            latched: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    pub fn key_expr(&self, topic: &str) -> String {
        topic_to_key_expr(self.key_prefix.as_deref(), topic)
    }

    /// Undeclares every subscriber and queryable, then closes the session.
    pub async fn close(&self) -> Result<(), RelayError> {
        self.subscribers.lock().await.clear();
        self.queryables.lock().await.clear();
        self.session
            .close()
            .await
            .map_err(|err| RelayError::transport("<session>", err))
    }

    async fn ensure_latched_queryable(&self, topic: &str, key: &str) -> Result<(), RelayError> {
        let mut queryables = self.queryables.lock().await;
        if queryables.contains_key(key) {
            return Ok(());
        }

        let latched = self.latched.clone();
        let reply_key = key.to_string();
        let queryable = self
            .session
            .declare_queryable(key.to_string())
            .callback(move |query| {
                let payload = latched
                    .lock()
                    .ok()
                    .and_then(|samples| samples.get(&reply_key).cloned());
                let Some(payload) = payload else {
                    return;
                };
                if let Err(err) = query.reply(reply_key.clone(), payload).wait() {
                    warn!("{ZENOH_TRANSPORT_TAG} unable to reply with latched sample on {reply_key}: {err}");
                }
            })
            .await
            .map_err(|err| RelayError::transport(topic, err))?;

        queryables.insert(key.to_string(), queryable);
        Ok(())
    }

    /// Asks the queryables on `key` for their latched sample and feeds the answers
    /// to `sender`, without blocking the caller.
    fn fetch_latched(&self, key: String, sender: UnboundedSender<Vec<u8>>) {
        let session = self.session.clone();
        tokio::spawn(async move {
            let replies = match session.get(key.clone()).await {
                Ok(replies) => replies,
                Err(err) => {
                    debug!("{ZENOH_TRANSPORT_TAG} latched query on {key} failed: {err}");
                    return;
                }
            };
            while let Ok(reply) = replies.recv_async().await {
                if let Ok(sample) = reply.result() {
                    let _ = sender.send(sample.payload().to_bytes().into_owned());
                }
            }
        });
    }
}

#[async_trait]
impl Transport for ZenohTransport {
    async fn publish(
        &self,
        topic: &str,
        durability: Durability,
        payload: Vec<u8>,
    ) -> Result<(), RelayError> {
        let key = self.key_expr(topic);
        trace!(
            "{ZENOH_TRANSPORT_TAG}:{ZENOH_TRANSPORT_FN_PUBLISH_TAG} key: {key}, {} bytes",
            payload.len()
        );

        if durability == Durability::TransientLocal {
            self.latched
                .lock()
                .map_err(|err| RelayError::transport(topic, err))?
                .insert(key.clone(), payload.clone());
            self.ensure_latched_queryable(topic, &key).await?;
        }

        self.session
            .put(key, payload)
            .await
            .map_err(|err| RelayError::transport(topic, err))
    }

    async fn register_listener(
        &self,
        topic: &str,
        listener: Arc<dyn Listener>,
    ) -> Result<(), RelayError> {
        let key = self.key_expr(topic);
        let registration = (topic.to_string(), ComparableListener::new(listener.clone()));

        let mut subscribers = self.subscribers.lock().await;
        if subscribers.contains_key(&registration) {
            return Err(RelayError::AlreadyExists(topic.to_string()));
        }

        // Samples are handed to the listener one at a time, in arrival order.
        let (sender, mut receiver) = unbounded_channel::<Vec<u8>>();
        tokio::spawn(async move {
            while let Some(payload) = receiver.recv().await {
                listener.on_receive(payload).await;
            }
        });

        let sample_sender = sender.clone();
        let subscriber = self
            .session
            .declare_subscriber(key.clone())
            .callback(move |sample| {
                let _ = sample_sender.send(sample.payload().to_bytes().into_owned());
            })
            .await
            .map_err(|err| RelayError::transport(topic, err))?;

        self.fetch_latched(key.clone(), sender);
        subscribers.insert(registration, subscriber);

        debug!("{ZENOH_TRANSPORT_TAG}:{ZENOH_TRANSPORT_FN_REGISTER_TAG} subscribed to {key}");
        Ok(())
    }

    async fn unregister_listener(
        &self,
        topic: &str,
        listener: &Arc<dyn Listener>,
    ) -> Result<(), RelayError> {
        let registration = (topic.to_string(), ComparableListener::new(listener.clone()));
        let Some(subscriber) = self.subscribers.lock().await.remove(&registration) else {
            return Err(RelayError::NotFound(topic.to_string()));
        };

        subscriber
            .undeclare()
            .await
            .map_err(|err| RelayError::transport(topic, err))?;

        debug!(
            "{ZENOH_TRANSPORT_TAG}:{ZENOH_TRANSPORT_FN_UNREGISTER_TAG} unsubscribed from {}",
            self.key_expr(topic)
        );
        Ok(())
    }
}
