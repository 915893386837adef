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

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::broadcaster::{StaticTransformBroadcaster, TransformBroadcaster};
use crate::clock::Clock;
use crate::config::RelayConfig;
use crate::conversion::static_transform;
use crate::data_plane::egress_worker::TransformForwarder;
use crate::data_plane::ingress_listener::OdometryListener;
use crate::msgs::nav_msgs::Odometry;
use crate::observability::{events, fields};
use crate::transport::{Listener, Transport};
use crate::RelayError;

const COMPONENT: &str = "relay";

struct RunningRelay {
    listener: Arc<dyn Listener>,
    forwarder: TransformForwarder,
}

/// Publishes the configured static transforms once, then republishes every odometry
/// message on the odometry topic as a `parent_frame -> child_frame` transform.
pub struct TransformRelay {
    config: RelayConfig,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    broadcaster: Arc<TransformBroadcaster>,
    static_broadcaster: StaticTransformBroadcaster,
    last_odometry: Arc<ArcSwapOption<Odometry>>,
    running: Mutex<Option<RunningRelay>>,
}

impl TransformRelay {
    pub fn new(
        config: RelayConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RelayError> {
        config.validate()?;

        debug!(
            component = COMPONENT,
            node = config.node_name.as_str(),
            "TransformRelay created"
        );

        Ok(Self {
            broadcaster: Arc::new(TransformBroadcaster::new(
                transport.clone(),
                &config.tf_topic,
            )),
            static_broadcaster: StaticTransformBroadcaster::new(
                transport.clone(),
                &config.tf_static_topic,
            ),
            config,
            transport,
            clock,
            last_odometry: Arc::new(ArcSwapOption::empty()),
            running: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The most recent odometry message received since the relay started.
    pub fn last_odometry(&self) -> Option<Arc<Odometry>> {
        self.last_odometry.load_full()
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Stamps every configured static transform with the current clock time and
    /// publishes them on the static tf topic.
    pub async fn publish_static_transforms(&self) -> Result<(), RelayError> {
        if self.config.static_transforms.is_empty() {
            return Ok(());
        }

        let stamp = self.clock.now();
        let transforms: Vec<_> = self
            .config
            .static_transforms
            .iter()
            .map(|static_config| static_transform(stamp, static_config))
            .collect();
        let published: Vec<_> = transforms.iter().map(fields::format_published).collect();
        self.static_broadcaster.send_transforms(transforms).await?;

        for line in &published {
            info!(
                event = events::STATIC_PUBLISHED,
                component = COMPONENT,
                node = self.config.node_name.as_str(),
                "{line}"
            );
        }
        Ok(())
    }

    pub async fn start(&self) -> Result<(), RelayError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(RelayError::AlreadyStarted(self.config.node_name.clone()));
        }

        self.publish_static_transforms().await?;

        let (sender, receiver) = broadcast::channel(self.config.queue_depth);
        let forwarder =
            TransformForwarder::new(&self.config.node_name, self.broadcaster.clone(), receiver)?;

        let listener: Arc<dyn Listener> = Arc::new(OdometryListener::new(
            &self.config.odom_topic,
            &self.config.parent_frame,
            &self.config.child_frame,
            self.config.validate,
            sender,
            self.last_odometry.clone(),
        ));

        // On failure the listener, and with it the queue sender, is dropped here,
        // which lets the worker thread exit on its own.
        self.transport
            .register_listener(&self.config.odom_topic, listener.clone())
            .await?;

        info!(
            event = events::RELAY_START,
            component = COMPONENT,
            node = self.config.node_name.as_str(),
            worker_id = forwarder.id(),
            odom_topic = self.config.odom_topic.as_str(),
            tf_topic = self.config.tf_topic.as_str(),
            "relaying odometry as '{}' -> '{}'",
            self.config.parent_frame,
            self.config.child_frame
        );

        *running = Some(RunningRelay {
            listener,
            forwarder,
        });
        Ok(())
    }

    /// Unregisters the odometry listener and waits for the egress worker to drain.
    ///
    /// Stopping a relay that is not running is a no-op.
    pub async fn stop(&self) -> Result<(), RelayError> {
        let mut running = self.running.lock().await;
        let Some(listener) = running.as_ref().map(|relay| relay.listener.clone()) else {
            return Ok(());
        };

        if let Err(err) = self
            .transport
            .unregister_listener(&self.config.odom_topic, &listener)
            .await
        {
            warn!(
                component = COMPONENT,
                node = self.config.node_name.as_str(),
                %err,
                "unable to unregister odometry listener, relay keeps running"
            );
            return Err(err);
        }
        drop(listener);

        if let Some(RunningRelay {
            listener,
            forwarder,
        }) = running.take()
        {
            drop(listener);
            // Joining is only safe once the transport no longer holds the sender.
            tokio::task::spawn_blocking(move || forwarder.join())
                .await
                .map_err(|err| RelayError::transport(&self.config.odom_topic, err))?;
        }

        info!(
            event = events::RELAY_STOP,
            component = COMPONENT,
            node = self.config.node_name.as_str(),
            "relay stopped"
        );
        Ok(())
    }
}
