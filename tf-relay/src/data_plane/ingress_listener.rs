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

//! Ingress listener that turns odometry payloads into queued transforms.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast::Sender;
use tracing::{debug, error, warn};

use crate::cdr;
use crate::conversion::{odometry_to_transform, validate_transform};
use crate::msgs::geometry_msgs::TransformStamped;
use crate::msgs::nav_msgs::Odometry;
use crate::observability::{events, fields};
use crate::transport::Listener;

const COMPONENT: &str = "ingress_listener";

pub(crate) struct OdometryListener {
    topic: String,
    parent_frame: String,
    child_frame: String,
    validate: bool,
    sender: Sender<Arc<TransformStamped>>,
    last_odometry: Arc<ArcSwapOption<Odometry>>,
}

impl OdometryListener {
    pub(crate) fn new(
        topic: &str,
        parent_frame: &str,
        child_frame: &str,
        validate: bool,
        sender: Sender<Arc<TransformStamped>>,
        last_odometry: Arc<ArcSwapOption<Odometry>>,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            parent_frame: parent_frame.to_string(),
            child_frame: child_frame.to_string(),
            validate,
            sender,
            last_odometry,
        }
    }
}

#[async_trait]
impl Listener for OdometryListener {
    async fn on_receive(&self, payload: Vec<u8>) {
        let topic = self.topic.as_str();

        let odometry: Odometry = match cdr::decode(&payload) {
            Ok(odometry) => odometry,
            Err(err) => {
                warn!(
                    event = events::INGRESS_DECODE_FAILED,
                    component = COMPONENT,
                    topic,
                    payload_len = payload.len(),
                    %err,
                    "dropping undecodable odometry"
                );
                return;
            }
        };

        let transform = odometry_to_transform(&odometry, &self.parent_frame, &self.child_frame);
        self.last_odometry.store(Some(Arc::new(odometry)));

        debug!(
            event = events::INGRESS_RECEIVE,
            component = COMPONENT,
            topic,
            frames = %fields::format_frames(&transform),
            stamp = %fields::format_stamp(&transform.header.stamp),
            "received odometry"
        );

        if self.validate {
            if let Err(err) = validate_transform(&transform) {
                warn!(
                    event = events::INGRESS_INVALID_TRANSFORM,
                    component = COMPONENT,
                    topic,
                    %err,
                    "dropping invalid transform"
                );
                return;
            }
        }

        if let Err(err) = self.sender.send(Arc::new(transform)) {
            error!(
                event = events::INGRESS_SEND_TO_QUEUE_FAILED,
                component = COMPONENT,
                topic,
                err = ?err,
                "unable to queue transform for broadcast"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::builtin_interfaces::Time;
    use crate::msgs::geometry_msgs::{Point, Quaternion};
    use crate::msgs::std_msgs::Header;
    use tokio::sync::broadcast;

    fn listener(
        validate: bool,
    ) -> (
        OdometryListener,
        broadcast::Receiver<Arc<TransformStamped>>,
        Arc<ArcSwapOption<Odometry>>,
    ) {
        let (tx, rx) = broadcast::channel(4);
        let last_odometry = Arc::new(ArcSwapOption::empty());
        let listener = OdometryListener::new(
            "/odom",
            "map",
            "base_link",
            validate,
            tx,
            last_odometry.clone(),
        );
        (listener, rx, last_odometry)
    }

    fn odometry_payload(orientation: Quaternion) -> Vec<u8> {
        let mut odometry = Odometry {
            header: Header::new(Time::new(10, 20), "odom"),
            ..Default::default()
        };
        odometry.pose.pose.position = Point::new(1.0, 2.0, 3.0);
        odometry.pose.pose.orientation = orientation;
        cdr::encode(&odometry).unwrap()
    }

    #[tokio::test]
    async fn queues_converted_transform() {
        let (listener, mut rx, last_odometry) = listener(true);

        listener
            .on_receive(odometry_payload(Quaternion::identity()))
            .await;

        let transform = rx.try_recv().unwrap();
        assert_eq!(transform.header.frame_id, "map");
        assert_eq!(transform.child_frame_id, "base_link");
        assert_eq!(transform.header.stamp, Time::new(10, 20));
        assert_eq!(transform.transform.translation.z, 3.0);

        let stored = last_odometry.load_full().expect("last odometry");
        assert_eq!(stored.header.frame_id, "odom");
    }

    #[tokio::test]
    async fn drops_undecodable_payload() {
        let (listener, mut rx, last_odometry) = listener(true);

        listener.on_receive(vec![0, 1, 0, 0, 1]).await;

        assert!(rx.try_recv().is_err());
        assert!(last_odometry.load_full().is_none());
    }

    #[tokio::test]
    async fn drops_invalid_transform_when_validating() {
        let (listener, mut rx, last_odometry) = listener(true);

        listener
            .on_receive(odometry_payload(Quaternion::new(0.0, 0.0, 0.0, 0.0)))
            .await;

        assert!(rx.try_recv().is_err());
        // the message itself was still received
        assert!(last_odometry.load_full().is_some());
    }

    #[tokio::test]
    async fn forwards_invalid_transform_when_not_validating() {
        let (listener, mut rx, _) = listener(false);

        listener
            .on_receive(odometry_payload(Quaternion::new(0.0, 0.0, 0.0, 0.0)))
            .await;

        assert!(rx.try_recv().is_ok());
    }
}
