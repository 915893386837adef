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

use thiserror::Error;

/// Errors produced while relaying odometry into transforms.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("CDR payload error: {0}")]
    Cdr(String),

    #[error("Transport error on topic {topic}: {reason}")]
    Transport { topic: String, reason: String },

    #[error("Listener already registered on topic {0}")]
    AlreadyExists(String),

    #[error("No listener registered on topic {0}")]
    NotFound(String),

    #[error("Invalid transform {parent} -> {child}: {reason}")]
    InvalidTransform {
        parent: String,
        child: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Relay {0} is already started")]
    AlreadyStarted(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RelayError {
    pub fn transport(topic: &str, reason: impl ToString) -> Self {
        Self::Transport {
            topic: topic.to_string(),
            reason: reason.to_string(),
        }
    }
}
