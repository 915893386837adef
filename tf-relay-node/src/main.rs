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

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tf_relay::{RelayConfig, SystemClock, TransformRelay};
use tf_relay_zenoh::ZenohTransport;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tf-relay-node")]
#[command(version, about = "Republish odometry as map -> base_link transforms over zenoh")]
struct Cli {
    /// JSON5 configuration file; built-in defaults are used when omitted.
    #[arg(short, long, env = "TF_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Odometry topic to subscribe to.
    #[arg(long)]
    odom_topic: Option<String>,

    /// Frame written into the transform header.
    #[arg(long)]
    parent_frame: Option<String>,

    /// Frame written into the transform child_frame_id.
    #[arg(long)]
    child_frame: Option<String>,

    /// Forward transforms without checking for NaN or non-unit rotations.
    #[arg(long)]
    no_validate: bool,
}

impl Cli {
    fn relay_config(&self) -> anyhow::Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RelayConfig::default(),
        };

        if let Some(odom_topic) = &self.odom_topic {
            config.odom_topic = odom_topic.clone();
        }
        if let Some(parent_frame) = &self.parent_frame {
            config.parent_frame = parent_frame.clone();
        }
        if let Some(child_frame) = &self.child_frame {
            config.child_frame = child_frame.clone();
        }
        if self.no_validate {
            config.validate = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.relay_config()?;

    let transport = Arc::new(
        ZenohTransport::new(&config.zenoh)
            .await
            .context("opening zenoh session")?,
    );
    let relay = TransformRelay::new(config, transport.clone(), Arc::new(SystemClock))?;
    relay.start().await?;

    signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    info!("Shutting down");

    relay.stop().await?;
    transport.close().await?;
    Ok(())
}
