// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use heartbeat::{cli, dispatcher, supervisor};
use heartbeat_common::config::CollectorConfig;
use heartbeat_common::log::init_tracing;
use heartbeat_common::{Logger, Meta, TracingLogger};

#[tokio::main]
async fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = cli::parse(&args);
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger);

    for arg in &parsed.unknown {
        logger.log_warning("unknown argument", Some(&Meta::new().kv("arg", arg)));
    }

    if parsed.help {
        print!("{}", cli::usage());
        return;
    }
    if parsed.list {
        print!("{}", dispatcher::render_catalog());
        return;
    }

    let key = parsed
        .mode_key
        .as_deref()
        .unwrap_or(dispatcher::DEFAULT_MODE);
    let Some(mode) = dispatcher::build(key, Arc::clone(&logger)) else {
        logger.log_error("unknown mode", Some(&Meta::new().kv("mode", key)));
        print!("{}", dispatcher::render_catalog());
        std::process::exit(1);
    };

    logger.log_section(mode.label());
    let config = CollectorConfig::from_env();
    match supervisor::run(mode, config, Arc::clone(&logger)).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            logger.log_critical(
                "fatal startup error",
                Some(&Meta::new().kv("error", format!("{err:#}"))),
            );
            std::process::exit(1);
        }
    }
}
