// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Argument parsing for the heartbeat binary.
//!
//! The surface is small and forgiving: unrecognized flags are collected
//! and warned about rather than failing the run, so parsing is a plain
//! function over argv instead of a derive-based parser.

use crate::dispatcher;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub mode_key: Option<String>,
    pub list: bool,
    pub help: bool,
    pub unknown: Vec<String>,
}

/// Parse argv (without the program name).
///
/// Precedence is enforced by the caller: help, then list, then mode. The
/// first bare positional becomes the mode candidate; `-m`/`--mode` wins
/// over positionals; everything unrecognized lands in `unknown`.
pub fn parse(args: &[String]) -> CliArgs {
    let mut parsed = CliArgs::default();
    let mut explicit_mode: Option<String> = None;
    let mut positional_mode: Option<String> = None;

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-l" | "--list" => parsed.list = true,
            "-m" | "--mode" => match iter.next() {
                Some(value) => explicit_mode = Some(value.clone()),
                None => parsed.unknown.push(arg.clone()),
            },
            _ => {
                if let Some(value) = arg.strip_prefix("--mode=") {
                    explicit_mode = Some(value.to_string());
                } else if arg.starts_with('-') {
                    parsed.unknown.push(arg.clone());
                } else if positional_mode.is_none() {
                    positional_mode = Some(arg.clone());
                } else {
                    parsed.unknown.push(arg.clone());
                }
            }
        }
    }

    parsed.mode_key = explicit_mode.or(positional_mode);
    parsed
}

pub fn usage() -> String {
    format!(
        "heartbeat - system telemetry visualizer\n\
         \n\
         USAGE:\n\
         \x20   heartbeat [MODE] [OPTIONS]\n\
         \n\
         OPTIONS:\n\
         \x20   -m, --mode <MODE>    select a mode explicitly\n\
         \x20   -l, --list           print the mode catalog and exit\n\
         \x20   -h, --help           print this help and exit\n\
         \n\
         The default mode is `{}`. Run with --list for the full catalog.\n",
        dispatcher::DEFAULT_MODE
    )
}
