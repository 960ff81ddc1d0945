// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report rendering for `status` and `contend`

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Render a report; JSON is pretty-printed
pub fn render<T: Serialize + Display>(value: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => value.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "json rendering failed, falling back to text");
            value.to_string()
        }),
    }
}

/// Render a report to stdout
pub fn print<T: Serialize + Display>(value: &T, format: OutputFormat) {
    println!("{}", render(value, format));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::status::LockStatus;

    #[test]
    fn text_uses_display() {
        let status = LockStatus {
            key: "jobs".to_string(),
            token: None,
        };
        assert_eq!(render(&status, OutputFormat::Text), "jobs: free");
    }

    #[test]
    fn json_carries_null_token_for_free_key() {
        let status = LockStatus {
            key: "jobs".to_string(),
            token: None,
        };
        let json: serde_json::Value =
            serde_json::from_str(&render(&status, OutputFormat::Json)).unwrap();
        assert_eq!(json["key"], "jobs");
        assert!(json["token"].is_null());
    }

    #[test]
    fn text_names_the_holder() {
        let status = LockStatus {
            key: "jobs".to_string(),
            token: Some("tok-1".to_string()),
        };
        assert_eq!(render(&status, OutputFormat::Text), "jobs: held by tok-1");
    }
}
