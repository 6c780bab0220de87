//! `hermes validate`: check a configuration file for errors.
//!
//! Parses and validates the config file, reporting results in either
//! human-readable text or machine-readable JSON format.

use std::net::{IpAddr, SocketAddr};

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::sources::parse_config_str;
use crate::config::validation;
use crate::error::HermesError;

pub fn execute(args: &ValidateArgs) -> Result<(), HermesError> {
    let path = &args.config;

    if !path.exists() {
        return Err(HermesError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(HermesError::ConfigValidation { errors });
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
        }
        ValidateFormat::Json => {
            println!("{}", valid_report_json(&config));
        }
    }

    Ok(())
}

fn socket(host: &str, port: u16) -> String {
    host.parse::<IpAddr>().map_or_else(
        |_| format!("{host}:{port}"),
        |ip| SocketAddr::new(ip, port).to_string(),
    )
}

/// JSON summary of a config that passed validation.
fn valid_report_json(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "valid": true,
        "listen": socket(&config.listen.host, config.listen.port),
        "control": socket(&config.control.host, config.control.port),
        "forward": {
            "timeout_ms": config.forward.timeout,
            "max_body_bytes": config.forward.max_body,
        },
        "config": config,
    })
}
