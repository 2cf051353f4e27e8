//! One-shot VaR adapter.
//!
//! Reads one request document from stdin, writes one JSON document to stdout
//! and exits with the code of the outcome:
//!
//! | Outcome            | Exit |
//! |--------------------|------|
//! | success            | 0    |
//! | adapter failure    | 1    |
//! | request shape      | 2    |
//! | transaction type   | 3    |
//! | processing         | 4    |
//!
//! When `GATEWAY_INTERFACE` is set (running under a CGI server) `Status` and
//! `Content-Type` headers precede the body. Logs go to stderr.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::Context;

use var_engine::codec::RiskResponse;
use var_engine::config;
use var_engine::engine::VarEngine;
use var_engine::telemetry::{self, LogTarget};

const ADAPTER_FAILURE: u8 = 1;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "VaR adapter failed");
            eprintln!("var-engine-cgi: {e:#}");
            ExitCode::from(ADAPTER_FAILURE)
        }
    }
}

fn run() -> anyhow::Result<u8> {
    let _ = dotenvy::dotenv();

    let config = config::load_from_env().context("failed to load configuration")?;
    telemetry::init_tracing(&config.observability.logging, LogTarget::Stderr)?;

    let engine = VarEngine::new(config.engine)?;

    let mut payload = Vec::new();
    io::stdin()
        .read_to_end(&mut payload)
        .context("failed to read request from stdin")?;

    let response = engine.handle(&payload);
    write_response(&mut io::stdout().lock(), &response)?;

    Ok(u8::try_from(response.exit_code()).unwrap_or(ADAPTER_FAILURE))
}

fn write_response(out: &mut impl Write, response: &RiskResponse) -> anyhow::Result<()> {
    if std::env::var_os("GATEWAY_INTERFACE").is_some() {
        write!(out, "Status: {}\r\n", response.http_status())?;
        write!(out, "Content-Type: application/json\r\n\r\n")?;
    }

    serde_json::to_writer(&mut *out, response).context("failed to encode response")?;
    writeln!(out)?;
    out.flush().context("failed to write response to stdout")?;
    Ok(())
}
