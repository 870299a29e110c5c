//! Reads one configuration value the way Terraform would.
//!
//! ```text
//! CDB_TOKEN=... CDB_BASE_URL=https://cdb.example.com \
//!     cargo run --example read_config_value -- prod feature_x
//! ```

use serde_json::json;
use terraform_provider_cdb::logging::init_logging;
use terraform_provider_cdb::prelude::*;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    init_logging();

    let mut args = std::env::args().skip(1);
    let (Some(environment), Some(key)) = (args.next(), args.next()) else {
        eprintln!("usage: read_config_value <environment> <key>");
        std::process::exit(2);
    };

    let mut host = ProviderHost::new(CdbProvider::new());
    println!("Data sources: {}", host.data_source_types().join(", "));

    // Token and base URL come from CDB_TOKEN and CDB_BASE_URL.
    let diagnostics = host.configure(json!({})).await;
    for diag in diagnostics.iter() {
        eprintln!("{:?}: {} - {}", diag.severity, diag.summary, diag.detail);
    }
    if diagnostics.has_error() {
        std::process::exit(1);
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let response = host
        .read_data_source(
            &cancel,
            "cdb_config_value",
            json!({ "environment": environment, "key": key }),
        )
        .await;

    for diag in response.diagnostics.iter() {
        eprintln!("{:?}: {} - {}", diag.severity, diag.summary, diag.detail);
    }

    match response.state {
        Some(state) => match serde_json::to_string_pretty(&state) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("failed to render state: {}", e),
        },
        None => std::process::exit(1),
    }
}
