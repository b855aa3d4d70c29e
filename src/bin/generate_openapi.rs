//! Generates `openapi.json` from the compiled OpenAPI spec.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{
    env, fs,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use neolight_service::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let json = match ApiDoc::openapi().to_pretty_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialise OpenAPI spec: {e}");
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = env::args().collect();
    let output_path: Option<PathBuf> = args
        .windows(2)
        .find(|w| w[0] == "--output")
        .map(|w| PathBuf::from(&w[1]));

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Error writing to {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            eprintln!("OpenAPI spec written to {}", path.display());
        }
        None => {
            if let Err(e) = io::stdout().write_all(json.as_bytes()) {
                eprintln!("Failed to write to stdout: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
