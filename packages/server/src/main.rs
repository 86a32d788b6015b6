#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone webhook server binary.
//!
//! Set `DISPATCH_MAP_DEBUG=true` to log every received payload.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let debug = dispatch_map_config::debug_from_env(|key| std::env::var(key).ok())
        .map_err(std::io::Error::other)?;

    dispatch_map_server::run_server(debug).await
}
