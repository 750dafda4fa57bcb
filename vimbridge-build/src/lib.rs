//! Build-time generator for legacy type aliases.
//!
//! This crate scans your source files for `#[derive(SchemaMessage)]` structs carrying
//! `#[bridge(legacy = "...")]` and emits one `pub type <Legacy> = <schema message>;` per
//! alias, plus a compile-time assertion that every `#[derive(SchemaEnum)]` enum is bridged.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     vimbridge_build::generate_bridge()
//!         .scan_path("src/")
//!         .output_file("src/generated/legacy_aliases.rs")
//!         .include_module("crate::v1")
//!         .run()
//!         .expect("Failed to generate legacy aliases");
//!
//!     println!("cargo:rerun-if-changed=src/");
//! }
//! ```
//!
//! Settings can also come from a toml file, see [`GeneratorConfig`].

mod config;
mod generator;
mod scanner;

pub use config::{FilterSettings, GeneratorConfig, GeneratorSettings};
pub use generator::{BridgeGenerator, GenerationReport};
pub use scanner::{EnumInfo, MessageInfo, ScanResult, scan_directory};

/// Create a new alias generator with default settings.
///
/// # Example
///
/// ```ignore
/// vimbridge_build::generate_bridge()
///     .scan_path("src/")
///     .run()
///     .expect("Failed to generate legacy aliases");
/// ```
pub fn generate_bridge() -> BridgeGenerator {
    BridgeGenerator::new()
}
