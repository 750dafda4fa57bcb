//! Code generator for legacy type aliases and enum bridge assertions.

use crate::config::{FilterSettings, GeneratorConfig};
use crate::scanner::{EnumInfo, MessageInfo, ScanResult, scan_directory};
use anyhow::{Context, Result};
use log::warn;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Outcome of a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_file: PathBuf,
    /// Number of `pub type` aliases emitted
    pub aliases: usize,
    /// Number of enums covered by the bridge assertion
    pub enums: usize,
    /// Whether the output file was (re)written
    pub written: bool,
}

/// Builder for configuring and running the alias generator.
pub struct BridgeGenerator {
    scan_paths: Vec<PathBuf>,
    output_file: PathBuf,
    crate_name: String,
    filters: FilterSettings,
}

impl BridgeGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            scan_paths: Vec::new(),
            output_file: PathBuf::from("src/generated/legacy_aliases.rs"),
            crate_name: "crate".to_string(),
            filters: FilterSettings::default(),
        }
    }

    /// Create a generator from a loaded configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new().config(config)
    }

    /// Apply every setting of `config`, replacing the current ones.
    pub fn config(mut self, config: &GeneratorConfig) -> Self {
        self.scan_paths = config.generator.scan_paths.iter().map(PathBuf::from).collect();
        self.output_file = PathBuf::from(&config.generator.output_file);
        self.crate_name = config.generator.crate_name.clone();
        self.filters = config.filters.clone();
        self
    }

    /// Add a path to scan for schema definitions.
    ///
    /// Can be called multiple times to scan multiple directories.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    /// Set the output file path for the generated code.
    ///
    /// Default: `src/generated/legacy_aliases.rs`
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Set the crate name used in generated paths.
    ///
    /// Default: `crate`
    pub fn crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = name.into();
        self
    }

    /// Only emit enum assertions for enums declared in this file (relative to a scan path).
    pub fn include_enum_file(mut self, file: impl Into<String>) -> Self {
        self.filters.include_enum_files.push(file.into());
        self
    }

    /// Only emit aliases for messages in this module or its submodules.
    pub fn include_module(mut self, module_path: impl Into<String>) -> Self {
        self.filters.include_modules.push(module_path.into());
        self
    }

    /// Scan the configured paths and render the generated module without writing it.
    pub fn generate(&self) -> Result<(String, usize, usize)> {
        let scanned = self.scan()?;
        let messages = select_messages(&scanned.messages, &self.filters);
        let enums = select_enums(&scanned.enums, &self.filters);
        let code = generate_alias_code(&messages, &enums)?;
        Ok((code, messages.len(), enums.len()))
    }

    /// Run the generator.
    ///
    /// This scans all configured paths, discovers schema messages and enums, and writes
    /// the generated module to the output file when its content changed.
    pub fn run(self) -> Result<GenerationReport> {
        let (code, aliases, enums) = self.generate()?;

        // Ensure output directory exists
        if let Some(parent) = self.output_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        // Only write if content has changed (avoids unnecessary recompilation)
        let should_write = match fs::read_to_string(&self.output_file) {
            Ok(existing) => existing != code,
            Err(_) => true,
        };

        if should_write {
            fs::write(&self.output_file, &code)
                .with_context(|| format!("Failed to write {}", self.output_file.display()))?;
            eprintln!(
                "vimbridge-build: Generated {} with {} aliases and {} enums",
                self.output_file.display(),
                aliases,
                enums
            );
        }

        Ok(GenerationReport {
            output_file: self.output_file,
            aliases,
            enums,
            written: should_write,
        })
    }

    fn scan(&self) -> Result<ScanResult> {
        // Default to scanning "src/" if no paths specified
        let scan_paths = if self.scan_paths.is_empty() {
            vec![PathBuf::from("src/")]
        } else {
            self.scan_paths.clone()
        };

        let mut result = ScanResult::default();
        for path in &scan_paths {
            let found =
                scan_directory(path, &self.crate_name).with_context(|| format!("Failed to scan {}", path.display()))?;
            result.messages.extend(found.messages);
            result.enums.extend(found.enums);
        }
        Ok(result)
    }
}

impl Default for BridgeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aliased messages in included modules, one per alias, sorted by alias.
fn select_messages(messages: &[MessageInfo], filters: &FilterSettings) -> Vec<MessageInfo> {
    let mut by_alias: BTreeMap<String, MessageInfo> = BTreeMap::new();
    for message in messages {
        let Some(alias) = &message.legacy_alias else {
            continue;
        };
        if !filters.includes_module(&message.module_path) {
            continue;
        }
        if syn::parse_str::<syn::Ident>(alias).is_err() {
            warn!("{}::{} has legacy alias `{alias}` which is not a valid identifier", message.module_path, message.name);
            continue;
        }
        match by_alias.get(alias) {
            Some(existing) => warn!(
                "legacy alias `{alias}` claimed by both {}::{} and {}::{}; keeping the first",
                existing.module_path, existing.name, message.module_path, message.name
            ),
            None => {
                by_alias.insert(alias.clone(), message.clone());
            }
        }
    }
    by_alias.into_values().collect()
}

/// Enums in included files, deduplicated and sorted by path.
fn select_enums(enums: &[EnumInfo], filters: &FilterSettings) -> Vec<EnumInfo> {
    let mut selected: Vec<EnumInfo> = enums
        .iter()
        .filter(|info| filters.includes_enum_file(&info.file))
        .cloned()
        .collect();
    selected.sort_by(|a, b| (&a.module_path, &a.name).cmp(&(&b.module_path, &b.name)));
    selected.dedup_by(|a, b| a.module_path == b.module_path && a.name == b.name);
    selected
}

/// Generate the alias module.
fn generate_alias_code(messages: &[MessageInfo], enums: &[EnumInfo]) -> Result<String> {
    let mut aliases: Vec<TokenStream> = Vec::with_capacity(messages.len());
    let mut message_rows: Vec<TokenStream> = Vec::with_capacity(messages.len());
    for message in messages {
        let Some(alias) = &message.legacy_alias else {
            continue;
        };
        let full_path = format!("{}::{}", message.module_path, message.name);
        let path: syn::Path =
            syn::parse_str(&full_path).with_context(|| format!("Invalid message path {full_path}"))?;
        let alias_ident = format_ident!("{}", alias);
        aliases.push(quote! {
            pub type #alias_ident = #path;
        });
        message_rows.push(quote! { (#alias, #full_path) });
    }

    let mut enum_paths: Vec<syn::Path> = Vec::with_capacity(enums.len());
    let mut enum_names: Vec<String> = Vec::with_capacity(enums.len());
    for info in enums {
        let full_path = format!("{}::{}", info.module_path, info.name);
        enum_paths.push(syn::parse_str(&full_path).with_context(|| format!("Invalid enum path {full_path}"))?);
        enum_names.push(full_path);
    }

    let output = quote! {
        //! Auto-generated legacy aliases. Do not edit manually.
        //!
        //! Regenerate with: `cargo build`
        //!
        //! Generated by vimbridge-build.

        #(#aliases)*

        /// `(legacy alias, schema message path)` for every aliased message.
        pub const BRIDGED_MESSAGES: &[(&str, &str)] = &[#(#message_rows),*];

        /// Schema enums covered by the bridge assertion below.
        pub const BRIDGED_ENUMS: &[&str] = &[#(#enum_names),*];

        #[allow(dead_code)]
        const _: () = {
            fn assert_bridged<E: ::vimbridge::SchemaEnum>() {}

            fn assert_all() {
                #(assert_bridged::<#enum_paths>();)*
            }
        };
    };

    // Format with prettyplease for readable output
    let syntax_tree = syn::parse2(output).context("Failed to parse generated code")?;
    Ok(prettyplease::unparse(&syntax_tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn message(name: &str, module_path: &str, alias: Option<&str>) -> MessageInfo {
        MessageInfo {
            name: name.into(),
            module_path: module_path.into(),
            legacy_alias: alias.map(Into::into),
        }
    }

    #[test]
    fn test_select_messages_filters_and_dedupes() {
        let messages = vec![
            message("WaitOptions", "crate::v1", Some("WaitOptions")),
            message("WaitOptions", "crate::v2", Some("WaitOptions")),
            message("Unaliased", "crate::v1", None),
            message("Elsewhere", "crate::other", Some("Elsewhere")),
        ];
        let filters = FilterSettings {
            include_modules: vec!["crate::v1".into(), "crate::v2".into()],
            ..Default::default()
        };

        let selected = select_messages(&messages, &filters);
        assert_eq!(selected, vec![message("WaitOptions", "crate::v1", Some("WaitOptions"))]);
    }

    #[test]
    fn test_select_enums_by_file() {
        let enums = vec![
            EnumInfo {
                name: "PropertyChangeOp".into(),
                module_path: "crate::v1::enums".into(),
                file: PathBuf::from("v1/enums.rs"),
            },
            EnumInfo {
                name: "Internal".into(),
                module_path: "crate::v1::internal".into(),
                file: PathBuf::from("v1/internal.rs"),
            },
        ];
        let filters = FilterSettings {
            include_enum_files: vec!["v1/enums.rs".into()],
            ..Default::default()
        };

        let selected = select_enums(&enums, &filters);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].file, Path::new("v1/enums.rs"));
    }

    #[test]
    fn test_generated_code_contains_aliases_and_assertions() {
        let messages = vec![message("Id", "crate::v1", Some("ID"))];
        let enums = vec![EnumInfo {
            name: "PropertyChangeOp".into(),
            module_path: "crate::v1".into(),
            file: PathBuf::from("v1.rs"),
        }];

        let code = generate_alias_code(&messages, &enums).unwrap();
        assert!(code.contains("pub type ID = crate::v1::Id;"));
        assert!(code.contains("(\"ID\", \"crate::v1::Id\")"));
        assert!(code.contains("assert_bridged::<crate::v1::PropertyChangeOp>();"));
        assert!(code.contains("\"crate::v1::PropertyChangeOp\""));
    }

    #[test]
    fn test_generated_code_for_empty_input_is_valid() {
        let code = generate_alias_code(&[], &[]).unwrap();
        assert!(code.contains("pub const BRIDGED_MESSAGES: &[(&str, &str)] = &[];"));
    }
}
