//! Source file scanner for discovering SchemaMessage and SchemaEnum derives.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use syn::{Attribute, Expr, ExprLit, Item, Lit, Meta, MetaNameValue};
use walkdir::WalkDir;

/// A schema message discovered in the sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInfo {
    /// The struct name (e.g., "WaitOptions")
    pub name: String,
    /// The module path where this message is defined (e.g., "crate::v1")
    pub module_path: String,
    /// Legacy type named by `#[bridge(legacy = "...")]`
    pub legacy_alias: Option<String>,
}

/// A schema enum discovered in the sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    pub name: String,
    pub module_path: String,
    /// File the enum is declared in, relative to the scanned directory
    pub file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub messages: Vec<MessageInfo>,
    pub enums: Vec<EnumInfo>,
}

impl ScanResult {
    fn extend(&mut self, other: ScanResult) {
        self.messages.extend(other.messages);
        self.enums.extend(other.enums);
    }
}

/// Scan a directory recursively for Rust files containing bridge derives.
pub fn scan_directory(path: &Path, crate_name: &str) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().extension().is_some_and(|ext| ext == "rs")
                && !e.path().to_string_lossy().contains("/generated/")
                && !e.path().to_string_lossy().contains("/target/")
        })
    {
        let file_path = entry.path();
        match scan_file(file_path, path, crate_name) {
            Ok(found) => result.extend(found),
            Err(err) => debug!("skipping {}: {err:#}", file_path.display()),
        }
    }

    Ok(result)
}

/// Scan a single Rust file for bridge derives.
fn scan_file(file_path: &Path, base_path: &Path, crate_name: &str) -> Result<ScanResult> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    let syntax = syn::parse_file(&content)
        .with_context(|| format!("Failed to parse {}", file_path.display()))?;

    let module_path = compute_module_path(file_path, base_path, crate_name);
    let relative = file_path.strip_prefix(base_path).unwrap_or(file_path);

    let mut result = ScanResult::default();
    scan_items(&syntax.items, &module_path, relative, &mut result);
    Ok(result)
}

/// Collect derives from a list of items, descending into inline modules.
fn scan_items(items: &[Item], module_path: &str, file: &Path, result: &mut ScanResult) {
    for item in items {
        match item {
            Item::Struct(item_struct) if has_derive(&item_struct.attrs, "SchemaMessage") => {
                result.messages.push(MessageInfo {
                    name: item_struct.ident.to_string(),
                    module_path: module_path.to_string(),
                    legacy_alias: bridge_value(&item_struct.attrs, "legacy"),
                });
            }
            Item::Enum(item_enum) if has_derive(&item_enum.attrs, "SchemaEnum") && !item_enum.variants.is_empty() => {
                result.enums.push(EnumInfo {
                    name: item_enum.ident.to_string(),
                    module_path: module_path.to_string(),
                    file: file.to_path_buf(),
                });
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content
                    && !is_cfg_test(&item_mod.attrs)
                {
                    let nested_path = format!("{module_path}::{}", item_mod.ident);
                    scan_items(nested, &nested_path, file, result);
                }
            }
            _ => {}
        }
    }
}

/// Check if an item has `#[derive(..., <name>, ...)]`, by last path segment.
fn has_derive(attrs: &[Attribute], name: &str) -> bool {
    for attr in attrs {
        if attr.path().is_ident("derive")
            && let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
            )
        {
            for path in nested {
                if path.segments.last().is_some_and(|segment| segment.ident == name) {
                    return true;
                }
            }
        }
    }
    false
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

/// Value of `key = "..."` inside a `#[bridge(...)]` attribute.
fn bridge_value(attrs: &[Attribute], key: &str) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident("bridge")
            && let Ok(nested) = attr.parse_args_with(
                syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
            )
        {
            for meta in nested {
                if let Meta::NameValue(MetaNameValue { path, value, .. }) = meta
                    && path.is_ident(key)
                    && let Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) = value
                {
                    return Some(lit.value());
                }
            }
        }
    }
    None
}

/// Compute the module path from a file path.
/// e.g., "src/v1/faults.rs" -> "crate::v1::faults"
fn compute_module_path(file_path: &Path, base_path: &Path, crate_name: &str) -> String {
    let relative = file_path
        .strip_prefix(base_path)
        .unwrap_or(file_path);

    let without_extension = relative.with_extension("");
    let mut parts: Vec<&str> = without_extension
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    // Remove "mod" or "lib" from the end if present
    if let Some(last) = parts.last()
        && (*last == "mod" || *last == "lib" || *last == "main")
    {
        parts.pop();
    }

    if parts.is_empty() {
        crate_name.to_string()
    } else {
        format!("{}::{}", crate_name, parts.join("::"))
    }
}
