//! Naming conventions between schema field identifiers and legacy wire names.

/// Maps a schema field identifier to the legacy field name it is expected to match.
///
/// Per-field `#[bridge(name = "...")]` overrides always win over the strategy.
pub trait NamingStrategy: Send + Sync {
    fn legacy_field_name(&self, schema_field: &str) -> String;
}

/// Default convention: `max_wait_seconds` matches `maxWaitSeconds`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowerCamelCase;

impl NamingStrategy for LowerCamelCase {
    fn legacy_field_name(&self, schema_field: &str) -> String {
        to_lower_camel(schema_field)
    }
}

/// Converts a snake_case identifier to lowerCamelCase.
///
/// Leading underscores are kept, a raw-identifier prefix and trailing underscores
/// (`type_`) are dropped.
pub fn to_lower_camel(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let body = ident.trim_start_matches('_');
    let leading = ident.len() - body.len();
    let body = body.trim_end_matches('_');

    let mut out = String::with_capacity(ident.len());
    out.push_str(&ident[..leading]);
    let mut upper_next = false;
    for ch in body.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_becomes_lower_camel() {
        assert_eq!(to_lower_camel("max_wait_seconds"), "maxWaitSeconds");
        assert_eq!(to_lower_camel("last_modified_time"), "lastModifiedTime");
        assert_eq!(to_lower_camel("vswitch"), "vswitch");
    }

    #[test]
    fn keyword_escapes_are_dropped() {
        assert_eq!(to_lower_camel("type_"), "type");
        assert_eq!(to_lower_camel("r#type"), "type");
    }

    #[test]
    fn leading_underscores_are_kept() {
        assert_eq!(to_lower_camel("_this"), "_this");
    }

    #[test]
    fn default_strategy_uses_lower_camel() {
        assert_eq!(LowerCamelCase.legacy_field_name("snapshot_id"), "snapshotId");
    }
}
