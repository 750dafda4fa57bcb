/// Identifier text without a raw-identifier prefix.
pub(crate) fn unraw(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

/// `max_wait_seconds` -> `maxWaitSeconds`; leading underscores are kept, trailing ones dropped.
pub(crate) fn lower_camel(ident: &str) -> String {
    let ident = unraw(ident);
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

/// `IndirectRemove` -> `indirectRemove`.
pub(crate) fn lower_first(ident: &str) -> String {
    let ident = unraw(ident);
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Legacy variant suffix of a schema variant: the enum-name prefix is stripped when present.
pub(crate) fn strip_enum_prefix<'a>(enum_name: &str, variant: &'a str) -> &'a str {
    match variant.strip_prefix(enum_name) {
        Some(rest) if rest.starts_with(|ch: char| ch.is_ascii_uppercase()) => rest,
        _ => variant,
    }
}
