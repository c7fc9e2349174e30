use crate::Entry;
use std::collections::HashSet;

pub const ASSETS_ROOT: &str = "/assets/";
pub const PLACEHOLDER_URL: &str = "/assets/placeholder.jpg";

/// Extensions tried for slug-derived candidates, in attempt order.
pub const ASSET_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Build the ordered candidate URL list for an entry's image.
///
/// Tier order is fixed: the literal image reference when present, then
/// slug-derived variants, then the shared placeholder. The result is
/// de-duplicated preserving first occurrence and is never empty.
pub fn candidates(entry: &Entry) -> Vec<String> {
    let mut list = Vec::new();
    let reference = entry.image.trim();
    if !reference.is_empty() {
        if is_remote_ref(reference) {
            list.push(reference.to_string());
        } else {
            let file = basename(reference);
            if !file.is_empty() {
                list.push(format!("{ASSETS_ROOT}{}", encode_component(file)));
            }
        }
    }
    let slug = entry.slug.trim();
    if !slug.is_empty() {
        for variant in slug_variants(slug) {
            for extension in ASSET_EXTENSIONS {
                list.push(format!(
                    "{ASSETS_ROOT}{}.{extension}",
                    encode_component(&variant)
                ));
            }
        }
    }
    list.push(PLACEHOLDER_URL.to_string());
    dedup_preserve_order(list)
}

/// Rewrite relative `<img src>` references inside a rich-text body to the
/// shared assets root. Remote and already-rooted references are untouched.
pub fn rewrite_body_images(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = find_ci(rest, "<img") {
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        let end = start + len + 1;
        out.push_str(&rest[..start]);
        out.push_str(&rewrite_img_tag(&rest[start..end]));
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

fn is_remote_ref(reference: &str) -> bool {
    let lowered = reference.to_ascii_lowercase();
    lowered.starts_with("http:")
        || lowered.starts_with("https:")
        || lowered.starts_with("data:")
        || lowered.starts_with("blob:")
        || lowered.starts_with("//")
        || lowered.starts_with(ASSETS_ROOT)
}

/// Last path segment of a reference, query string and fragment stripped.
fn basename(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    reference[..end]
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or("")
}

fn slug_variants(slug: &str) -> Vec<String> {
    let mut variants = Vec::new();
    for base in [
        slug.to_string(),
        slug.replace('_', "-"),
        slug.replace('-', "_"),
    ] {
        let lowered = base.to_lowercase();
        variants.push(base);
        variants.push(lowered);
    }
    variants
}

fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn dedup_preserve_order(list: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

fn rewrite_img_tag(tag: &str) -> String {
    let Some((start, end)) = src_value_span(tag) else {
        return tag.to_string();
    };
    let value = tag[start..end].trim();
    if value.is_empty() || is_remote_ref(value) {
        return tag.to_string();
    }
    let file = basename(value);
    if file.is_empty() {
        return tag.to_string();
    }
    format!(
        "{}{ASSETS_ROOT}{}{}",
        &tag[..start],
        encode_component(file),
        &tag[end..]
    )
}

fn src_value_span(tag: &str) -> Option<(usize, usize)> {
    let lowered = tag.to_ascii_lowercase();
    let bytes = tag.as_bytes();
    let mut search = 0usize;
    while let Some(pos) = lowered[search..].find("src") {
        let at = search + pos;
        search = at + 3;
        if !bytes[..at]
            .last()
            .is_some_and(|byte| byte.is_ascii_whitespace())
        {
            continue;
        }
        let mut cursor = at + 3;
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= bytes.len() || bytes[cursor] != b'=' {
            continue;
        }
        cursor += 1;
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= bytes.len() {
            return None;
        }
        return match bytes[cursor] {
            quote @ (b'"' | b'\'') => {
                let value_start = cursor + 1;
                let close = tag[value_start..].find(quote as char)? + value_start;
                Some((value_start, close))
            }
            _ => {
                let mut value_end = cursor;
                while value_end < bytes.len()
                    && !bytes[value_end].is_ascii_whitespace()
                    && bytes[value_end] != b'>'
                {
                    value_end += 1;
                }
                Some((cursor, value_end))
            }
        };
    }
    None
}
