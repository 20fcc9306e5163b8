use crate::docker::SecretSet;

/// Parse dotenv-style vault content into a key/value map.
///
/// Never fails: lines that are not `KEY=VALUE` are skipped with a warning
/// (the warning names the line number, never its contents).
pub fn parse(content: &str) -> SecretSet {
    let mut secrets = SecretSet::new();

    for (idx, line) in content.lines().enumerate() {
        if let Some((key, value)) = parse_line(line) {
            secrets.insert(key, value);
        } else if !is_ignorable(line) {
            tracing::warn!(line = idx + 1, "skipping malformed line in vault content");
        }
    }

    secrets
}

fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_line(line: &str) -> Option<(String, String)> {
    if is_ignorable(line) {
        return None;
    }

    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

    let (key, raw_value) = trimmed.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), unquote(raw_value)))
}

fn unquote(raw: &str) -> String {
    let value = raw.trim_end_matches(['\r', ' ', '\t']);

    if let Some(inner) = strip_quotes(value, '"') {
        return unescape_double_quoted(inner);
    }
    if let Some(inner) = strip_quotes(value, '\'') {
        return inner.to_string();
    }
    value.to_string()
}

fn strip_quotes(value: &str, quote: char) -> Option<&str> {
    if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

fn unescape_double_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
