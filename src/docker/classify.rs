use std::collections::HashMap;

use super::flags;

/// Find the index of the image token in `docker run [OPTIONS] IMAGE [COMMAND] [ARG...]`.
/// Returns `None` when every token is a flag or a flag's value.
///
/// Flags are matched by exact spelling only. Grouped short flags whose last
/// letter takes a value (`-dp 8080:80`) count as boolean, so the value after
/// them is reported as the image.
pub fn locate_image<S: AsRef<str>>(args: &[S]) -> Option<usize> {
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();

        if !arg.starts_with('-') {
            return Some(i);
        }

        if is_grouped_value_flag(arg) {
            tracing::debug!(flag = arg, "grouped short flags end in a value flag; treating as boolean");
        }

        if arg.contains('=') || !flags::consumes_value(arg) {
            i += 1;
        } else {
            i += 2;
        }
    }
    None
}

// `-dp`: several short flags in one token, the last of which takes a value.
fn is_grouped_value_flag(arg: &str) -> bool {
    let Some(letters) = arg.strip_prefix('-') else {
        return false;
    };
    if letters.len() < 2 || letters.starts_with('-') || letters.contains('=') {
        return false;
    }
    letters
        .chars()
        .last()
        .is_some_and(|last| flags::consumes_value(&format!("-{}", last)))
}

/// Collect every `KEY[=VALUE]` the caller set with `-e`/`--env`, in both the
/// `-e KEY=VALUE` and `-e=KEY=VALUE` forms. A bare `KEY` maps to an empty value.
/// Later occurrences of the same key overwrite earlier ones.
pub fn extract_overrides<S: AsRef<str>>(args: &[S]) -> HashMap<String, String> {
    let mut overrides = HashMap::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_ref();
        i += 1;

        let assignment = match arg {
            "-e" | "--env" => match args.get(i) {
                Some(next) => {
                    i += 1;
                    next.as_ref()
                }
                None => continue,
            },
            _ => match arg
                .strip_prefix("-e=")
                .or_else(|| arg.strip_prefix("--env="))
            {
                Some(inline) => inline,
                None => continue,
            },
        };

        if assignment.is_empty() {
            continue;
        }

        let (key, value) = assignment.split_once('=').unwrap_or((assignment, ""));
        overrides.insert(key.to_string(), value.to_string());
    }

    overrides
}
