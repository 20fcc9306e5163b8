use std::io::{BufRead, IsTerminal, Write};

use crate::error::KeywayError;

// Status lines go to stderr; stdout belongs to the wrapped process.

pub fn step(msg: &str) {
    eprintln!("• {}", msg);
}

pub fn success(msg: &str) {
    eprintln!("✓ {}", msg);
}

pub fn warn(msg: &str) {
    eprintln!("! {}", msg);
}

pub fn error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// True when we can both show a prompt and read an answer.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Prompt on stderr and read the choice from stdin.
pub fn select_stdin(label: &str, options: &[String]) -> Result<String, KeywayError> {
    select(label, options, std::io::stdin().lock(), std::io::stderr())
}

/// Show a numbered menu and read one answer line.
/// Empty input picks the first option; otherwise a 1-based number or an exact name.
pub fn select<R: BufRead, W: Write>(
    label: &str,
    options: &[String],
    mut input: R,
    mut output: W,
) -> Result<String, KeywayError> {
    let first = options
        .first()
        .ok_or_else(|| KeywayError::InvalidSelection("no options available".into()))?;

    writeln!(output, "{}", label)?;
    for (idx, option) in options.iter().enumerate() {
        writeln!(output, "  {}) {}", idx + 1, option)?;
    }
    write!(output, "Select [1]: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();

    if answer.is_empty() {
        return Ok(first.clone());
    }
    if let Ok(n) = answer.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| options.get(i))
            .cloned()
            .ok_or_else(|| KeywayError::InvalidSelection(answer.to_string()));
    }
    options
        .iter()
        .find(|o| o.as_str() == answer)
        .cloned()
        .ok_or_else(|| KeywayError::InvalidSelection(answer.to_string()))
}
