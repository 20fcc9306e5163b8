use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeywayError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Not in a git repository with a GitHub remote.")]
    NotARepository,

    #[error("Not logged in. Set KEYWAY_TOKEN or run keyway from an interactive terminal.")]
    NotLoggedIn,

    #[error("Keyway API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to create temp env file: {0}")]
    EnvFile(#[source] std::io::Error),

    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' exited with {}", .program, exit_description(*.code))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("Invalid selection: {0:?}")]
    InvalidSelection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
