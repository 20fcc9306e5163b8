//! Argument rewriting for `docker run`, `docker create` and `docker compose`.
//!
//! Secrets reach the container only through `-e KEY=VALUE` flags or a
//! short-lived `--env-file`, never through the docker client's own environment.

pub mod classify;
pub mod flags;
pub mod inject;

pub use inject::{build_compose, build_run, RewrittenCommand, SecretSet};
