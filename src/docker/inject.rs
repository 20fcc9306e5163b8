use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use tempfile::TempPath;

use super::classify::{extract_overrides, locate_image};
use crate::error::KeywayError;

pub type SecretSet = HashMap<String, String>;

/// Final argument vector for the wrapped binary, plus the env file it reads
/// from (if any). The env file is deleted when this value is dropped, so it
/// must outlive the process invocation.
#[derive(Debug)]
pub struct RewrittenCommand {
    pub args: Vec<String>,
    pub env_file: Option<TempPath>,
}

impl RewrittenCommand {
    /// A command that needs no env file.
    pub fn from_args(args: Vec<String>) -> Self {
        Self {
            args,
            env_file: None,
        }
    }
}

/// Build `<subcommand> [OPTIONS] -e K=V... IMAGE [COMMAND] [ARG...]`.
///
/// Secrets the caller already set with their own `-e`/`--env` are skipped.
/// Without an image token the flags go first, right after the subcommand.
pub fn build_run(subcommand: &str, args: &[String], secrets: &SecretSet) -> Vec<String> {
    let overrides = extract_overrides(args);
    let injected = env_flags(
        secrets
            .iter()
            .filter(|(key, _)| !overrides.contains_key(*key)),
    );

    let split = match locate_image(args) {
        Some(pos) => pos,
        None => {
            tracing::debug!("no image token found; placing injected flags before all arguments");
            0
        }
    };

    tracing::debug!(
        injected = injected.len() / 2,
        overridden = secrets.len() - injected.len() / 2,
        "built run arguments"
    );

    let mut out = Vec::with_capacity(1 + args.len() + injected.len());
    out.push(subcommand.to_string());
    out.extend_from_slice(&args[..split]);
    out.extend(injected);
    out.extend_from_slice(&args[split..]);
    out
}

/// Build the argument vector for `docker compose <args>`.
///
/// `compose run` gets `-e K=V` flags right after `run`. Every other compose
/// subcommand gets `--env-file <tmp>` (created in `env_dir`) when there is at
/// least one secret. Caller-supplied `-e` flags are not consulted here.
pub fn build_compose(
    args: &[String],
    secrets: &SecretSet,
    env_dir: &Path,
) -> Result<RewrittenCommand, KeywayError> {
    if args.first().map(String::as_str) == Some("run") {
        let rest = &args[1..];
        warn_on_shadowed_keys(rest, secrets);

        let mut out = vec!["compose".to_string(), "run".to_string()];
        out.extend(env_flags(secrets.iter()));
        out.extend_from_slice(rest);
        return Ok(RewrittenCommand::from_args(out));
    }

    let mut out = vec!["compose".to_string()];
    if secrets.is_empty() {
        out.extend_from_slice(args);
        return Ok(RewrittenCommand::from_args(out));
    }

    let env_file = write_env_file(env_dir, secrets)?;
    out.push("--env-file".to_string());
    out.push(env_file.to_string_lossy().into_owned());
    out.extend_from_slice(args);

    Ok(RewrittenCommand {
        args: out,
        env_file: Some(env_file),
    })
}

/// Write `KEY=VALUE` lines to a fresh temp file in `dir` and hand back its
/// path guard. No quoting or escaping is applied, so a value containing a line
/// break is rejected before anything is written.
pub fn write_env_file(dir: &Path, secrets: &SecretSet) -> Result<TempPath, KeywayError> {
    if let Some(key) = secrets
        .iter()
        .find(|(_, value)| value.contains(['\n', '\r']))
        .map(|(key, _)| key)
    {
        return Err(KeywayError::EnvFile(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("value of '{}' spans multiple lines", key),
        )));
    }

    let mut file = tempfile::Builder::new()
        .prefix("keyway-env-")
        .suffix(".env")
        .tempfile_in(dir)
        .map_err(KeywayError::EnvFile)?;

    for (key, value) in secrets {
        writeln!(file, "{}={}", key, value).map_err(KeywayError::EnvFile)?;
    }
    file.as_file().sync_all().map_err(KeywayError::EnvFile)?;

    tracing::debug!(path = %file.path().display(), count = secrets.len(), "wrote env file");
    Ok(file.into_temp_path())
}

fn env_flags<'a, I>(pairs: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    pairs
        .into_iter()
        .flat_map(|(key, value)| ["-e".to_string(), format!("{}={}", key, value)])
        .collect()
}

// Compose mode injects every secret even if the caller passed the same key.
fn warn_on_shadowed_keys(args: &[String], secrets: &SecretSet) {
    let overrides = extract_overrides(args);
    let mut shadowed: Vec<&str> = overrides
        .keys()
        .filter(|key| secrets.contains_key(*key))
        .map(String::as_str)
        .collect();
    if shadowed.is_empty() {
        return;
    }
    shadowed.sort_unstable();
    tracing::warn!(
        keys = ?shadowed,
        "compose run: caller -e flags and vault secrets both set these keys; both are passed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp() -> std::path::PathBuf {
        std::env::temp_dir()
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn secrets(pairs: &[(&str, &str)]) -> SecretSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn count_flag(args: &[String], value: &str) -> usize {
        args.windows(2)
            .filter(|w| w[0] == "-e" && w[1] == value)
            .count()
    }

    fn position(args: &[String], value: &str) -> usize {
        args.iter()
            .position(|a| a == value)
            .unwrap_or_else(|| panic!("{:?} not found in {:?}", value, args))
    }

    #[test]
    fn test_run_injects_before_image() {
        let args = strings(&["-d", "--name", "test", "myimage", "cmd", "arg"]);
        let out = build_run("run", &args, &secrets(&[("SECRET", "value")]));

        assert_eq!(out[0], "run");
        assert_eq!(count_flag(&out, "SECRET=value"), 1);
        assert!(position(&out, "SECRET=value") < position(&out, "myimage"));
        assert!(position(&out, "test") < position(&out, "SECRET=value"));
        assert_eq!(&out[out.len() - 3..], &strings(&["myimage", "cmd", "arg"])[..]);
    }

    #[test]
    fn test_run_user_override_wins() {
        let args = strings(&["-e", "API_KEY=user", "alpine"]);
        let out = build_run("run", &args, &secrets(&[("API_KEY", "v"), ("OTHER", "o")]));

        assert_eq!(count_flag(&out, "API_KEY=user"), 1);
        assert_eq!(count_flag(&out, "OTHER=o"), 1);
        assert_eq!(count_flag(&out, "API_KEY=v"), 0);
        assert_eq!(out.last().map(String::as_str), Some("alpine"));
    }

    #[test]
    fn test_run_inherit_override_still_suppresses_secret() {
        let args = strings(&["--env", "API_KEY", "alpine"]);
        let out = build_run("run", &args, &secrets(&[("API_KEY", "v")]));
        assert_eq!(out, strings(&["run", "--env", "API_KEY", "alpine"]));
    }

    #[test]
    fn test_run_without_image_prepends_flags() {
        let args = strings(&["-d", "--rm"]);
        let out = build_run("run", &args, &secrets(&[("A", "1")]));
        assert_eq!(out, strings(&["run", "-e", "A=1", "-d", "--rm"]));
    }

    #[test]
    fn test_run_empty_secrets_is_passthrough() {
        let args = strings(&["alpine", "echo", "hello"]);
        let out = build_run("run", &args, &SecretSet::new());
        assert_eq!(out, strings(&["run", "alpine", "echo", "hello"]));
    }

    #[test]
    fn test_run_is_stable_across_rebuilds() {
        let args = strings(&["-p", "80:80", "nginx", "-g", "daemon off;"]);
        let s = secrets(&[("A", "1"), ("B", "2"), ("C", "3")]);

        let mut first = build_run("run", &args, &s);
        let mut second = build_run("run", &args, &s);
        assert_eq!(first.len(), second.len());
        assert_eq!(position(&first, "nginx"), position(&second, "nginx"));
        first.sort();
        second.sort();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_run_injects_after_run() {
        let args = strings(&["run", "--rm", "web", "sh"]);
        let out = build_compose(&args, &secrets(&[("A", "1")]), &tmp()).unwrap();

        assert!(out.env_file.is_none());
        assert_eq!(out.args, strings(&["compose", "run", "-e", "A=1", "--rm", "web", "sh"]));
    }

    #[test]
    fn test_compose_run_does_not_filter_caller_env() {
        let args = strings(&["run", "-e", "A=mine", "web"]);
        let out = build_compose(&args, &secrets(&[("A", "vault")]), &tmp()).unwrap();

        assert_eq!(count_flag(&out.args, "A=vault"), 1);
        assert_eq!(count_flag(&out.args, "A=mine"), 1);
    }

    #[test]
    fn test_compose_up_uses_env_file() {
        let args = strings(&["up", "-d"]);
        let out = build_compose(&args, &secrets(&[("A", "1")]), &tmp()).unwrap();

        let path = out.env_file.as_ref().expect("env file");
        assert_eq!(out.args[0], "compose");
        assert_eq!(out.args[1], "--env-file");
        assert_eq!(out.args[2], path.to_string_lossy());
        assert_eq!(&out.args[3..], &args[..]);

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.lines().any(|l| l == "A=1"));
    }

    #[test]
    fn test_compose_env_file_removed_on_drop() {
        let out = build_compose(&strings(&["up"]), &secrets(&[("A", "1")]), &tmp()).unwrap();
        let path = out.env_file.as_ref().unwrap().to_path_buf();
        assert!(path.exists());

        drop(out);
        assert!(!path.exists());
    }

    #[test]
    fn test_compose_up_without_secrets_is_passthrough() {
        let args = strings(&["up", "-d"]);
        let out = build_compose(&args, &SecretSet::new(), &tmp()).unwrap();

        assert!(out.env_file.is_none());
        assert_eq!(out.args, strings(&["compose", "up", "-d"]));
    }

    #[test]
    fn test_compose_with_no_args_and_secrets() {
        let out = build_compose(&[], &secrets(&[("A", "1")]), &tmp()).unwrap();
        assert_eq!(out.args.len(), 3);
        assert!(out.env_file.is_some());
    }

    #[test]
    fn test_env_file_lines_are_unescaped() {
        let s = secrets(&[("URL", "http://x.com?a=b"), ("SPACED", "a b \"c\"")]);
        let path = write_env_file(&tmp(), &s).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.ends_with('\n'));
        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["SPACED=a b \"c\"", "URL=http://x.com?a=b"]);
    }

    #[test]
    fn test_env_file_rejects_multiline_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let s = secrets(&[("OK", "1"), ("CERT", "a\nB=evil")]);

        let err = write_env_file(dir.path(), &s).unwrap_err();
        match err {
            KeywayError::EnvFile(io_err) => {
                assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
                let msg = io_err.to_string();
                assert!(msg.contains("CERT"), "{}", msg);
                assert!(!msg.contains("evil"), "{}", msg);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_env_file_rejects_carriage_return() {
        let s = secrets(&[("A", "1\r")]);
        assert!(matches!(
            write_env_file(&tmp(), &s),
            Err(KeywayError::EnvFile(_))
        ));
    }

    #[test]
    fn test_compose_up_missing_env_dir_is_env_file_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = build_compose(&strings(&["up"]), &secrets(&[("A", "1")]), &missing).unwrap_err();
        assert!(matches!(err, KeywayError::EnvFile(_)));
    }
}
