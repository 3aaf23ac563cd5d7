//! Brokerage API token lookup.
//!
//! The token is read from an env-style file (`KEY=value` lines, `#`
//! comments, optional quotes around the value) and, failing that, from the
//! process environment.

use crate::domain::error::BondExportError;
use configparser::ini::Ini;
use std::path::Path;

pub const TOKEN_VARIABLE: &str = "TINKOFF_INVEST_TOKEN";
pub const DEFAULT_ENV_FILE: &str = "config.env";

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"').trim_matches('\'')
}

/// Token from the contents of an env-style file, if it sets one.
pub fn token_from_env_file(content: &str) -> Option<String> {
    let mut env = Ini::new_cs();
    if let Err(e) = env.read(content.to_string()) {
        tracing::warn!(error = %e, "env file is not readable as KEY=value lines");
        return None;
    }
    env.sections()
        .iter()
        .find_map(|section| env.get(section, TOKEN_VARIABLE))
        .map(|v| unquote(&v).to_string())
        .filter(|v| !v.is_empty())
}

/// Token from `env_path`, then from `lookup` (the process environment in
/// production). A missing file is not an error.
pub fn load_token_with<F>(env_path: &Path, lookup: F) -> Result<String, BondExportError>
where
    F: Fn(&str) -> Option<String>,
{
    let from_file = match std::fs::read_to_string(env_path) {
        Ok(content) => token_from_env_file(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %env_path.display(), error = %e, "cannot read env file");
            None
        }
    };

    from_file
        .or_else(|| lookup(TOKEN_VARIABLE).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| BondExportError::MissingToken {
            variable: TOKEN_VARIABLE.to_string(),
            file: env_path.display().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn plain_value() {
        let token = token_from_env_file("TINKOFF_INVEST_TOKEN=t.abc123\n");
        assert_eq!(token.as_deref(), Some("t.abc123"));
    }

    #[test]
    fn quoted_values() {
        assert_eq!(
            token_from_env_file("TINKOFF_INVEST_TOKEN=\"t.abc123\"\n").as_deref(),
            Some("t.abc123")
        );
        assert_eq!(
            token_from_env_file("TINKOFF_INVEST_TOKEN = 't.abc123'\n").as_deref(),
            Some("t.abc123")
        );
    }

    #[test]
    fn comments_and_other_keys_are_ignored() {
        let content = "# broker credentials\nOTHER=1\nTINKOFF_INVEST_TOKEN=t.xyz\n";
        assert_eq!(token_from_env_file(content).as_deref(), Some("t.xyz"));
    }

    #[test]
    fn empty_value_is_no_token() {
        assert_eq!(token_from_env_file("TINKOFF_INVEST_TOKEN=\n"), None);
        assert_eq!(token_from_env_file(""), None);
    }

    #[test]
    fn file_wins_over_environment() {
        let file = env_file("TINKOFF_INVEST_TOKEN=t.file\n");
        let token = load_token_with(file.path(), |_| Some("t.env".into())).unwrap();
        assert_eq!(token, "t.file");
    }

    #[test]
    fn environment_is_fallback() {
        let token = load_token_with(Path::new("/nonexistent/config.env"), |key| {
            (key == TOKEN_VARIABLE).then(|| "t.env".to_string())
        })
        .unwrap();
        assert_eq!(token, "t.env");
    }

    #[test]
    fn missing_everywhere_is_an_error() {
        let err = load_token_with(Path::new("/nonexistent/config.env"), |_| None).unwrap_err();
        assert!(matches!(err, BondExportError::MissingToken { .. }));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn blank_environment_value_is_missing() {
        let result = load_token_with(Path::new("/nonexistent/config.env"), |_| Some("  ".into()));
        assert!(result.is_err());
    }
}
