//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use dashwire_core::{FetchOverrides, FetchStrategy};

use crate::error::CliError;

/// Read and parse a JSON payload from a file, or stdin for `-`.
pub fn read_json_payload(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Layer an optional `--strategy` over the global overrides.
pub fn with_strategy(overrides: FetchOverrides, strategy: Option<FetchStrategy>) -> FetchOverrides {
    match strategy {
        Some(strategy) => overrides.with_strategy(strategy),
        None => overrides,
    }
}

/// Human duration for tables, e.g. "5m" or "500ms".
pub fn human_duration(d: std::time::Duration) -> String {
    humantime::format_duration(d).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    #[test]
    fn reads_payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"totalNotes": 4}"#).unwrap();
        let value = read_json_payload(file.path()).unwrap();
        assert_eq!(value["totalNotes"], 4);
    }

    #[test]
    fn malformed_payload_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(read_json_payload(file.path()), Err(CliError::Json(_))));
    }

    #[test]
    fn strategy_flag_layers_over_globals() {
        let base = FetchOverrides::new().with_timeout(Duration::from_secs(2));
        let merged = with_strategy(base, Some(FetchStrategy::CacheOnly));
        assert_eq!(merged.strategy, Some(FetchStrategy::CacheOnly));
        assert_eq!(merged.timeout, Some(Duration::from_secs(2)));
        assert_eq!(with_strategy(base, None), base);
    }

    #[test]
    fn durations_render_compactly() {
        assert_eq!(human_duration(Duration::from_secs(300)), "5m");
        assert_eq!(human_duration(Duration::from_millis(500)), "500ms");
    }
}
