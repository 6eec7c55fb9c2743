use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "gradebookd=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource {
    Builtin,
    Empty,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    pub log_filter: String,
    pub json_logs: bool,
    pub seed: SeedSource,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = lookup("GRADEBOOKD_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let json_logs = lookup("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let seed = match lookup("GRADEBOOKD_SEED") {
            None => SeedSource::Builtin,
            Some(v) => match v.trim() {
                "" | "builtin" => SeedSource::Builtin,
                "none" => SeedSource::Empty,
                path => SeedSource::File(PathBuf::from(path)),
            },
        };
        Self {
            log_filter,
            json_logs,
            seed,
        }
    }
}
