use std::fmt;

use serde::Deserialize;

/// How overlapping requests against the same hook are handled.
///
/// - `Parallel`: every request runs its steps immediately, even if another
///   request is still running steps of the same hook (default).
/// - `Serial`: requests against the hook take turns; a request waits until
///   the previous one has finished its whole task loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    Parallel,
    Serial,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Parallel
    }
}

/// Role of a step inside a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Task,
    Init,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Task => "task",
            StepKind::Init => "init",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default)]
        concurrency: ConcurrencyMode,
    }

    #[test]
    fn concurrency_mode_from_toml() {
        let parse = |s: &str| toml::from_str::<Wrapper>(s).map(|w| w.concurrency);
        assert_eq!(parse("concurrency = \"serial\"").unwrap(), ConcurrencyMode::Serial);
        assert_eq!(parse("").unwrap(), ConcurrencyMode::Parallel);
        assert!(parse("concurrency = \"queue\"").is_err());
    }

    #[test]
    fn step_kind_display() {
        assert_eq!(StepKind::Init.to_string(), "init");
        assert_eq!(StepKind::Task.to_string(), "task");
    }
}
