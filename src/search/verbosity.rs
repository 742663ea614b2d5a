/// How much the planner logs. Each level maps to the most detailed
/// `tracing` level that is still shown.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Silent,
    /// Warnings, like a rejected start or goal
    Quiet,
    /// Search progress and results
    #[default]
    Normal,
    /// Every obstacle added and every plan safety failure
    Verbose,
    Trace,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Silent => tracing::Level::ERROR,
            Verbosity::Quiet => tracing::Level::WARN,
            Verbosity::Normal => tracing::Level::INFO,
            Verbosity::Verbose => tracing::Level::DEBUG,
            Verbosity::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_get_more_detailed() {
        let levels: Vec<tracing::Level> = [
            Verbosity::Silent,
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ]
        .into_iter()
        .map(tracing::Level::from)
        .collect();
        assert!(levels.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(tracing::Level::from(Verbosity::default()), tracing::Level::INFO);
    }
}
