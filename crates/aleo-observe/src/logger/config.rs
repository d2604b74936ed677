use std::io::IsTerminal;

use crate::logger::format::LoggerFormat;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directives, e.g. `info` or `warn,aleo_fetch=debug`.
    pub level: String,
    pub with_targets: bool,
    /// ANSI colors for [`LoggerFormat::Text`]; ignored by the other outputs.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: "info".to_string(),
            with_targets: true,
            use_color: color_wanted(std::env::var_os("NO_COLOR").is_some()),
        }
    }
}

/// Colors only on an interactive stdout, and never when `NO_COLOR` is set.
fn color_wanted(no_color: bool) -> bool {
    !no_color && std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_text_info() {
        let cfg = LoggerConfig::default();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.level, "info");
        assert!(cfg.with_targets);
    }

    #[test]
    fn no_color_disables_ansi() {
        assert!(!color_wanted(true));
    }
}
