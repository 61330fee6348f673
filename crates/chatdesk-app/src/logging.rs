use env_logger::Env;

/// Default filter for each `-v` count; `RUST_LOG` wins when set
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialise `env_logger` on stderr. Safe to call more than once.
pub fn init(verbosity: u8) {
    let env = Env::default().default_filter_or(default_filter(verbosity));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .format_target(verbosity > 1)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0), "warn");
        assert_eq!(default_filter(1), "info");
        assert_eq!(default_filter(5), "debug");
    }
}
