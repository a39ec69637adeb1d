//! Tests for log level selection and subscriber installation

#[cfg(test)]
mod tests {
    use photomosaic::io::logging::{default_directive, init_logging};

    // Tests each -v raises the default level and quiet wins
    // Verified by letting verbosity override quiet
    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0, false), "info");
        assert_eq!(default_directive(1, false), "debug");
        assert_eq!(default_directive(2, false), "trace");
        assert_eq!(default_directive(9, false), "trace");
        assert_eq!(default_directive(3, true), "error");
    }

    // Tests repeated initialization keeps the first subscriber without panicking
    // Verified by using init instead of try_init
    #[test]
    fn test_init_logging_twice() {
        init_logging(0, true);
        init_logging(2, false);
        tracing::info!("still usable");
    }
}
