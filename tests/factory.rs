//! Tests for one-time initialization and the degraded fallback.

use sharedlog::{Error, FactoryState, Level, LoggerFactory};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Barrier;
use std::thread;
use tempfile::TempDir;

fn write_config(dir: &Path, log_name: &str) -> PathBuf {
    let log_path = dir.join(log_name);
    let config_path = dir.join("logging.yaml");
    fs::write(
        &config_path,
        format!(
            "level: info\nencoding: json\noutputPath: {}\n",
            log_path.display()
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn starts_uninitialized() {
    let factory = LoggerFactory::new();
    assert_eq!(factory.state(), FactoryState::Uninitialized);
    assert!(factory.logger().is_none());
    assert_eq!(factory.build_count(), 0);
}

#[test]
fn concurrent_callers_share_one_logger() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path(), "app.log");
    let factory = LoggerFactory::new();
    let barrier = Barrier::new(16);

    let loggers: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    factory.get_logger(&config_path).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &loggers[0];
    assert!(loggers.iter().all(|l| l.same_handle(first)));
    assert!(!first.is_nop());
    assert_eq!(factory.build_count(), 1);
    assert_eq!(factory.state(), FactoryState::Ready);

    let written = fs::read_to_string(tmp.path().join("app.log")).unwrap();
    assert_eq!(written.matches("Logger initialized").count(), 1);
}

#[test]
fn initialization_record_lists_config() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path(), "app.log");
    let factory = LoggerFactory::new();
    factory.get_logger(&config_path).unwrap();

    let written = fs::read_to_string(tmp.path().join("app.log")).unwrap();
    let record: serde_json::Value = serde_json::from_str(written.lines().next().unwrap()).unwrap();
    assert_eq!(record["msg"], "Logger initialized");
    assert_eq!(record["level"], "info");
    assert_eq!(record["development"], false);
    assert!(record["output_path"].as_str().unwrap().ends_with("app.log"));
}

#[test]
fn later_calls_ignore_the_path() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path(), "app.log");
    let factory = LoggerFactory::new();

    let first = factory.get_logger(&config_path).unwrap();
    let second = factory.get_logger(tmp.path().join("does-not-exist.yaml")).unwrap();

    assert!(first.same_handle(&second));
    assert_eq!(factory.build_count(), 1);
    assert_eq!(factory.state(), FactoryState::Ready);
}

#[test]
fn missing_config_degrades_to_nop() {
    let tmp = TempDir::new().unwrap();
    let factory = LoggerFactory::new();

    let err = factory
        .get_logger(tmp.path().join("missing.yaml"))
        .unwrap_err();
    assert!(matches!(err.error(), Error::Io { .. }));
    assert!(err.error().is_load_failure());
    assert!(err.logger().is_nop());
    assert_eq!(factory.state(), FactoryState::Degraded);

    // the failure is reported once; later callers get the cached no-op logger
    let again = factory.get_logger(tmp.path().join("missing.yaml")).unwrap();
    assert!(again.is_nop());
    assert!(again.same_handle(err.logger()));
    assert_eq!(factory.build_count(), 1);

    // discarding is silent
    again.error("dropped", &[]);
    assert!(again.sync().is_ok());
    assert!(!again.enabled(Level::Fatal));
}

#[test]
fn concurrent_callers_on_missing_config_see_one_error() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("missing.yaml");
    let factory = LoggerFactory::new();
    let barrier = Barrier::new(32);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..32)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    factory.get_logger(&config_path)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let errors = results.iter().filter(|r| r.is_err()).count();
    assert_eq!(errors, 1);
    assert_eq!(factory.build_count(), 1);
    assert_eq!(factory.state(), FactoryState::Degraded);

    let cached = factory.logger().unwrap();
    for result in &results {
        let logger = match result {
            Ok(logger) => logger,
            Err(e) => e.logger(),
        };
        assert!(logger.is_nop());
        assert!(logger.same_handle(cached));
    }
}

#[test]
fn negative_rotation_values_do_not_degrade() {
    let tmp = TempDir::new().unwrap();
    let log_path = tmp.path().join("app.log");
    let config_path = tmp.path().join("logging.yaml");
    fs::write(
        &config_path,
        format!(
            "outputPath: {}\nrotation:\n  maxSize: -1\n  maxBackups: -2\n",
            log_path.display()
        ),
    )
    .unwrap();

    let factory = LoggerFactory::new();
    let logger = factory.get_logger(&config_path).unwrap();
    assert!(!logger.is_nop());
    assert_eq!(factory.state(), FactoryState::Ready);
    assert!(fs::read_to_string(&log_path).unwrap().contains("Logger initialized"));
}

#[test]
fn malformed_config_degrades_to_nop() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("logging.yaml");
    fs::write(&config_path, "level: [unclosed\n").unwrap();

    let factory = LoggerFactory::new();
    let (logger, error) = factory.get_logger(&config_path).unwrap_err().into_parts();
    assert!(matches!(error, Error::Parse { .. }));
    assert!(error.to_string().contains("logging.yaml"));
    assert!(logger.is_nop());
    assert_eq!(factory.state(), FactoryState::Degraded);
}

#[test]
fn degraded_factory_stays_degraded() {
    let tmp = TempDir::new().unwrap();
    let factory = LoggerFactory::new();
    let _ = factory.get_logger(tmp.path().join("missing.yaml"));

    // a valid config afterwards doesn't trigger another build
    let config_path = write_config(tmp.path(), "app.log");
    let logger = factory.get_logger(&config_path).unwrap();
    assert!(logger.is_nop());
    assert_eq!(factory.build_count(), 1);
    assert!(!tmp.path().join("app.log").exists());
}

#[test]
fn factory_level_controls_built_logger() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path(), "app.log");
    let factory = LoggerFactory::new();
    let logger = factory.get_logger(&config_path).unwrap();

    logger.debug("before", &[]);
    assert_eq!(factory.level().set_level("debug"), Level::Debug);
    logger.debug("after", &[]);

    let written = fs::read_to_string(tmp.path().join("app.log")).unwrap();
    assert!(!written.contains("before"));
    assert!(written.contains("after"));
}

#[test]
fn global_factory_is_a_singleton() {
    assert!(std::ptr::eq(sharedlog::global(), sharedlog::global()));
}
