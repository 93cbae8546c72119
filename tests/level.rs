//! Tests for log levels and the runtime level controller.

use sharedlog::{Level, LevelController};
use std::thread;

#[test]
fn level_ordering() {
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert!(Level::Error < Level::DPanic);
    assert!(Level::DPanic < Level::Panic);
    assert!(Level::Panic < Level::Fatal);
}

#[test]
fn level_display() {
    assert_eq!(Level::Debug.to_string(), "debug");
    assert_eq!(Level::Info.to_string(), "info");
    assert_eq!(Level::Warn.to_string(), "warn");
    assert_eq!(Level::Error.to_string(), "error");
    assert_eq!(Level::DPanic.to_string(), "dpanic");
    assert_eq!(Level::Fatal.as_capital_str(), "FATAL");
}

#[test]
fn level_from_str() {
    assert_eq!("DEBUG".parse::<Level>().unwrap(), Level::Debug);
    assert_eq!("Info".parse::<Level>().unwrap(), Level::Info);
    assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!("err".parse::<Level>().unwrap(), Level::Error);
    assert_eq!("dpanic".parse::<Level>().unwrap(), Level::DPanic);
    assert_eq!(" fatal ".parse::<Level>().unwrap(), Level::Fatal);
}

#[test]
fn level_from_str_invalid() {
    assert!("invalid-label".parse::<Level>().is_err());
    assert!("".parse::<Level>().is_err());
}

#[test]
fn level_default() {
    assert_eq!(Level::default(), Level::Info);
}

#[test]
fn level_u8_roundtrip_covers_all() {
    for level in Level::all() {
        assert_eq!(Level::from_u8(level as u8), level);
    }
    assert_eq!(Level::from_u8(200), Level::Info);
}

#[test]
fn controller_defaults_to_info() {
    let controller = LevelController::default();
    assert_eq!(controller.level(), Level::Info);
    assert!(!controller.enabled(Level::Debug));
    assert!(controller.enabled(Level::Info));
    assert!(controller.enabled(Level::Error));
}

#[test]
fn set_level_applies_parsed_label() {
    let controller = LevelController::default();
    assert_eq!(controller.set_level("warn"), Level::Warn);
    assert_eq!(controller.level(), Level::Warn);
    assert!(!controller.enabled(Level::Info));
}

#[test]
fn set_level_falls_back_to_info_on_bad_label() {
    let controller = LevelController::new(Level::Error);
    assert_eq!(controller.set_level("invalid-label"), Level::Info);
    assert_eq!(controller.level(), Level::Info);
}

#[test]
fn clones_share_the_threshold() {
    let controller = LevelController::default();
    let clone = controller.clone();
    clone.set(Level::Debug);
    assert_eq!(controller.level(), Level::Debug);
    assert!(controller.shares_with(&clone));
    assert!(!controller.shares_with(&LevelController::default()));
}

#[test]
fn concurrent_readers_see_a_valid_level() {
    let controller = LevelController::default();
    thread::scope(|s| {
        for _ in 0..4 {
            let reader = controller.clone();
            s.spawn(move || {
                for _ in 0..1000 {
                    let level = reader.level();
                    assert!(level == Level::Info || level == Level::Error);
                }
            });
        }
        s.spawn(|| {
            for i in 0..1000 {
                controller.set(if i % 2 == 0 { Level::Error } else { Level::Info });
            }
        });
    });
}
