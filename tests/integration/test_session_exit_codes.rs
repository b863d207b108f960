//! Integration Tests for Session Exit Status
//!
//! Runs real children through `Session` and checks the status the wrapper
//! would exit with.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use ptyredact::{
    exit_status, ChildExit, Error, RedactionSet, Session, SessionConfig, SpawnConfig,
    FAILURE_EXIT_CODE,
};
use test_utils::{detached_config, pty_unavailable, BrokenSink, SharedSink};

async fn run(config: SessionConfig) -> Option<ptyredact::Result<ChildExit>> {
    let result = Session::with_output(config, SharedSink::new()).run().await;
    if matches!(&result, Err(e) if pty_unavailable(e)) {
        return None;
    }
    Some(result)
}

#[tokio::test]
async fn test_success_exits_zero() {
    let Some(result) = run(detached_config("", "true")).await else {
        return;
    };
    assert_eq!(exit_status(&result), 0);
}

#[tokio::test]
async fn test_child_exit_code_is_propagated() {
    let Some(result) = run(detached_config("", "exit 7")).await else {
        return;
    };
    assert!(matches!(result, Ok(ChildExit::Exited(7))));
    assert_eq!(exit_status(&result), 7);
}

#[tokio::test]
async fn test_high_exit_code_is_propagated() {
    let Some(result) = run(detached_config("", "exit 200")).await else {
        return;
    };
    assert_eq!(exit_status(&result), 200);
}

#[tokio::test]
async fn test_signal_death_exits_one() {
    let Some(result) = run(detached_config("", "kill -9 $$")).await else {
        return;
    };
    assert!(matches!(result, Ok(ChildExit::Signaled(_))));
    assert_eq!(exit_status(&result), FAILURE_EXIT_CODE);
}

#[tokio::test]
async fn test_missing_command_exits_one() {
    let spawn = SpawnConfig::new("/definitely/not/a/real/binary", vec![]);
    let mut config = SessionConfig::new(RedactionSet::default(), spawn);
    config.forward_input = false;
    config.raw_mode = false;

    let result = Session::with_output(config, SharedSink::new()).run().await;
    assert!(result.is_err());
    assert_eq!(exit_status(&result), FAILURE_EXIT_CODE);
}

#[tokio::test]
async fn test_broken_output_stops_the_child() {
    let config = detached_config("", "echo first; sleep 30; echo never");

    let started = std::time::Instant::now();
    let result = Session::with_output(config, BrokenSink).run().await;
    if matches!(&result, Err(e) if pty_unavailable(e)) {
        return;
    }

    assert!(matches!(result, Err(Error::OutputFailed(_))));
    assert_eq!(exit_status(&result), FAILURE_EXIT_CODE);
    assert!(started.elapsed() < std::time::Duration::from_secs(20));
}
