// Drives the practice controller through whole sessions with scripted
// microphone readings and a manual clock, without touching a terminal or
// an audio device.

use std::time::Duration;

use assert_matches::assert_matches;
use practube::recording::ScriptedCapture;
use practube::scheduler::{ManualClock, TickScheduler};
use practube::session::{
    PracticeSession, SessionError, SessionSettings, SessionState, HISTORY_LEN,
};

fn new_session(capture: &ScriptedCapture) -> PracticeSession<ScriptedCapture> {
    PracticeSession::new(capture.clone(), SessionSettings::default())
}

#[test]
fn one_minute_of_loud_practice_unlocks_the_reward() {
    let capture = ScriptedCapture::constant(-10.0);
    let mut session = new_session(&capture);
    session.configure(1.0, 1.0).unwrap();
    session.start().unwrap();

    for _ in 0..1200 {
        session.tick();
    }

    assert_eq!(session.elapsed_seconds(), 60.0);
    assert!(session.can_finish());
    session.finish().unwrap();
    assert_eq!(session.state(), SessionState::Reward);
    assert_eq!(capture.active(), 0);
}

#[test]
fn one_tick_short_is_not_enough() {
    let capture = ScriptedCapture::constant(-10.0);
    let mut session = new_session(&capture);
    session.configure(1.0, 1.0).unwrap();
    session.start().unwrap();

    for _ in 0..1199 {
        session.tick();
    }

    assert!(!session.can_finish());
    assert_matches!(
        session.finish(),
        Err(SessionError::InvalidTransition { action: "finish", .. })
    );
    assert_eq!(session.state(), SessionState::Recording);
}

#[test]
fn history_is_always_twenty_levels() {
    let capture = ScriptedCapture::sequence((0..50).map(|i| -(i as f32) * 3.0));
    let mut session = new_session(&capture);
    assert_eq!(session.level_history().len(), HISTORY_LEN);

    session.configure(0.001, 0.001).unwrap();
    session.start().unwrap();
    assert_eq!(session.level_history().len(), HISTORY_LEN);

    for _ in 0..50 {
        session.tick();
        assert_eq!(session.level_history().len(), HISTORY_LEN);
    }

    session.finish().unwrap();
    assert_eq!(session.snapshot().level_history.len(), HISTORY_LEN);
    session.restart().unwrap();
    assert_eq!(session.level_history().len(), HISTORY_LEN);
}

#[test]
fn elapsed_time_never_decreases_and_only_counts_loud_ticks() {
    // alternating loud and quiet readings, with readings right at the threshold
    let readings = [-10.0, -25.0, -20.0, -19.9, -160.0, 0.0];
    let capture = ScriptedCapture::sequence(readings.iter().copied().cycle().take(60));
    let mut session = new_session(&capture);
    session.configure(5.0, 1.0).unwrap();
    session.start().unwrap();

    let mut previous = session.elapsed_seconds();
    for _ in 0..60 {
        session.tick();
        let elapsed = session.elapsed_seconds();
        assert!(elapsed >= previous);
        previous = elapsed;
    }

    // three loud readings per cycle of six, ten cycles
    assert_eq!(session.elapsed_seconds(), 1.5);
}

#[test]
fn scheduler_drives_ticks_from_the_clock() {
    let capture = ScriptedCapture::constant(-5.0);
    let mut session = new_session(&capture);
    session.configure(0.05, 1.0).unwrap();
    session.start().unwrap();

    let clock = ManualClock::new();
    let mut scheduler = TickScheduler::new(clock.clone(), session.settings().tick_interval);
    scheduler.start();

    // three seconds of wall time in uneven frames
    for frame_ms in [16, 34, 120, 80, 250].iter().cycle().take(60) {
        clock.advance(Duration::from_millis(*frame_ms));
        for _ in 0..scheduler.poll() {
            session.tick();
        }
    }

    // 60 frames averaging 100ms = 6s = 120 ticks; target is 3s
    assert!(session.can_finish());
    assert_eq!(session.elapsed_seconds(), 6.0);
}

#[test]
fn capture_failure_is_reported_and_retry_is_possible() {
    let failing = ScriptedCapture::failing("capture unavailable");
    let mut session = PracticeSession::new(failing, SessionSettings::default());
    session.configure(1.0, 1.0).unwrap();

    let err = session.start().unwrap_err();
    assert!(err.to_string().contains("capture unavailable"));
    assert_eq!(session.state(), SessionState::Idle);

    // reconfiguring after a failure is allowed
    session.configure(2.0, 1.0).unwrap();
    assert_eq!(session.practice_seconds(), 120.0);
}

#[test]
fn a_new_session_starts_from_scratch() {
    let capture = ScriptedCapture::constant(-10.0);
    let mut session = new_session(&capture);
    session.configure(0.001, 1.0).unwrap();
    session.start().unwrap();
    for _ in 0..5 {
        session.tick();
    }
    session.finish().unwrap();
    session.restart().unwrap();

    session.configure(1.0, 1.0).unwrap();
    session.start().unwrap();
    assert_eq!(session.elapsed_seconds(), 0.0);
    assert!(!session.can_finish());
    assert_eq!(session.level_history(), &[0.0; HISTORY_LEN]);
    assert_eq!(capture.begun(), 2);
    assert_eq!(capture.active(), 1);
}
