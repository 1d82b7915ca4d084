//! Playback Controller Tests
//!
//! Source selection, session tracking, episode stepping, auto-advance,
//! checkpoint sampling, sleep timer and PiP, driven through the headless
//! media element.

use std::time::{Duration, Instant};

use hlsdeck::api::Backend;
use hlsdeck::models::{Catalog, EpisodeRef, SourceKind};
use hlsdeck::playback::{PlaybackController, PlaybackError, SLEEP_NOTICE};
use hlsdeck::progress::ProgressStore;
use hlsdeck::stream::{HeadlessMedia, MediaElement};

const CATALOG: &str = r#"{
    "Alpha": {
        "S1": [
            {"name": "A1E1", "hls_url": "alpha/s1e1/master.m3u8", "mp4_url": "alpha/s1e1.mp4"},
            {"name": "A1E2", "hls_url": "/hls/alpha/s1e2/master.m3u8"},
            {"name": "A1E3", "mp4_url": "/alpha/s1e3.mp4"}
        ],
        "S2": [
            {"name": "A2E1", "mp4_url": "https://cdn.example/a2e1.mp4"}
        ],
        "S3": []
    },
    "Beta": {
        "S1": [
            {"name": "B1E1", "hls_url": "beta/b1e1.m3u8"},
            {"name": "Broken"}
        ]
    }
}"#;

fn temp_store() -> ProgressStore {
    let dir = std::env::temp_dir().join(format!("hlsdeck-playback-{}", uuid::Uuid::new_v4()));
    ProgressStore::new(dir.join("checkpoint.json"))
}

fn controller_with(media: HeadlessMedia) -> PlaybackController<HeadlessMedia> {
    let mut ctl = PlaybackController::new(Backend::resolve(None), media, temp_store());
    ctl.set_catalog(Catalog::from_json(CATALOG).unwrap());
    ctl
}

fn controller() -> PlaybackController<HeadlessMedia> {
    controller_with(HeadlessMedia::new())
}

fn ep(series: &str, season: &str, index: usize) -> EpisodeRef {
    EpisodeRef::new(series, season, index)
}

/// Feed every pending media event back into the controller
fn pump(ctl: &mut PlaybackController<HeadlessMedia>) {
    for event in ctl.poll_media(Duration::ZERO) {
        ctl.handle_event(event).unwrap();
    }
}

// =============================================================================
// Source Selection
// =============================================================================

#[test]
fn test_adaptive_preferred_when_supported() {
    let mut ctl = controller();
    let source = ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();

    assert_eq!(source.kind, SourceKind::Adaptive);
    assert_eq!(source.url, "http://127.0.0.1:8000/hls/alpha/s1e1/master.m3u8");
    assert_eq!(ctl.media().source(), Some(source.url.as_str()));
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S1", 0)));
    assert_eq!(ctl.now_playing(), Some("Playing: A1E1"));
    assert!(!ctl.media().is_paused());
}

#[test]
fn test_direct_fallback_without_adaptive_support() {
    let mut ctl = controller_with(HeadlessMedia::new().without_adaptive());
    let source = ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();

    assert_eq!(source.kind, SourceKind::Direct);
    assert_eq!(source.url, "http://127.0.0.1:8000/hls/alpha/s1e1.mp4");
}

#[test]
fn test_direct_only_episode_and_absolute_locator() {
    let mut ctl = controller();
    let source = ctl.play_file(ep("Alpha", "S1", 2), 0.0).unwrap();
    assert_eq!(source.kind, SourceKind::Direct);
    assert_eq!(source.url, "http://127.0.0.1:8000/hls/alpha/s1e3.mp4");

    let source = ctl.play_file(ep("Alpha", "S2", 0), 0.0).unwrap();
    assert_eq!(source.url, "https://cdn.example/a2e1.mp4");
}

#[test]
fn test_adaptive_only_episode_without_support_has_no_source() {
    let mut ctl = controller_with(HeadlessMedia::new().without_adaptive());
    let err = ctl.play_file(ep("Alpha", "S1", 1), 0.0).unwrap_err();
    assert!(matches!(err, PlaybackError::NoCompatibleSource));
}

#[test]
fn test_no_source_leaves_state_untouched() {
    let mut ctl = controller();
    ctl.play_file(ep("Beta", "S1", 0), 0.0).unwrap();
    let before = ctl.media().source().map(str::to_string);

    let err = ctl.play_file(ep("Beta", "S1", 1), 0.0).unwrap_err();
    assert_eq!(err.to_string(), "Error: No compatible video source found.");

    assert_eq!(ctl.current(), Some(&ep("Beta", "S1", 0)));
    assert_eq!(ctl.media().source().map(str::to_string), before);
    assert_eq!(ctl.media().loads().len(), 1);
    assert_eq!(ctl.now_playing(), Some("Playing: B1E1"));
}

#[test]
fn test_missing_episode_is_an_error() {
    let mut ctl = controller();
    for target in [ep("Alpha", "S1", 99), ep("Alpha", "S9", 0), ep("Gamma", "S1", 0)] {
        match ctl.play_file(target.clone(), 0.0) {
            Err(PlaybackError::MissingEpisode(missing)) => assert_eq!(missing, target),
            other => panic!("expected MissingEpisode, got {:?}", other),
        }
    }
    assert!(ctl.current().is_none());
    assert!(!ctl.media().has_source());
}

#[test]
fn test_play_before_catalog_is_unavailable() {
    let mut ctl = PlaybackController::new(Backend::default(), HeadlessMedia::new(), temp_store());
    assert!(matches!(
        ctl.play_file(ep("Alpha", "S1", 0), 0.0),
        Err(PlaybackError::CatalogUnavailable)
    ));
}

#[test]
fn test_start_time_is_passed_to_media() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 125.0).unwrap();
    assert_eq!(ctl.media().loads()[0].1, 125.0);
    assert_eq!(ctl.media().current_time(), 125.0);
}

// =============================================================================
// Stepping & Auto-Advance
// =============================================================================

#[test]
fn test_previous_and_next_stay_within_season() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();

    assert_eq!(ctl.previous().unwrap(), None);
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S1", 0)));

    assert_eq!(ctl.next().unwrap(), Some(ep("Alpha", "S1", 1)));
    assert_eq!(ctl.next().unwrap(), Some(ep("Alpha", "S1", 2)));
    // Last of the season: no wrap, no jump to S2
    assert_eq!(ctl.next().unwrap(), None);
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S1", 2)));

    assert_eq!(ctl.previous().unwrap(), Some(ep("Alpha", "S1", 1)));
    assert_eq!(ctl.media().loads().len(), 4);
}

#[test]
fn test_stepping_without_session_is_ignored() {
    let mut ctl = controller();
    assert_eq!(ctl.next().unwrap(), None);
    assert_eq!(ctl.previous().unwrap(), None);
    assert!(ctl.media().loads().is_empty());
}

#[test]
fn test_auto_advance_within_season() {
    let mut ctl = controller_with(HeadlessMedia::new().with_source_duration(30.0));
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    pump(&mut ctl);

    ctl.media_mut().finish();
    pump(&mut ctl);
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S1", 1)));
    assert_eq!(ctl.now_playing(), Some("Playing: A1E2"));
}

#[test]
fn test_auto_advance_crosses_into_next_season() {
    let mut ctl = controller_with(HeadlessMedia::new().with_source_duration(30.0));
    ctl.play_file(ep("Alpha", "S1", 2), 0.0).unwrap();
    pump(&mut ctl);

    ctl.media_mut().finish();
    pump(&mut ctl);
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S2", 0)));
    assert_eq!(ctl.media().loads().last().unwrap().1, 0.0);
}

#[test]
fn test_auto_advance_stops_at_empty_next_season() {
    let mut ctl = controller_with(HeadlessMedia::new().with_source_duration(30.0));
    ctl.play_file(ep("Alpha", "S2", 0), 0.0).unwrap();
    pump(&mut ctl);

    ctl.media_mut().finish();
    pump(&mut ctl);
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S2", 0)));
    assert_eq!(ctl.media().loads().len(), 1);
}

#[test]
fn test_auto_advance_never_crosses_series() {
    let mut ctl = controller_with(HeadlessMedia::new().with_source_duration(30.0));
    ctl.play_file(ep("Beta", "S1", 0), 0.0).unwrap();
    pump(&mut ctl);

    // Next in season has no source: the error surfaces, state stays
    ctl.media_mut().finish();
    let mut errors = 0;
    for event in ctl.poll_media(Duration::ZERO) {
        if ctl.handle_event(event).is_err() {
            errors += 1;
        }
    }
    assert_eq!(errors, 1);
    assert_eq!(ctl.current(), Some(&ep("Beta", "S1", 0)));
}

#[test]
fn test_playback_runs_through_a_whole_series() {
    let mut ctl = controller_with(HeadlessMedia::new().with_source_duration(12.0));
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();

    // Let the clock run: each tick advances the element a second
    for _ in 0..200 {
        for event in ctl.poll_media(Duration::from_secs(1)) {
            ctl.handle_event(event).unwrap();
        }
    }

    let played: Vec<String> = ctl.media().loads().iter().map(|(u, _)| u.clone()).collect();
    assert_eq!(played.len(), 4);
    assert_eq!(played[3], "https://cdn.example/a2e1.mp4");
    assert_eq!(ctl.current(), Some(&ep("Alpha", "S2", 0)));
}

// =============================================================================
// Transport
// =============================================================================

#[test]
fn test_toggle_play_follows_paused_flag() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    assert!(!ctl.media().is_paused());
    ctl.toggle_play().unwrap();
    assert!(ctl.media().is_paused());
    ctl.toggle_play().unwrap();
    assert!(!ctl.media().is_paused());
}

#[test]
fn test_seek_steps_ten_seconds_and_clamps() {
    let mut ctl = controller_with(HeadlessMedia::new().with_source_duration(25.0));
    ctl.play_file(ep("Alpha", "S1", 0), 5.0).unwrap();

    ctl.seek_forward().unwrap();
    assert_eq!(ctl.media().current_time(), 15.0);
    ctl.seek_forward().unwrap();
    assert_eq!(ctl.media().current_time(), 25.0);
    ctl.seek_back().unwrap();
    ctl.seek_back().unwrap();
    ctl.seek_back().unwrap();
    assert_eq!(ctl.media().current_time(), 0.0);
}

// =============================================================================
// Checkpoints
// =============================================================================

#[test]
fn test_checkpoint_saved_on_multiples_of_five() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    pump(&mut ctl);
    assert_eq!(ctl.load_checkpoint().unwrap().time, 0.0);

    ctl.media_mut().advance(4.0);
    pump(&mut ctl);
    assert_eq!(ctl.load_checkpoint().unwrap().time, 0.0);

    ctl.media_mut().advance(1.0);
    pump(&mut ctl);
    let checkpoint = ctl.load_checkpoint().unwrap();
    assert_eq!(checkpoint.time, 5.0);
    assert_eq!(checkpoint.target(), ep("Alpha", "S1", 0));

    ctl.media_mut().advance(3.0);
    pump(&mut ctl);
    assert_eq!(ctl.load_checkpoint().unwrap().time, 5.0);

    ctl.media_mut().advance(2.0);
    pump(&mut ctl);
    assert_eq!(ctl.load_checkpoint().unwrap().time, 10.0);

    ctl.clear_checkpoint().unwrap();
}

#[test]
fn test_fractional_times_use_whole_seconds() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    ctl.clear_checkpoint().unwrap();

    ctl.handle_event(hlsdeck::MediaEvent::TimeUpdate(14.9)).unwrap();
    assert!(ctl.load_checkpoint().is_none());
    ctl.handle_event(hlsdeck::MediaEvent::TimeUpdate(15.7)).unwrap();
    assert_eq!(ctl.load_checkpoint().unwrap().time, 15.7);

    ctl.clear_checkpoint().unwrap();
}

#[test]
fn test_no_checkpoint_without_session() {
    let mut ctl = controller();
    ctl.handle_event(hlsdeck::MediaEvent::TimeUpdate(10.0)).unwrap();
    assert!(ctl.load_checkpoint().is_none());
    assert!(ctl.save_progress().is_none());
}

// =============================================================================
// Sleep Timer
// =============================================================================

#[test]
fn test_sleep_timer_pauses_once() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();

    let t0 = Instant::now();
    ctl.set_sleep_timer(15, t0);
    assert_eq!(ctl.tick(t0 + Duration::from_secs(14 * 60)), None);
    assert!(!ctl.media().is_paused());

    assert_eq!(ctl.tick(t0 + Duration::from_secs(15 * 60)), Some(SLEEP_NOTICE));
    assert!(ctl.media().is_paused());
    assert_eq!(ctl.sleep_timer().minutes(), 0);
    assert_eq!(ctl.tick(t0 + Duration::from_secs(60 * 60)), None);
}

#[test]
fn test_sleep_reselect_replaces_pending_action() {
    let mut ctl = controller();
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();

    let t0 = Instant::now();
    ctl.set_sleep_timer(15, t0);
    ctl.set_sleep_timer(30, t0 + Duration::from_secs(60));

    // The first schedule is gone
    assert_eq!(ctl.tick(t0 + Duration::from_secs(16 * 60)), None);
    assert!(!ctl.media().is_paused());
    assert_eq!(ctl.tick(t0 + Duration::from_secs(31 * 60)), Some(SLEEP_NOTICE));
}

#[test]
fn test_sleep_off_cancels() {
    let mut ctl = controller();
    let t0 = Instant::now();
    ctl.set_sleep_timer(15, t0);
    ctl.set_sleep_timer(0, t0);
    assert!(!ctl.sleep_timer().is_pending());
    assert_eq!(ctl.tick(t0 + Duration::from_secs(3 * 3600)), None);
}

#[test]
fn test_sleep_cycle_order() {
    let mut ctl = controller();
    let now = Instant::now();
    let seen: Vec<u32> = (0..7).map(|_| ctl.cycle_sleep_timer(now)).collect();
    assert_eq!(seen, vec![15, 30, 45, 60, 90, 0, 15]);
}

// =============================================================================
// Picture-in-Picture
// =============================================================================

#[test]
fn test_pip_toggles() {
    let mut ctl = controller();
    ctl.toggle_pip();
    assert!(!ctl.media().in_pip(), "no source, nothing to float");

    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    ctl.toggle_pip();
    assert!(ctl.media().in_pip());
    ctl.toggle_pip();
    assert!(!ctl.media().in_pip());
}

#[test]
fn test_pip_disabled_is_ignored() {
    let mut ctl = controller_with(HeadlessMedia::new().with_pip_enabled(false));
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    ctl.toggle_pip();
    assert!(!ctl.media().in_pip());
}

#[test]
fn test_pip_failure_is_silent() {
    let mut ctl = controller_with(HeadlessMedia::new().with_failing_pip());
    ctl.play_file(ep("Alpha", "S1", 0), 0.0).unwrap();
    ctl.toggle_pip();
    assert!(!ctl.media().in_pip());
    assert!(!ctl.media().is_paused());
}
