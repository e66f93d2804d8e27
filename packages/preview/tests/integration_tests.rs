//! Integration tests for the preview engine

use devbox_preview::{
    CommitTrigger, GenerationOutcome, PreviewError, PreviewSession, PreviewSettings,
    RefreshPolicy, RenderFrame, RenderTarget, Selection, Upload, ViewMode,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Render target that remembers every frame it was asked to mount
#[derive(Clone, Default)]
struct FrameLog {
    frames: Arc<Mutex<Vec<RenderFrame>>>,
}

impl FrameLog {
    fn documents(&self) -> Vec<String> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.document.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl RenderTarget for FrameLog {
    fn name(&self) -> &str {
        "frame-log"
    }

    fn mount(&mut self, frame: &RenderFrame) -> Result<(), PreviewError> {
        self.frames.lock().unwrap().push(frame.clone());
        Ok(())
    }
}

fn session_with_log(policy: RefreshPolicy, initial: &str) -> (PreviewSession, FrameLog) {
    let settings = PreviewSettings::default().with_policy(policy);
    let mut session = PreviewSession::with_source(settings, initial);
    let log = FrameLog::default();
    session.attach_target(Box::new(log.clone())).unwrap();
    // Attaching mounts the seed frame
    log.frames.lock().unwrap().clear();
    (session, log)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_auto_burst_renders_only_final_value() {
    let (mut session, log) = session_with_log(RefreshPolicy::Auto, "");
    let t0 = Instant::now();

    let typed = "<h1>hello</h1>";
    let mut now = t0;
    for end in 1..=typed.len() {
        session.edit(&typed[..end], now);
        // Keep polling inside the window like an event loop would
        session.tick(now + ms(799));
        now += ms(120);
    }

    assert_eq!(log.len(), 0, "no intermediate value may be rendered");

    let deadline = session.next_deadline().unwrap();
    session.tick(deadline);
    assert_eq!(log.documents(), vec![typed.to_string()]);
}

#[test]
fn test_two_bursts_render_two_values() {
    let (mut session, log) = session_with_log(RefreshPolicy::Auto, "");
    let t0 = Instant::now();

    session.edit("a", t0);
    session.edit("ab", t0 + ms(100));
    session.tick(t0 + ms(900));

    session.edit("abc", t0 + ms(2000));
    session.tick(t0 + ms(2800));

    assert_eq!(log.documents(), vec!["ab".to_string(), "abc".to_string()]);
}

#[test]
fn test_manual_commits_once_on_run() {
    let (mut session, log) = session_with_log(RefreshPolicy::Manual, "");
    let t0 = Instant::now();

    for (i, value) in ["<p", "<p>", "<p>ok</p>"].iter().enumerate() {
        assert!(session.edit(*value, t0 + ms(i as u64 * 50)).is_none());
    }
    session.tick(t0 + ms(60_000));
    assert_eq!(log.len(), 0);

    let frame = session.run().unwrap();
    assert_eq!(frame.trigger, CommitTrigger::Run);
    assert_eq!(log.documents(), vec!["<p>ok</p>".to_string()]);

    // Nothing more shows up later
    session.tick(t0 + ms(120_000));
    assert_eq!(log.len(), 1);
}

#[test]
fn test_run_without_changes_still_rerenders() {
    let (mut session, log) = session_with_log(RefreshPolicy::Manual, "<p>same</p>");

    let first = session.run().unwrap();
    let second = session.run().unwrap();

    assert_eq!(log.len(), 2);
    assert!(second.generation > first.generation);
    assert_eq!(second.document, "<p>same</p>");
}

#[test]
fn test_view_switch_round_trip_keeps_source() {
    let (mut session, log) = session_with_log(RefreshPolicy::Auto, "<p>keep</p>");
    let revision = session.revision();

    for mode in [ViewMode::Code, ViewMode::Preview, ViewMode::Split, ViewMode::Preview] {
        session.select_view(mode);
    }

    assert_eq!(session.source(), "<p>keep</p>");
    assert_eq!(session.revision(), revision);
    assert!(session.next_deadline().is_none());
    assert_eq!(log.len(), 0, "view switching never forces a render");
}

#[test]
fn test_tab_insertion_at_cursor() {
    let (mut session, _log) = session_with_log(RefreshPolicy::Auto, "<div></div>");

    let cursor = session.press_tab(Selection::caret(5), Instant::now()).unwrap();

    assert_eq!(session.source(), "<div>  </div>");
    assert_eq!(cursor, 7);
}

#[test]
fn test_upload_sets_source_and_resets_picker() {
    let (mut session, log) = session_with_log(RefreshPolicy::Auto, "");
    let t0 = Instant::now();

    session.upload(Upload::new("hi.html", "<h1>hi</h1>"), t0);

    assert_eq!(session.source(), "<h1>hi</h1>");
    assert!(session.file_picker().value().is_none());

    // Auto policy still debounces uploads
    assert_eq!(log.len(), 0);
    session.tick(t0 + ms(800));
    assert_eq!(log.documents(), vec!["<h1>hi</h1>".to_string()]);
}

#[test]
fn test_upload_renders_immediately_in_manual() {
    let (mut session, log) = session_with_log(RefreshPolicy::Manual, "");

    let frame = session.upload(Upload::new("hi.html", "<h1>hi</h1>"), Instant::now());

    assert_eq!(frame.unwrap().trigger, CommitTrigger::Immediate);
    assert_eq!(log.documents(), vec!["<h1>hi</h1>".to_string()]);
}

#[test]
fn test_download_current_source() {
    let (mut session, _log) = session_with_log(RefreshPolicy::Auto, "");
    session.edit("<p>x</p>", Instant::now());

    let download = session.download();
    assert_eq!(download.file_name, "index.html");
    assert_eq!(download.mime, "text/html");
    assert_eq!(download.bytes, b"<p>x</p>".to_vec());
}

#[test]
fn test_failed_generation_leaves_source_and_reenables() {
    let (mut session, log) = session_with_log(RefreshPolicy::Manual, "<p>before</p>");

    let request = session.begin_generation("make it blue").unwrap();
    assert_eq!(request.current_code, "<p>before</p>");
    assert!(!session.generation_enabled());
    assert_eq!(
        session.begin_generation("second").unwrap_err(),
        PreviewError::GenerationInFlight
    );

    let outcome = session
        .finish_generation(request.ticket, Err::<String, _>("quota exceeded"), Instant::now())
        .unwrap();

    match outcome {
        GenerationOutcome::Failed { notice } => assert!(notice.contains("quota exceeded")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(session.source(), "<p>before</p>");
    assert!(session.generation_enabled());
    assert_eq!(log.len(), 0);
}

#[test]
fn test_successful_generation_replaces_source() {
    let (mut session, log) = session_with_log(RefreshPolicy::Manual, "");

    let request = session.begin_generation("a card").unwrap();
    let outcome = session
        .finish_generation(request.ticket, Ok::<_, String>("<div>card</div>".to_string()), Instant::now())
        .unwrap();

    assert!(matches!(outcome, GenerationOutcome::Applied { frame: Some(_) }));
    assert_eq!(session.source(), "<div>card</div>");
    assert_eq!(log.documents(), vec!["<div>card</div>".to_string()]);
    assert!(session.generation_enabled());
}

#[test]
fn test_clear_requires_confirmation() {
    let (mut session, _log) = session_with_log(RefreshPolicy::Auto, "<p>data</p>");
    let now = Instant::now();

    assert!(!session.clear(false, now));
    assert_eq!(session.source(), "<p>data</p>");

    assert!(session.clear(true, now));
    assert_eq!(session.source(), "");
}

#[test]
fn test_committed_revisions_are_monotonic() {
    let (mut session, log) = session_with_log(RefreshPolicy::Auto, "");
    let t0 = Instant::now();

    session.edit("1", t0);
    session.tick(t0 + ms(800));
    session.set_policy(RefreshPolicy::Manual);
    session.edit("2", t0 + ms(900));
    session.run();
    session.set_policy(RefreshPolicy::Auto);
    session.edit("3", t0 + ms(1000));
    session.tick(t0 + ms(1800));

    let frames = log.frames.lock().unwrap();
    let revisions: Vec<u64> = frames.iter().map(|f| f.revision).collect();
    let generations: Vec<u64> = frames.iter().map(|f| f.generation).collect();

    assert_eq!(revisions, vec![1, 2, 3]);
    assert!(generations.windows(2).all(|w| w[0] < w[1]));
}
