// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! End to end behavior of [`TerminalSession`] against a recording surface.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use task_term::{CommandRecorder, InMemoryTaskStore, KeyOutcome, LifecycleState,
                ListenerKind, MountOutcome, MountTarget, REPLAY_END_MARKER,
                REPLAY_START_MARKER, Session, SessionId, SubmittedCommand, SurfaceCall,
                SurfaceFaults, SurfaceLog, SurfaceMockFactory, TerminalError,
                TerminalProps, TerminalSession, WELCOME_TITLE};

type TestSession = TerminalSession<SurfaceMockFactory, CommandRecorder>;

struct Fixture {
    session: TestSession,
    log: SurfaceLog,
    commands: CommandRecorder,
    store: InMemoryTaskStore,
    props: TerminalProps,
    target: MountTarget,
}

impl Fixture {
    fn new(props: TerminalProps) -> Self {
        let factory = SurfaceMockFactory::default();
        let log = factory.log.clone();
        let commands = CommandRecorder::default();
        Self {
            session: TerminalSession::new(factory, commands.clone()),
            log,
            commands,
            store: InMemoryTaskStore::with_active("t1"),
            props,
            target: MountTarget::new("panel"),
        }
    }

    fn mounted(props: TerminalProps) -> Self {
        let mut it = Self::new(props);
        it.render();
        it
    }

    /// One host render pass.
    fn render(&mut self) {
        self.session
            .update(&self.props, &self.store, Some(&self.target))
            .unwrap();
    }

    fn key(&mut self, code: KeyCode) -> KeyOutcome {
        self.session
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(KeyCode::Char(ch));
        }
    }
}

#[test]
fn test_typing_then_enter_writes_char_blank_line_and_prompt() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.log.clear_calls();

    fixture.key(KeyCode::Char('a'));
    assert_eq!(
        fixture.key(KeyCode::Enter),
        KeyOutcome::Submitted("a".into())
    );

    assert_eq!(
        fixture.log.calls(),
        vec![
            SurfaceCall::Write("a".into()),
            SurfaceCall::Writeln(String::new()),
            SurfaceCall::Write("t1:~$ ".into()),
        ]
    );
    assert_eq!(
        fixture.commands.commands(),
        vec![SubmittedCommand {
            session_id: Some(SessionId::from("t1")),
            line: "a".into(),
        }]
    );
    assert!(fixture.session.line_buffer().is_empty());
}

#[test]
fn test_welcome_banner_has_three_lines() {
    let fixture = Fixture::mounted(
        TerminalProps::new()
            .with_show_welcome(true)
            .with_instance_id("test-instance"),
    );
    let writelns = fixture.log.writelns();
    assert_eq!(writelns.len(), 3);
    let joined = writelns.concat();
    assert!(joined.contains("=== Eigent Terminal ==="));
    assert!(joined.contains("Instance: test-instance"));
    assert!(joined.contains("Ready for commands..."));
}

#[test]
fn test_no_welcome_banner_by_default() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.store.set_active("t2");
    fixture.render();
    assert!(
        fixture
            .log
            .writelns()
            .iter()
            .all(|line| !line.contains(WELCOME_TITLE))
    );
}

#[test]
fn test_welcome_instance_label_defaults() {
    let fixture = Fixture::mounted(TerminalProps::new().with_show_welcome(true));
    assert!(fixture.log.writelns().contains(&"Instance: default".to_string()));
}

/// Starting from "ab" with the cursor at the end, move left then delete: the `a` goes,
/// the `b` shifts left, and the cursor lands at zero.
#[test]
fn test_arrow_left_then_backspace_mid_line() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.type_str("ab");
    fixture.log.clear_calls();

    assert_eq!(fixture.key(KeyCode::Left), KeyOutcome::Edited);
    assert_eq!(fixture.key(KeyCode::Backspace), KeyOutcome::Edited);

    assert_eq!(fixture.session.line_buffer().as_str(), "b");
    assert_eq!(fixture.session.line_buffer().cursor(), 0);
    assert_eq!(
        fixture.log.writes(),
        vec!["\x1b[D".to_string(), "\x08b \x1b[2D".to_string()]
    );
}

#[test]
fn test_backspace_at_start_emits_nothing() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.type_str("a");
    fixture.key(KeyCode::Left);
    fixture.log.clear_calls();

    assert_eq!(fixture.key(KeyCode::Backspace), KeyOutcome::Unchanged);
    assert_eq!(fixture.session.line_buffer().as_str(), "a");
    assert!(fixture.log.calls().is_empty());
}

#[test]
fn test_switch_clears_then_replays_history() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture
        .store
        .insert_session(Session::new("t2").with_history(["Previous command output"]))
        .set_active("t2");
    fixture.log.clear_calls();
    fixture.render();

    assert_eq!(
        fixture.log.calls(),
        vec![
            SurfaceCall::Clear,
            SurfaceCall::Writeln(REPLAY_START_MARKER.into()),
            SurfaceCall::Writeln("Previous command output".into()),
            SurfaceCall::Writeln(REPLAY_END_MARKER.into()),
            SurfaceCall::Write("t2:~$ ".into()),
        ]
    );
    assert_eq!(fixture.session.active_session_id(), Some(&SessionId::from("t2")));
    assert_eq!(fixture.session.state(), LifecycleState::Ready);
}

#[test]
fn test_cleared_active_session_keeps_screen() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    let t1 = SessionId::from("t1");
    fixture.type_str("ls");
    fixture.log.clear_calls();

    fixture.store.clear_active();
    fixture.render();
    assert!(fixture.log.calls().is_empty());
    assert_eq!(fixture.session.active_session_id(), None);
    assert_eq!(fixture.session.state(), LifecycleState::Ready);

    // Output for an inactive session is not drawn.
    fixture.store.push_output(&t1, "build ok");
    fixture.render();
    assert!(fixture.log.calls().is_empty());

    fixture.store.set_active("t1");
    fixture.render();
    assert_eq!(
        fixture.log.calls(),
        vec![
            SurfaceCall::Clear,
            SurfaceCall::Writeln(REPLAY_START_MARKER.into()),
            SurfaceCall::Writeln("build ok".into()),
            SurfaceCall::Writeln(REPLAY_END_MARKER.into()),
            SurfaceCall::Write("t1:~$ ".into()),
        ]
    );
    assert_eq!(fixture.session.active_session_id(), Some(&t1));
    assert!(fixture.session.line_buffer().is_empty());
}

#[test]
fn test_switch_with_welcome_writes_transition_line() {
    let mut fixture = Fixture::mounted(TerminalProps::new().with_show_welcome(true));
    fixture.store.set_active("t2");
    fixture.log.clear_calls();
    fixture.render();

    let output = String::from_utf8(strip_ansi_escapes::strip(fixture.log.output())).unwrap();
    assert!(output.contains("Task switched to: t2"));
    assert_eq!(fixture.log.position(&SurfaceCall::Clear), Some(0));
}

#[test]
fn test_switch_resets_in_progress_line() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.type_str("half typed");
    fixture.store.set_active("t2");
    fixture.render();
    assert!(fixture.session.line_buffer().is_empty());
    assert_eq!(fixture.session.prompt(), "t2:~$ ");
}

#[test]
fn test_switch_to_empty_history_writes_no_markers() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.store.set_active("t2");
    fixture.log.clear_calls();
    fixture.render();
    assert_eq!(
        fixture.log.calls(),
        vec![SurfaceCall::Clear, SurfaceCall::Write("t2:~$ ".into())]
    );
}

#[test]
fn test_control_keys_write_nothing() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    let writes_before = fixture.log.writes().len();

    for (code, modifiers) in [
        (KeyCode::Char('c'), KeyModifiers::CONTROL),
        (KeyCode::Char('v'), KeyModifiers::SUPER),
        (KeyCode::Char('x'), KeyModifiers::ALT),
        (KeyCode::Left, KeyModifiers::CONTROL | KeyModifiers::ALT),
    ] {
        assert_eq!(
            fixture
                .session
                .handle_key_event(KeyEvent::new(code, modifiers)),
            KeyOutcome::Ignored
        );
    }

    assert_eq!(fixture.log.writes().len(), writes_before);
    assert!(fixture.session.line_buffer().is_empty());
}

#[test]
fn test_mount_is_idempotent() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.render();
    fixture.render();
    assert_eq!(
        fixture
            .session
            .mount(&fixture.props, &fixture.store, Some(&fixture.target))
            .unwrap(),
        MountOutcome::AlreadyMounted
    );
    assert_eq!(fixture.log.open_count(), 1);
    assert_eq!(fixture.log.create_count(), 1);
}

#[test]
fn test_rerender_with_unchanged_inputs_is_silent() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.log.clear_calls();
    fixture.render();
    fixture.render();
    assert!(fixture.log.calls().is_empty());
}

#[test]
fn test_mount_order_open_before_resize_listener_and_output() {
    let fixture = Fixture::mounted(TerminalProps::new().with_show_welcome(true));
    let log = &fixture.log;
    let open = log.position(&SurfaceCall::Open("panel".into())).unwrap();
    let key = log
        .position(&SurfaceCall::AttachListener(ListenerKind::Key))
        .unwrap();
    let resize = log
        .position(&SurfaceCall::AttachListener(ListenerKind::Resize))
        .unwrap();
    let first_output = log
        .calls()
        .iter()
        .position(|call| matches!(call, SurfaceCall::Write(_) | SurfaceCall::Writeln(_)))
        .unwrap();
    assert!(key < open);
    assert!(open < resize);
    assert!(open < first_output);
}

#[test]
fn test_initial_session_history_replayed_after_welcome() {
    let mut fixture = Fixture::new(TerminalProps::new().with_show_welcome(true));
    fixture
        .store
        .insert_session(Session::new("t1").with_history(["earlier"]));
    fixture.render();

    let writelns = fixture.log.writelns();
    assert_eq!(
        writelns[3..].to_vec(),
        vec![
            REPLAY_START_MARKER.to_string(),
            "earlier".to_string(),
            REPLAY_END_MARKER.to_string(),
        ]
    );
    assert_eq!(fixture.log.clear_count(), 0);
    assert_eq!(fixture.session.rendered_lines(), 1);
}

#[test]
fn test_live_output_is_appended_above_prompt() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.type_str("ab");
    fixture.key(KeyCode::Left);
    fixture.log.clear_calls();

    fixture
        .store
        .push_output(&SessionId::from("t1"), "line one")
        .push_output(&SessionId::from("t1"), "line two");
    fixture.render();

    assert_eq!(
        fixture.log.calls(),
        vec![
            SurfaceCall::Write("\r\x1b[2K".into()),
            SurfaceCall::Writeln("line one".into()),
            SurfaceCall::Writeln("line two".into()),
            SurfaceCall::Write("\r\x1b[2Kt1:~$ ab\x1b[D".into()),
        ]
    );
    assert_eq!(fixture.session.rendered_lines(), 2);

    // Same history again: nothing more is written.
    fixture.log.clear_calls();
    fixture.render();
    assert!(fixture.log.calls().is_empty());
}

#[test]
fn test_replayed_lines_are_not_written_again_by_live_path() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture
        .store
        .insert_session(Session::new("t2").with_history(["old"]))
        .set_active("t2");
    fixture.render();
    let old_count = fixture
        .log
        .count(|call| *call == SurfaceCall::Writeln("old".into()));
    assert_eq!(old_count, 1);

    fixture.store.push_output(&SessionId::from("t2"), "new");
    fixture.log.clear_calls();
    fixture.render();
    assert_eq!(fixture.log.writelns(), vec!["new".to_string()]);
}

#[test]
fn test_history_shrink_is_clamped() {
    let mut fixture = Fixture::new(TerminalProps::default());
    fixture
        .store
        .insert_session(Session::new("t1").with_history(["a", "b"]));
    fixture.render();
    assert_eq!(fixture.session.rendered_lines(), 2);

    fixture.store.insert_session(Session::new("t1"));
    fixture.log.clear_calls();
    fixture.render();
    assert_eq!(fixture.session.rendered_lines(), 0);
    assert!(fixture.log.calls().is_empty());

    fixture.store.push_output(&SessionId::from("t1"), "fresh");
    fixture.render();
    assert_eq!(fixture.log.writelns(), vec!["fresh".to_string()]);
}

#[test]
fn test_missing_target_is_swallowed_by_update_and_retried() {
    let mut fixture = Fixture::new(TerminalProps::default());
    fixture
        .session
        .update(&fixture.props, &fixture.store, None)
        .unwrap();
    assert_eq!(fixture.session.state(), LifecycleState::Uninitialized);
    assert!(fixture.log.calls().is_empty());

    fixture.render();
    assert_eq!(fixture.session.state(), LifecycleState::Ready);
    assert_eq!(fixture.log.open_count(), 1);
}

#[test]
fn test_create_failure_is_surfaced_and_remount_can_retry() {
    let mut fixture = Fixture::new(TerminalProps::default());
    fixture.log.set_faults(SurfaceFaults {
        fail_create: true,
        ..Default::default()
    });
    let result = fixture
        .session
        .update(&fixture.props, &fixture.store, Some(&fixture.target));
    assert!(matches!(
        result,
        Err(TerminalError::InitializationFailure { .. })
    ));
    assert_eq!(fixture.session.state(), LifecycleState::Uninitialized);
    assert!(fixture.log.calls().is_empty());

    fixture.log.set_faults(SurfaceFaults::default());
    fixture.render();
    assert_eq!(fixture.session.state(), LifecycleState::Ready);
}

#[test]
fn test_keys_before_ready_are_dropped() {
    let mut fixture = Fixture::new(TerminalProps::default());
    assert_eq!(fixture.key(KeyCode::Char('a')), KeyOutcome::NotReady);

    fixture.session.begin_mount(Some(&fixture.target)).unwrap();
    assert_eq!(fixture.key(KeyCode::Char('a')), KeyOutcome::NotReady);
    assert!(fixture.session.line_buffer().is_empty());

    // The next render runs the deferred phase.
    fixture.render();
    assert_eq!(fixture.session.state(), LifecycleState::Ready);
    assert_eq!(fixture.key(KeyCode::Char('a')), KeyOutcome::Edited);
}

#[test]
fn test_unmount_is_idempotent_and_detaches_listeners() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.log.clear_calls();
    fixture.session.unmount();
    fixture.session.unmount();

    let calls = fixture.log.calls();
    assert!(calls.contains(&SurfaceCall::DetachListener(ListenerKind::Key)));
    assert!(calls.contains(&SurfaceCall::DetachListener(ListenerKind::Resize)));
    assert_eq!(fixture.log.dispose_count(), 1);
    assert!(!fixture.session.is_initialized());
    assert_eq!(fixture.key(KeyCode::Char('a')), KeyOutcome::NotReady);
    assert!(!fixture.session.handle_resize());
}

#[test]
fn test_remount_after_unmount_creates_new_surface() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.session.unmount();
    fixture.render();
    assert_eq!(fixture.log.create_count(), 2);
    assert_eq!(fixture.log.open_count(), 2);
}

#[test]
fn test_resize_fits_only_when_ready() {
    let mut fixture = Fixture::new(TerminalProps::default());
    assert!(!fixture.session.handle_resize());

    fixture.render();
    let fits_after_mount = fixture.log.fit_count();
    assert!(fixture.session.handle_resize());
    assert_eq!(fixture.log.fit_count(), fits_after_mount + 1);
}

#[test]
fn test_switch_write_failure_still_records_new_session() {
    let mut fixture = Fixture::mounted(TerminalProps::default());
    fixture.store.set_active("t2");
    fixture.log.set_faults(SurfaceFaults {
        fail_write: true,
        ..Default::default()
    });
    let result = fixture
        .session
        .update(&fixture.props, &fixture.store, Some(&fixture.target));
    assert!(matches!(result, Err(TerminalError::Surface { .. })));
    assert_eq!(fixture.session.active_session_id(), Some(&SessionId::from("t2")));
    assert_eq!(fixture.session.state(), LifecycleState::Ready);

    fixture.log.set_faults(SurfaceFaults::default());
    fixture.log.clear_calls();
    fixture.render();
    assert!(fixture.log.calls().is_empty());
}

#[test]
fn test_fixed_prompt_label_survives_switch() {
    let mut fixture = Fixture::mounted(TerminalProps::new().with_prompt_label("eigent"));
    assert_eq!(fixture.session.prompt(), "eigent:~$ ");
    fixture.store.set_active("t2");
    fixture.render();
    assert_eq!(fixture.session.prompt(), "eigent:~$ ");
}
