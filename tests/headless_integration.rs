use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use device_query::Keycode;

use pitchlab::app::{App, Effect};
use pitchlab::config::Config;
use pitchlab::dataset;
use pitchlab::error::PlaybackError;
use pitchlab::hotkeys::{GlobalKeys, KeyboardState};
use pitchlab::journal::SessionJournal;
use pitchlab::playback::{PlaybackInvoker, Player};
use pitchlab::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use pitchlab::session::{Phase, PitchResult, PitchType, Session};

// Headless integration: the same Runner/App/PlaybackInvoker wiring as the
// binary, with a recording player and a channel-fed event source.

#[derive(Default)]
struct RecordingPlayer {
    opened: Mutex<Vec<PathBuf>>,
}

impl Player for RecordingPlayer {
    fn open(&self, path: &Path) -> Result<(), PlaybackError> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// System keyboard stand-in: each pushed frame is held for one sample
#[derive(Clone, Default)]
struct SharedKeyboard {
    frames: Arc<Mutex<VecDeque<Vec<Keycode>>>>,
}

impl SharedKeyboard {
    fn hold(&self, keys: &[Keycode]) {
        self.frames.lock().unwrap().push_back(keys.to_vec());
    }
}

impl KeyboardState for SharedKeyboard {
    fn pressed(&self) -> Vec<Keycode> {
        self.frames.lock().unwrap().pop_front().unwrap_or_default()
    }
}

struct Harness {
    app: App,
    runner: Runner<TestEventSource, FixedTicker>,
    invoker: PlaybackInvoker,
    player: Arc<RecordingPlayer>,
}

impl Harness {
    fn new(csv: &str) -> Self {
        let clips = dataset::read_clips(csv.as_bytes(), Path::new("test.csv")).unwrap();
        let app = App::new(Session::new(clips), &Config::default());
        let runner = Runner::new(
            TestEventSource::new(),
            FixedTicker::new(Duration::from_millis(5)),
        );
        let player = Arc::new(RecordingPlayer::default());
        let invoker = PlaybackInvoker::new(player.clone(), Duration::from_millis(1), runner.sender());
        Self {
            app,
            runner,
            invoker,
            player,
        }
    }

    fn press(&self, code: KeyCode) {
        self.runner
            .sender()
            .send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    fn keys(&self, chars: &str) {
        for c in chars.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Drive the loop until `done` holds or a bounded number of steps pass
    fn pump_until(&mut self, done: impl Fn(&App) -> bool) {
        for _ in 0..400u32 {
            if done(&self.app) {
                return;
            }
            match self.app.handle_event(self.runner.step()) {
                Effect::Play(path) => self.invoker.dispatch(path),
                Effect::Quit | Effect::None => {}
            }
        }
        panic!("condition not reached; phase = {:?}", self.app.session.phase());
    }

    /// Play the current clip, wait for the completion event, then label it
    fn label(&mut self, keys: &str) {
        let before = self.app.session.results().len();
        self.press(KeyCode::Enter);
        self.pump_until(|app| app.session.phase() == Phase::Submit);
        self.keys(keys);
        self.press(KeyCode::Enter);
        self.pump_until(|app| app.session.results().len() == before + 1);
    }
}

#[test]
fn duplicate_rows_end_after_two_labels() {
    let mut h = Harness::new("new_name\na.mp4\nb.mp4\na.mp4\n");

    assert_eq!(h.app.session.current().unwrap().name, "a.mp4");
    h.label("19");
    assert!(h.app.session.has_played("a.mp4"));

    assert_eq!(h.app.session.current().unwrap().name, "b.mp4");
    h.label("20");

    h.pump_until(|app| app.session.is_done());
    assert_eq!(h.app.action_button(), ("Done", false));
    assert_eq!(h.app.clip_label(), "All videos played!");

    let results = h.app.session.results();
    assert_eq!(results.len(), 2);
    assert_eq!(
        (results[0].pitch_type, results[0].result),
        (PitchType::Fastball, PitchResult::Strike)
    );
    assert_eq!(
        (results[1].pitch_type, results[1].result),
        (PitchType::Offspeed, PitchResult::Ball)
    );
    assert_eq!(
        *h.player.opened.lock().unwrap(),
        vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]
    );
}

#[test]
fn early_flag_is_latched_per_clip() {
    let mut h = Harness::new("new_name\nx.mp4\ny.mp4\n");

    // Marker pressed twice before playback: latched, not toggled
    h.keys("ss");
    h.label("30");
    h.label("29");

    let results = h.app.session.results();
    assert!(results[0].early);
    assert!(!results[1].early);
}

#[test]
fn incomplete_submit_blocks_until_dismissed_and_completed() {
    let mut h = Harness::new("new_name\nx.mp4\n");

    h.press(KeyCode::Enter);
    h.pump_until(|app| app.session.phase() == Phase::Submit);

    h.keys("2");
    h.press(KeyCode::Enter);
    h.pump_until(|app| app.dialog.is_some());
    assert!(h.app.session.results().is_empty());

    // OK the dialog, finish the selection, submit
    h.press(KeyCode::Enter);
    h.keys("0");
    h.press(KeyCode::Enter);
    h.pump_until(|app| app.session.is_done());
    assert_eq!(h.app.session.results().len(), 1);
    assert!(h.app.dialog.is_none());
}

#[test]
fn session_file_has_one_row_per_submit() {
    let mut h = Harness::new("new_name\nx.mp4\ny.mp4\nz.mp4\n");
    h.label("19");
    h.label("30");

    let dir = tempfile::tempdir().unwrap();
    let journal = SessionJournal::new(dir.path().join("logs"));
    let path = journal
        .write(h.app.session.results(), Local::now())
        .unwrap()
        .expect("results were captured");

    let contents = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "video,pitch_type,result,space_bar");
    assert_eq!(lines[1], "x.mp4,Fastball,Strike,False");
}

#[test]
fn quitting_without_labels_writes_nothing() {
    let mut h = Harness::new("new_name\nx.mp4\n");
    h.press(KeyCode::Char('q'));
    h.pump_until(|app| app.should_quit);

    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let written = SessionJournal::new(&log_dir)
        .write(h.app.session.results(), Local::now())
        .unwrap();
    assert_eq!(written, None);
    assert!(!log_dir.exists());
}

#[test]
fn global_keys_label_a_clip_without_terminal_input() {
    let mut h = Harness::new("new_name\nx.mp4\n");
    let keyboard = SharedKeyboard::default();
    let handle = keyboard.clone();
    let started = GlobalKeys::new(&Config::default().keys).spawn(
        move || Some(handle),
        h.runner.sender(),
        Duration::from_millis(1),
    );
    assert!(started);

    keyboard.hold(&[Keycode::Enter]);
    h.pump_until(|app| app.session.phase() == Phase::Submit);

    keyboard.hold(&[Keycode::S]);
    keyboard.hold(&[Keycode::Key3]);
    keyboard.hold(&[Keycode::Numpad9]);
    keyboard.hold(&[Keycode::Enter]);
    h.pump_until(|app| app.session.is_done());

    let results = h.app.session.results();
    assert_eq!(results.len(), 1);
    assert_eq!(
        (results[0].pitch_type, results[0].result, results[0].early),
        (PitchType::Breaking, PitchResult::Strike, true)
    );
    assert_eq!(*h.player.opened.lock().unwrap(), vec![PathBuf::from("x.mp4")]);
}
