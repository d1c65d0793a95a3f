use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::error::SubmitError;
use crate::keymap::{Action, KeyMap};
use crate::playback;
use crate::runtime::AppEvent;
use crate::session::{Phase, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Warning,
    Error,
}

/// A modal message. While one is open, confirm only dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

/// Side effect the event loop must carry out after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Play(PathBuf),
    Quit,
}

/// View controller: owns the session and everything the screen shows
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub keymap: KeyMap,
    pub dialog: Option<Dialog>,
    pub should_quit: bool,
    pub progress_total: usize,
    pub video_root: Option<PathBuf>,
}

impl App {
    pub fn new(session: Session, config: &Config) -> Self {
        let app = Self {
            session,
            keymap: KeyMap::new(config.keys.clone()),
            dialog: None,
            should_quit: false,
            progress_total: config.progress_total,
            video_root: config.video_root.clone(),
        };
        app.log_current();
        app
    }

    /// Single entry point for everything coming off the event queue
    pub fn handle_event(&mut self, event: AppEvent) -> Effect {
        match event {
            AppEvent::Key(key) => self.handle_key(&key),
            AppEvent::PlaybackFinished(error) => {
                self.on_playback_finished(error);
                Effect::None
            }
            AppEvent::Resize | AppEvent::Tick => Effect::None,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Effect {
        match self.keymap.action_for(key) {
            Some(action) => self.apply(action),
            None => Effect::None,
        }
    }

    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Effect::Quit
            }
            Action::MarkEarly => {
                self.session.mark_early();
                Effect::None
            }
            Action::SelectResult(result) => {
                self.session.select_result(result);
                Effect::None
            }
            Action::SelectPitch(pitch_type) => {
                self.session.select_pitch(pitch_type);
                Effect::None
            }
            Action::Confirm if self.dialog.is_some() => {
                self.dialog = None;
                Effect::None
            }
            Action::Confirm => self.confirm(),
        }
    }

    fn confirm(&mut self) -> Effect {
        match self.session.phase() {
            Phase::Play => match self.session.begin_playback() {
                Some(clip) => Effect::Play(playback::resolve(self.video_root.as_deref(), &clip.name)),
                None => Effect::None,
            },
            Phase::Submit => {
                match self.session.submit() {
                    Ok(record) => {
                        tracing::info!(
                            video = %record.video,
                            pitch_type = %record.pitch_type,
                            result = %record.result,
                            early = record.early,
                            "label submitted"
                        );
                        self.log_current();
                    }
                    Err(e @ SubmitError::Incomplete) => {
                        tracing::debug!("submit rejected: incomplete selection");
                        self.dialog = Some(Dialog {
                            kind: DialogKind::Warning,
                            title: "Incomplete".into(),
                            message: e.to_string(),
                        });
                    }
                    Err(SubmitError::NotReady) => {}
                }
                Effect::None
            }
            Phase::Playing | Phase::Done => Effect::None,
        }
    }

    /// Completion of a playback dispatch, delivered through the event queue
    pub fn on_playback_finished(&mut self, error: Option<String>) {
        if let Some(e) = error {
            self.dialog = Some(Dialog {
                kind: DialogKind::Error,
                title: "Error".into(),
                message: format!("Could not play video: {e}"),
            });
        }
        self.session.finish_playback();
    }

    /// Label and enabled state of the context-dependent action button
    pub fn action_button(&self) -> (&'static str, bool) {
        match self.session.phase() {
            Phase::Play => ("Play Video", true),
            Phase::Playing => ("Playing…", false),
            Phase::Submit => ("Submit (Enter)", true),
            Phase::Done => ("Done", false),
        }
    }

    pub fn progress_label(&self) -> String {
        format!("Played {} / {}", self.session.played_count(), self.progress_total)
    }

    pub fn clip_label(&self) -> String {
        match self.session.current() {
            Some(clip) => format!("Video: {}", clip.name),
            None => "All videos played!".to_string(),
        }
    }

    fn log_current(&self) {
        match self.session.current() {
            Some(clip) => tracing::info!(video = %clip.name, "showing clip"),
            None => tracing::info!(labeled = self.session.results().len(), "all clips played"),
        }
    }
}
