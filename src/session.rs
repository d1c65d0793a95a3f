use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::dataset::ClipRecord;
use crate::error::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum PitchType {
    Fastball,
    Offspeed,
    Breaking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum PitchResult {
    Strike,
    Ball,
}

/// Where the current clip is in its play/submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Clip shown, waiting for the operator to start playback
    Play,
    /// Playback dispatched, waiting for the completion event
    Playing,
    /// Playback done, waiting for a complete selection
    Submit,
    /// Queue exhausted
    Done,
}

/// The operator's not-yet-committed judgment for the current clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSelection {
    pub pitch_type: Option<PitchType>,
    pub result: Option<PitchResult>,
}

impl PendingSelection {
    pub fn is_complete(&self) -> bool {
        self.pitch_type.is_some() && self.result.is_some()
    }
}

/// One committed label, in the column order of the session file.
///
/// Column names and `True`/`False` flags match the log files downstream
/// analysis already reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub video: String,
    pub pitch_type: PitchType,
    pub result: PitchResult,
    #[serde(rename = "space_bar", serialize_with = "serialize_flag")]
    pub early: bool,
}

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *flag { "True" } else { "False" })
}

/// All state of one labeling run.
///
/// Every mutation goes through `&mut self`, and the UI loop owns the only
/// instance, so the played set and results can never disagree.
#[derive(Debug)]
pub struct Session {
    queue: Vec<ClipRecord>,
    cursor: usize,
    played: HashSet<String>,
    results: Vec<ResultRecord>,
    pending: PendingSelection,
    early: bool,
    phase: Phase,
}

impl Session {
    /// Start a session over an already-shuffled queue
    pub fn new(queue: Vec<ClipRecord>) -> Self {
        let mut session = Self {
            queue,
            cursor: 0,
            played: HashSet::new(),
            results: Vec::new(),
            pending: PendingSelection::default(),
            early: false,
            phase: Phase::Play,
        };
        session.show_next();
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// The clip under the cursor, or None once the queue is exhausted
    pub fn current(&self) -> Option<&ClipRecord> {
        match self.phase {
            Phase::Done => None,
            _ => self.queue.get(self.cursor),
        }
    }

    pub fn pending(&self) -> PendingSelection {
        self.pending
    }

    pub fn early(&self) -> bool {
        self.early
    }

    pub fn played_count(&self) -> usize {
        self.played.len()
    }

    pub fn has_played(&self, name: &str) -> bool {
        self.played.contains(name)
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn mark_early(&mut self) {
        if !self.is_done() {
            self.early = true;
        }
    }

    pub fn select_pitch(&mut self, pitch_type: PitchType) {
        if !self.is_done() {
            self.pending.pitch_type = Some(pitch_type);
        }
    }

    pub fn select_result(&mut self, result: PitchResult) {
        if !self.is_done() {
            self.pending.result = Some(result);
        }
    }

    /// PLAY -> PLAYING. Returns the clip to hand to the player, or None if
    /// the session is not waiting for playback.
    pub fn begin_playback(&mut self) -> Option<&ClipRecord> {
        if self.phase != Phase::Play {
            return None;
        }
        self.phase = Phase::Playing;
        self.queue.get(self.cursor)
    }

    /// PLAYING -> SUBMIT. Stale completions in any other phase are ignored.
    pub fn finish_playback(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Submit;
        }
    }

    /// Commit the pending selection for the current clip and move on
    pub fn submit(&mut self) -> Result<&ResultRecord, SubmitError> {
        if self.phase != Phase::Submit {
            return Err(SubmitError::NotReady);
        }
        let (Some(pitch_type), Some(result)) = (self.pending.pitch_type, self.pending.result)
        else {
            return Err(SubmitError::Incomplete);
        };
        let video = self.queue[self.cursor].name.clone();

        self.played.insert(video.clone());
        self.results.push(ResultRecord {
            video,
            pitch_type,
            result,
            early: self.early,
        });
        self.cursor += 1;
        self.show_next();

        Ok(&self.results[self.results.len() - 1])
    }

    fn show_next(&mut self) {
        self.early = false;
        self.pending = PendingSelection::default();

        while self
            .queue
            .get(self.cursor)
            .is_some_and(|clip| self.played.contains(&clip.name))
        {
            self.cursor += 1;
        }

        self.phase = if self.cursor < self.queue.len() {
            Phase::Play
        } else {
            Phase::Done
        };
    }
}
