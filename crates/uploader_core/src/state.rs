use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, ConfigStatus, SubmissionRowView};
use crate::{ConfigState, KeyStrategy, RemoteConfig};

pub type SubmissionId = u64;

/// Progress of an in-flight submission. Finished submissions leave the
/// tracked set and are only counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Uploading,
    Uploaded,
    Extracting,
}

/// Which completion is allowed to write the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPolicy {
    /// Every completion overwrites the output; the last one to resolve wins.
    #[default]
    LastResolvedWins,
    /// Completions from a submission older than the one on display are dropped.
    LatestSubmissionWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    /// Submissions may overlap freely.
    #[default]
    Overlapping,
    /// A submission is refused while another one is in flight.
    SingleFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerOptions {
    pub key_strategy: KeyStrategy,
    pub display_policy: DisplayPolicy,
    pub concurrency: ConcurrencyPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Submission {
    pub(crate) file_name: String,
    pub(crate) object_key: String,
    pub(crate) stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct OutputElement {
    pub(crate) text: Option<String>,
    pub(crate) owner: Option<SubmissionId>,
    pub(crate) revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: ConfigState,
    options: ControllerOptions,
    next_submission_id: SubmissionId,
    submissions: BTreeMap<SubmissionId, Submission>,
    done: usize,
    failed: usize,
    output: OutputElement,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ControllerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    pub fn in_flight(&self) -> usize {
        self.submissions.len()
    }

    pub fn view(&self) -> AppViewModel {
        let config = match &self.config {
            ConfigState::NotLoaded => ConfigStatus::NotLoaded,
            ConfigState::Loaded(_) => ConfigStatus::Loaded,
            ConfigState::Failed(_) => ConfigStatus::Failed,
        };
        let submissions = self
            .submissions
            .iter()
            .map(|(id, submission)| SubmissionRowView {
                id: *id,
                file_name: submission.file_name.clone(),
                object_key: submission.object_key.clone(),
                stage: submission.stage,
            })
            .collect();

        AppViewModel {
            config,
            output: self.output.text.clone(),
            output_revision: self.output.revision,
            in_flight: self.in_flight(),
            submissions,
            done: self.done,
            failed: self.failed,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Stores the configuration unless one was already loaded.
    pub(crate) fn set_config(&mut self, config: RemoteConfig) -> bool {
        if self.config.loaded().is_some() {
            return false;
        }
        self.config = ConfigState::Loaded(config);
        self.mark_dirty();
        true
    }

    pub(crate) fn fail_config(&mut self, reason: String) -> bool {
        if self.config.loaded().is_some() {
            return false;
        }
        self.config = ConfigState::Failed(reason);
        self.mark_dirty();
        true
    }

    pub(crate) fn open_submission(&mut self, file_name: &str, object_key: &str) -> SubmissionId {
        self.next_submission_id += 1;
        let id = self.next_submission_id;
        self.submissions.insert(
            id,
            Submission {
                file_name: file_name.to_string(),
                object_key: object_key.to_string(),
                stage: Stage::Uploading,
            },
        );
        self.mark_dirty();
        id
    }

    pub(crate) fn submission(&self, id: SubmissionId) -> Option<&Submission> {
        self.submissions.get(&id)
    }

    /// Moves a submission forward; regressions are ignored. Returns whether
    /// the stage changed.
    pub(crate) fn advance(&mut self, id: SubmissionId, stage: Stage) -> bool {
        let Some(submission) = self.submissions.get_mut(&id) else {
            return false;
        };
        if stage <= submission.stage {
            return false;
        }
        submission.stage = stage;
        self.dirty = true;
        true
    }

    pub(crate) fn complete(&mut self, id: SubmissionId) {
        if self.submissions.remove(&id).is_some() {
            self.done += 1;
            self.dirty = true;
        }
    }

    pub(crate) fn fail(&mut self, id: SubmissionId) {
        if self.submissions.remove(&id).is_some() {
            self.failed += 1;
            self.dirty = true;
        }
    }

    /// Replaces the output with `text` if the display policy lets `id` write.
    pub(crate) fn render_output(&mut self, id: SubmissionId, text: String) -> bool {
        if self.options.display_policy == DisplayPolicy::LatestSubmissionWins
            && self.output.owner.is_some_and(|owner| owner > id)
        {
            return false;
        }
        self.output.text = Some(text);
        self.output.owner = Some(id);
        self.output.revision += 1;
        self.dirty = true;
        true
    }
}
