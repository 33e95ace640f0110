use crate::effect::{
    BUSY_ALERT, CONFIG_FAILED_ALERT, CONFIG_PENDING_ALERT, GENERIC_FAILURE_ALERT, NO_FILE_ALERT,
};
use crate::{
    derive_object_key, extract_url, upload_url, AppState, ConcurrencyPolicy, ConfigState, Effect,
    Msg, SelectedFile, Stage, SubmissionId, NO_TEXT_PLACEHOLDER,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ConfigLoaded(config) => {
            // Written once; a second document is ignored.
            state.set_config(config);
            Vec::new()
        }
        Msg::ConfigLoadFailed(reason) => {
            if state.fail_config(reason.clone()) {
                vec![Effect::alert_with(CONFIG_FAILED_ALERT, reason)]
            } else {
                Vec::new()
            }
        }
        Msg::FormSubmitted {
            file,
            submitted_at_ms,
        } => submit(&mut state, file, submitted_at_ms),
        Msg::SubmissionProgress { id, stage } => {
            state.advance(id, stage);
            Vec::new()
        }
        Msg::UploadFinished { id, result } => upload_finished(&mut state, id, result),
        Msg::ExtractionFinished { id, result } => extraction_finished(&mut state, id, result),
    };

    (state, effects)
}

fn submit(state: &mut AppState, file: Option<SelectedFile>, submitted_at_ms: i64) -> Vec<Effect> {
    let config = match state.config() {
        ConfigState::Loaded(config) => config.clone(),
        ConfigState::NotLoaded => return vec![Effect::alert(CONFIG_PENDING_ALERT)],
        ConfigState::Failed(_) => return vec![Effect::alert(CONFIG_FAILED_ALERT)],
    };
    let Some(file) = file else {
        return vec![Effect::alert(NO_FILE_ALERT)];
    };
    if state.options().concurrency == ConcurrencyPolicy::SingleFlight && state.in_flight() > 0 {
        return vec![Effect::alert(BUSY_ALERT)];
    }

    let object_key = derive_object_key(state.options().key_strategy, &file.name, submitted_at_ms);
    let id = state.open_submission(&file.name, &object_key);
    match upload_url(&config.store_base_url, &object_key) {
        Ok(url) => vec![Effect::Upload {
            id,
            url,
            object_key,
            file,
        }],
        Err(err) => {
            let detail = format!("submission {id}: {err}");
            state.fail(id);
            vec![Effect::alert_with(GENERIC_FAILURE_ALERT, detail)]
        }
    }
}

fn upload_finished(
    state: &mut AppState,
    id: SubmissionId,
    result: Result<(), String>,
) -> Vec<Effect> {
    let Some(submission) = state.submission(id) else {
        return Vec::new();
    };
    if submission.stage != Stage::Uploading {
        return Vec::new();
    }
    let object_key = submission.object_key.clone();

    if let Err(reason) = result {
        let detail = format!("submission {id}: upload failed: {reason}");
        state.fail(id);
        return vec![Effect::alert_with(GENERIC_FAILURE_ALERT, detail)];
    }

    state.advance(id, Stage::Uploaded);
    let api_base = match state.config().loaded() {
        Some(config) => config.api_base_url.clone(),
        None => return Vec::new(),
    };
    match extract_url(&api_base, &object_key) {
        Ok(url) => vec![Effect::Extract { id, url }],
        Err(err) => {
            let detail = format!("submission {id}: {err}");
            state.fail(id);
            vec![Effect::alert_with(GENERIC_FAILURE_ALERT, detail)]
        }
    }
}

fn extraction_finished(
    state: &mut AppState,
    id: SubmissionId,
    result: Result<Option<String>, String>,
) -> Vec<Effect> {
    let awaiting = state
        .submission(id)
        .is_some_and(|submission| matches!(submission.stage, Stage::Uploaded | Stage::Extracting));
    if !awaiting {
        return Vec::new();
    }

    match result {
        Ok(text) => {
            state.complete(id);
            let text = text
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| NO_TEXT_PLACEHOLDER.to_string());
            state.render_output(id, text);
            Vec::new()
        }
        Err(reason) => {
            let detail = format!("submission {id}: extraction failed: {reason}");
            state.fail(id);
            vec![Effect::alert_with(GENERIC_FAILURE_ALERT, detail)]
        }
    }
}
