use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use uploader_core::{FileBody, Msg, SelectedFile};
use uploader_logging::{uploader_info, uploader_warn};

use super::app::LoopEvent;

/// Builds the form's file selection from a path.
///
/// Anything that is not a regular file counts as "no file selected".
pub fn selected_file(path: &Path) -> Option<SelectedFile> {
    if !path.is_file() {
        uploader_warn!("{:?} is not a readable file; treating as no selection", path);
        return None;
    }
    let name = path.file_name()?.to_string_lossy().into_owned();
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    Some(SelectedFile {
        name,
        content_type,
        body: FileBody::OnDisk(path.to_path_buf()),
    })
}

/// A blank line submits the form with nothing selected.
pub fn selection_from_line(line: &str) -> Option<SelectedFile> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    selected_file(Path::new(trimmed))
}

fn form_submitted(file: Option<SelectedFile>) -> LoopEvent {
    LoopEvent::Core(Msg::FormSubmitted {
        file,
        submitted_at_ms: Utc::now().timestamp_millis(),
    })
}

/// Starts feeding submissions into the loop: `files` in order, or stdin lines when empty.
pub fn spawn_source(files: Vec<PathBuf>, tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        if files.is_empty() {
            uploader_info!("Reading file paths from stdin");
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        uploader_warn!("Failed to read stdin: {}", err);
                        break;
                    }
                };
                if tx.send(form_submitted(selection_from_line(&line))).is_err() {
                    return;
                }
            }
        } else {
            for path in files {
                if tx.send(form_submitted(selected_file(&path))).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(LoopEvent::InputClosed);
    });
}
