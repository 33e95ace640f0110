use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use uploader_core::{ConcurrencyPolicy, ControllerOptions, DisplayPolicy, KeyStrategy};
use uploader_engine::ClientSettings;

use super::logging::LogDestination;

/// Upload files to an object store and print the text extracted from them.
///
/// Files given as arguments are submitted in order. Without arguments, each
/// line read from stdin is a path to submit; a blank line submits the form
/// with no file selected.
#[derive(Parser, Debug)]
#[command(name = "uploader", version)]
pub struct Args {
    /// Configuration document: a local path or an http(s) URL.
    #[arg(long, default_value = "config.json")]
    pub config: String,

    /// How object keys are derived from file names.
    #[arg(long, value_enum, default_value_t = KeyArg::Timestamp)]
    pub key_strategy: KeyArg,

    /// Which completion may overwrite the output.
    #[arg(long, value_enum, default_value_t = DisplayArg::LastResolved)]
    pub display: DisplayArg,

    /// Refuse a new submission while another one is in flight.
    #[arg(long)]
    pub single_flight: bool,

    #[arg(long, value_name = "SECS")]
    pub connect_timeout_secs: Option<u64>,

    #[arg(long, value_name = "SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Files to submit.
    pub files: Vec<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyArg {
    /// `<unix millis>-<file name>`
    Timestamp,
    /// The file name unchanged.
    Original,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayArg {
    LastResolved,
    LatestSubmission,
}

impl Args {
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            key_strategy: match self.key_strategy {
                KeyArg::Timestamp => KeyStrategy::TimestampPrefixed,
                KeyArg::Original => KeyStrategy::OriginalName,
            },
            display_policy: match self.display {
                DisplayArg::LastResolved => DisplayPolicy::LastResolvedWins,
                DisplayArg::LatestSubmission => DisplayPolicy::LatestSubmissionWins,
            },
            concurrency: if self.single_flight {
                ConcurrencyPolicy::SingleFlight
            } else {
                ConcurrencyPolicy::Overlapping
            },
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behaviour() {
        let args = Args::parse_from(["uploader"]);
        assert_eq!(args.config, "config.json");
        assert_eq!(args.controller_options(), ControllerOptions::default());
        assert_eq!(args.client_settings().connect_timeout, None);
        assert_eq!(args.client_settings().request_timeout, None);
        assert!(matches!(args.log_destination(), LogDestination::Terminal));
        assert_eq!(args.log_level(), LevelFilter::Info);
        assert!(args.files.is_empty());
    }

    #[test]
    fn flags_map_to_policies_and_settings() {
        let args = Args::parse_from([
            "uploader",
            "--config",
            "https://site.example.com/config.json",
            "--key-strategy",
            "original",
            "--display",
            "latest-submission",
            "--single-flight",
            "--request-timeout-secs",
            "30",
            "--log-file",
            "uploader.log",
            "-v",
            "a.pdf",
            "b.png",
        ]);

        assert_eq!(
            args.controller_options(),
            ControllerOptions {
                key_strategy: KeyStrategy::OriginalName,
                display_policy: DisplayPolicy::LatestSubmissionWins,
                concurrency: ConcurrencyPolicy::SingleFlight,
            }
        );
        assert_eq!(
            args.client_settings().request_timeout,
            Some(Duration::from_secs(30))
        );
        assert!(matches!(args.log_destination(), LogDestination::Both(_)));
        assert_eq!(args.log_level(), LevelFilter::Debug);
        assert_eq!(
            args.files,
            vec![PathBuf::from("a.pdf"), PathBuf::from("b.png")]
        );
    }

    #[test]
    fn unknown_display_policy_is_rejected() {
        assert!(Args::try_parse_from(["uploader", "--display", "first"]).is_err());
    }
}
