//! Test helpers that drive parsed commands against a throwaway data
//! directory.

use super::*;
use crate::commands::execute;
use chrono::NaiveDate;
use rideshare_core::Trip;
use tempfile::TempDir;

/// Date substituted for "today" by every command run through [`Workspace`].
pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

/// A temporary data directory plus the backend flags that point at it.
pub(super) struct Workspace {
    _dir: TempDir,
    data_dir: Utf8PathBuf,
    backend: &'static str,
}

impl Workspace {
    pub(super) fn new(backend: &'static str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let data_dir =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        Self {
            _dir: dir,
            data_dir,
            backend,
        }
    }

    fn global_flags(&self) -> Vec<String> {
        vec![
            "rideshare".to_owned(),
            format!("--{ARG_BACKEND}"),
            self.backend.to_owned(),
            format!("--{ARG_DATA_DIR}"),
            self.data_dir.to_string(),
            format!("--{ARG_SQLITE_PATH}"),
            self.data_dir.join("rideshare.db").to_string(),
        ]
    }

    /// Parse `args` as a command line and run it, returning what it printed.
    pub(super) fn invoke(&self, args: &[&str]) -> Result<String, CliError> {
        let mut argv = self.global_flags();
        argv.extend(args.iter().map(|arg| (*arg).to_owned()));
        let cli = Cli::try_parse_from(argv)?;
        let config = StoreConfig::try_from(cli.store)?;
        let services = open_services(&config)?;
        let mut out = Vec::new();
        execute(&services, cli.command, today(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    /// Services over the same storage the commands write to.
    pub(super) fn services(&self) -> Services {
        let args = StoreArgs {
            backend: Some(self.backend.to_owned()),
            data_dir: Some(self.data_dir.clone()),
            sqlite_path: Some(self.data_dir.join("rideshare.db")),
            ..StoreArgs::default()
        };
        let config = StoreConfig::try_from(args).expect("store config");
        open_services(&config).expect("open services")
    }

    /// Publish the Moscow to Kazan trip and return its identifier.
    pub(super) fn add_trip(&self, organiser: &str) -> Result<String, CliError> {
        self.invoke(&[
            "trip",
            "add",
            "--from",
            "Moscow",
            "--to",
            "Kazan",
            "--date",
            "2025-06-02",
            "--duration-minutes",
            "720",
            "--departure",
            "2025-06-02T08:00:00",
            "--max-passengers",
            "3",
            "--organiser",
            organiser,
        ])
        .map(|printed| printed.trim().to_owned())
    }

    pub(super) fn stored_trip(&self, id: &str) -> Trip {
        self.services()
            .trips
            .get_trip(id)
            .expect("read trip")
            .expect("trip stored")
    }
}
