//! Fixture loading shared by the integration tests.

use std::{fs, path::PathBuf};

use serde::Deserialize;
use stringwise_cli::{Job, Project, Report};
use stringwise_components::{CatalogRecord, ErrorKind, SizingError};

/// A project file plus what the engine is expected to make of it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub project: Project,
    #[serde(default)]
    pub expect: Expectation,
}

/// Expected values; unset fields are not checked.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectation {
    pub modules_per_string: Option<u32>,
    pub total_modules: Option<u32>,
    pub total_string_count: Option<u32>,
    pub strings_per_dcdb: Option<u32>,
    pub is_valid: Option<bool>,
    pub error: Option<ExpectedError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedError {
    MalformedInput,
    InvalidConfiguration,
}

impl From<ErrorKind> for ExpectedError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::MalformedInput => Self::MalformedInput,
            ErrorKind::InvalidConfiguration => Self::InvalidConfiguration,
        }
    }
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Loads `fixtures/<name>` as a TOML fixture.
///
/// # Panics
///
/// Panics if the file is missing or malformed.
#[must_use]
pub fn fixture(name: &str) -> Fixture {
    let text = fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|err| panic!("cannot read fixture {name}: {err}"));
    toml::from_str(&text).unwrap_or_else(|err| panic!("cannot parse fixture {name}: {err}"))
}

/// Loads `fixtures/<name>` as a JSON catalog record.
///
/// # Panics
///
/// Panics if the file is missing or malformed.
#[must_use]
pub fn catalog_record(name: &str) -> CatalogRecord {
    let text = fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|err| panic!("cannot read record {name}: {err}"));
    serde_json::from_str(&text).unwrap_or_else(|err| panic!("cannot parse record {name}: {err}"))
}

impl Fixture {
    /// The validated engine job.
    ///
    /// # Panics
    ///
    /// Panics if the project section is out of range.
    #[must_use]
    pub fn job(&self) -> Job {
        self.project
            .job()
            .unwrap_or_else(|err| panic!("fixture project is invalid: {err}"))
    }

    /// Runs the fixture and asserts every expectation it sets.
    ///
    /// # Panics
    ///
    /// Panics when an expectation is not met.
    pub fn run_and_check(&self) -> Result<Report, SizingError> {
        let outcome = stringwise_cli::run(self.job());

        match (&outcome, self.expect.error) {
            (Err(err), Some(expected)) => {
                assert_eq!(ExpectedError::from(err.kind()), expected, "{err}");
            }
            (Err(err), None) => panic!("unexpected error: {err}"),
            (Ok(_), Some(expected)) => panic!("expected {expected:?}, got a report"),
            (Ok(report), None) => self.expect.check(report),
        }

        outcome
    }
}

impl Expectation {
    fn check(&self, report: &Report) {
        let strings = match report {
            Report::Strings(strings) => strings,
            Report::Central(central) => &central.strings,
        };
        if let Some(n) = self.modules_per_string {
            assert_eq!(strings.modules_per_string.get(), n, "modules_per_string");
        }
        if let Some(n) = self.total_modules {
            assert_eq!(strings.total_modules, n, "total_modules");
        }
        if let Some(n) = self.total_string_count {
            assert_eq!(strings.total_string_count, n, "total_string_count");
        }

        if self.strings_per_dcdb.is_none() && self.is_valid.is_none() {
            return;
        }
        let Report::Central(central) = report else {
            panic!("expected a central-inverter report");
        };
        if let Some(n) = self.strings_per_dcdb {
            assert_eq!(central.allocation.strings_per_dcdb, n, "strings_per_dcdb");
        }
        if let Some(valid) = self.is_valid {
            assert_eq!(central.is_valid(), valid, "is_valid");
        }
    }
}
