//! Compiled patterns and the note-level field extractors built on them.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::classify::UNKNOWN_DEVICE;
use crate::util::non_blank;

#[expect(clippy::expect_used, reason = "patterns are string literals checked by tests")]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid extraction regex")
}

/// `Dr.` followed by a name made of letters and spaces, on the same line.
static PROVIDER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bDr\.[ \t]*([A-Za-z][A-Za-z \t]*)"));

static PATIENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)Patient\s+Name:[ \t]*([^\r\n]+)"));

static DATE_OF_BIRTH: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)DOB:[ \t]*([^\r\n]+)"));

static DIAGNOSIS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)Diagnosis:[ \t]*([^\r\n]+)"));

pub(crate) static AHI_VALUE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)AHI:\s*(\d+)"));

pub(crate) static FLOW_RATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(\d+(?:\.\d+)?)\s*L(?:iters?)?"));

/// First capture group of `re` in `note`, trimmed; blank captures count as absent.
pub(crate) fn capture(re: &Regex, note: &str) -> Option<String> {
    re.captures(note)
        .and_then(|caps| caps.get(1))
        .and_then(|m| non_blank(m.as_str()))
}

/// Ordering physician, or `"Unknown"` when the note names nobody.
#[must_use]
pub fn ordering_provider(note: &str) -> String {
    if let Some(name) = capture(&PROVIDER, note) {
        debug!("Identified ordering provider: {name}");
        return format!("Dr. {name}");
    }

    warn!("Could not identify ordering provider from note");
    UNKNOWN_DEVICE.to_string()
}

#[must_use]
pub fn patient_name(note: &str) -> Option<String> {
    let name = capture(&PATIENT_NAME, note)?;
    debug!("Identified patient name: {name}");
    Some(name)
}

#[must_use]
pub fn date_of_birth(note: &str) -> Option<String> {
    let dob = capture(&DATE_OF_BIRTH, note)?;
    debug!("Identified date of birth: {dob}");
    Some(dob)
}

#[must_use]
pub fn diagnosis(note: &str) -> Option<String> {
    let diagnosis = capture(&DIAGNOSIS, note)?;
    debug!("Identified diagnosis: {diagnosis}");
    Some(diagnosis)
}
