//! Translation of human-readable API advisories into benign/fatal outcomes.
//!
//! The API reports problems as free text in `messages`. Matching on that text
//! couples the client to the upstream wording; all of that coupling lives in
//! the allow-list below and nowhere else.

#![allow(clippy::expect_used)] // Patterns are compile-time constants

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::domain::error::JiffyError;
use crate::domain::jiffybox::ApiMessage;

/// Which call produced the advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryContext {
    Create,
    Stop,
    Transition,
    Delete,
}

/// Outcome of classifying a single advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    Benign,
    Fatal,
}

fn pattern(p: &str) -> Regex {
    RegexBuilder::new(p)
        .case_insensitive(true)
        .build()
        .expect("valid advisory pattern")
}

static CREATE_BENIGN: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![pattern(r"network\s+configuration")]);

static STOP_BENIGN: LazyLock<Vec<Regex>> = LazyLock::new(|| vec![pattern(r"already\s+stopped")]);

fn allow_list(context: AdvisoryContext) -> &'static [Regex] {
    match context {
        AdvisoryContext::Create => &CREATE_BENIGN,
        AdvisoryContext::Stop => &STOP_BENIGN,
        AdvisoryContext::Transition | AdvisoryContext::Delete => &[],
    }
}

/// Classify one advisory text for the given call.
#[must_use]
pub fn classify(context: AdvisoryContext, message: &str) -> Advisory {
    if allow_list(context).iter().any(|re| re.is_match(message)) {
        Advisory::Benign
    } else {
        Advisory::Fatal
    }
}

/// Check every advisory of a reply, returning the benign ones.
///
/// # Errors
///
/// Returns `JiffyError::UnexpectedResponse` carrying the first fatal advisory.
pub fn check_messages(
    context: AdvisoryContext,
    messages: &[ApiMessage],
) -> Result<Vec<String>, JiffyError> {
    let mut benign = Vec::new();
    for m in messages {
        match classify(context, &m.message) {
            Advisory::Benign => benign.push(m.message.clone()),
            Advisory::Fatal => return Err(JiffyError::UnexpectedResponse(m.message.clone())),
        }
    }
    Ok(benign)
}
