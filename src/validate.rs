//! Syntactic URL validation.
//!
//! Only checks that a string looks like something we could fetch. Reachability
//! is the fetcher's problem.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(concat!(
        r"(?i)^(?:http|ftp)s?://",
        // dotted hostname with a TLD
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .unwrap();
}

/// Returns `true` when `input` is a plausible `http(s)`/`ftp(s)` URL.
pub fn is_valid_url(input: &str) -> bool {
    !input.is_empty() && URL_PATTERN.is_match(input)
}
