pub mod orchestrator;
pub mod prompts;

pub use orchestrator::{Orchestrator, TurnError};

/// Fixed markers for the prompt-injection scan on submitted code. This is a
/// literal case-insensitive substring check, not a classifier.
const INJECTION_MARKERS: [&str; 4] = [
    "ignore all previous instructions",
    "system bypass",
    "internal prompt",
    "you are now",
];

pub fn contains_injection_marker(code: &str) -> bool {
    let lowered = code.to_lowercase();
    INJECTION_MARKERS.iter().any(|m| lowered.contains(m))
}
