//! Drops known-noisy ffmpeg diagnostics that slimming triggers routinely.

const NOISE_PATTERNS: &[&str] = &[
    "Invalid Block Addition value",
    "Could not find codec parameters for stream",
    "Consider increasing the value for the 'analyzeduration'",
    "Starting new cluster due to timestamp",
    "Timestamps are unset in a packet",
];

pub fn should_show_message(message: &str) -> bool {
    !NOISE_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}
