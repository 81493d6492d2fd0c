// ── UI feedback seam ──
//
// The real renderer shows a one-line status footer and modal dialogs.
// The engine only ever talks to this trait.

/// Progress and notice sink for a check/apply pass.
pub trait Feedback {
    /// One-line progress message (footer text).
    fn status(&mut self, message: &str);

    /// Non-blocking informational dialog.
    fn notice(&mut self, title: &str, body: &str);
}

/// Discards all feedback. Default for tests and non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn status(&mut self, _message: &str) {}

    fn notice(&mut self, _title: &str, _body: &str) {}
}
