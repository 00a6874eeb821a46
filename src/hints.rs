//! Remediation hints for classifiable upstream failures.

/// Status codes and the hint shown when the upstream answers with one of them.
/// Extend by adding rows.
pub const STATUS_HINTS: &[(&[u16], &str)] = &[
    (
        &[404],
        "Workflow not found. Make sure your workflow is published in Agent Builder and the ID is correct.",
    ),
    (
        &[401, 403],
        "Authentication failed. Make sure your API key is from the same project as your workflow.",
    ),
];

/// Hint for an upstream status, or `None` when the code is not classified.
pub fn hint_for(status: u16) -> Option<&'static str> {
    STATUS_HINTS
        .iter()
        .find(|(codes, _)| codes.contains(&status))
        .map(|(_, hint)| *hint)
}
