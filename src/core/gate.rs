//! Version targeting for configuration updates.

/// Tokens meaning "apply to every running version". Both spellings occur
/// in deployed config services.
pub(crate) const WILDCARD_TOKENS: [&str; 2] = ["*", "all"];

/// How an update's target version relates to the running instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VersionDecision {
    /// Target equals the running version exactly.
    Exact,
    /// Target is a wildcard token.
    AllVersions,
    /// No target was given. Current policy applies the update anyway,
    /// with a warning.
    Unspecified,
    /// Target names some other version; the update is not for us.
    Mismatch,
}

/// Compare an update's target version against the running instance's.
pub(crate) fn evaluate(target: Option<&str>, running: &str) -> VersionDecision {
    match target {
        None => VersionDecision::Unspecified,
        Some(t) if t == running => VersionDecision::Exact,
        Some(t) if WILDCARD_TOKENS.contains(&t) => VersionDecision::AllVersions,
        Some(_) => VersionDecision::Mismatch,
    }
}
