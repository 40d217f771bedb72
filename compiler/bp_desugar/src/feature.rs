//! Feature identity and the collaborator interfaces around the rewriter.
//!
//! Three things live outside this crate and are only described here:
//! - a **gate** that decides whether the target environment needs the
//!   rewrite at all (it reads [`Feature::min_supported_version`]);
//! - a **usage tracker** told about every rewritten statement;
//! - a **shim loader** told that the rewritten program needs runtime support
//!   (`NoMatchingPatternError`, `deconstruct`, `deconstruct_keys`).

use std::fmt;

use bp_ir::Span;

/// Language version triple, ordered lexicographically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse `"2.7"` or `"2.7.1"`. Missing components default to zero.
    pub fn parse(text: &str) -> Option<Version> {
        let mut parts = text.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(part) => part.parse().ok()?,
            None => 0,
        };
        let patch = match parts.next() {
            Some(part) => part.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Version::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Language features this crate can rewrite.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `case/in`, `expr in pattern`, `expr => pattern`.
    PatternMatching,
}

impl Feature {
    /// Stable identifier reported to collaborators.
    pub const fn name(self) -> &'static str {
        match self {
            Feature::PatternMatching => "pattern-matching",
        }
    }

    /// First language version with native support. Targets at or above it
    /// do not need the rewrite.
    pub const fn min_supported_version(self) -> Version {
        match self {
            Feature::PatternMatching => Version::new(2, 7, 0),
        }
    }

    /// Whether `target` already supports the feature natively.
    pub fn is_native(self, target: Version) -> bool {
        target >= self.min_supported_version()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outbound, fire-and-forget notifications.
///
/// Both methods are called once per rewritten statement, after its output
/// tree is complete. A statement that fails with a structural error
/// produces no notification.
pub trait Collaborators {
    /// A statement using `feature` was rewritten.
    fn statement_rewritten(&mut self, _feature: Feature, _span: Span) {}

    /// The rewritten program needs runtime support for `feature`.
    fn runtime_support_required(&mut self, _feature: Feature) {}
}

/// Collaborators that ignore every notification.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopCollaborators;

impl Collaborators for NoopCollaborators {}

#[cfg(test)]
mod tests;
