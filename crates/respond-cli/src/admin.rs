// crates/respond-cli/src/admin.rs
// ============================================================================
// Module: Respond Admin Gate
// Description: Hostmask parsing and administrator checks.
// Purpose: Restrict mutating commands and listing to configured admins.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Callers are identified by an IRC-style hostmask `nick!user@host`. An admin
//! entry containing `!` must equal the full mask; any other entry is compared
//! against the host part, case-insensitively. The `no_admin` flag lets every
//! caller through.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Hostmask
// ============================================================================

/// Parsed `nick!user@host` caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostmask {
    /// Nickname.
    pub nick: String,
    /// User (ident) part.
    pub user: String,
    /// Host part.
    pub host: String,
}

impl Hostmask {
    /// Parses a hostmask, returning `None` when any part is missing.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (nick, rest) = raw.split_once('!')?;
        let (user, host) = rest.split_once('@')?;
        if nick.is_empty() || user.is_empty() || host.is_empty() {
            return None;
        }
        Some(Self { nick: nick.to_string(), user: user.to_string(), host: host.to_string() })
    }
}

// ============================================================================
// SECTION: Admin Gate
// ============================================================================

/// Rejection returned for non-admin callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Permission denied. This command requires administrator privileges.")]
pub struct PermissionDenied;

/// Decides whether a caller may run admin-only commands.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    /// Admits everyone when set.
    no_admin: bool,
    /// Hosts or full hostmasks treated as admin.
    admins: Vec<String>,
}

impl AdminGate {
    /// Creates a gate from the configured flag and admin list.
    #[must_use]
    pub const fn new(no_admin: bool, admins: Vec<String>) -> Self {
        Self { no_admin, admins }
    }

    /// Returns true when the caller is an administrator.
    #[must_use]
    pub fn is_admin(&self, hostmask: Option<&str>) -> bool {
        if self.no_admin {
            return true;
        }
        let Some(mask) = hostmask.and_then(Hostmask::parse) else {
            return false;
        };
        self.admins.iter().any(|entry| {
            if entry.contains('!') {
                Hostmask::parse(entry).is_some_and(|admin| admin == mask)
            } else {
                entry.eq_ignore_ascii_case(&mask.host)
            }
        })
    }

    /// Fails with [`PermissionDenied`] unless the caller is an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionDenied`] for non-admin callers.
    pub fn authorize(&self, hostmask: Option<&str>) -> Result<(), PermissionDenied> {
        if self.is_admin(hostmask) { Ok(()) } else { Err(PermissionDenied) }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use unwraps for clarity.")]

    use super::*;

    #[test]
    fn parse_splits_parts() {
        let mask = Hostmask::parse("nick!ident@host.example").unwrap();
        assert_eq!(mask.nick, "nick");
        assert_eq!(mask.user, "ident");
        assert_eq!(mask.host, "host.example");
    }

    #[test]
    fn parse_rejects_partial_masks() {
        assert!(Hostmask::parse("nick").is_none());
        assert!(Hostmask::parse("nick!ident").is_none());
        assert!(Hostmask::parse("!ident@host").is_none());
        assert!(Hostmask::parse("nick!@host").is_none());
    }

    #[test]
    fn host_entry_matches_any_nick() {
        let gate = AdminGate::new(false, vec!["Ops.Example".to_string()]);
        assert!(gate.is_admin(Some("alice!a@ops.example")));
        assert!(gate.is_admin(Some("bob!b@OPS.EXAMPLE")));
        assert!(!gate.is_admin(Some("eve!e@elsewhere")));
    }

    #[test]
    fn full_mask_entry_requires_exact_match() {
        let gate = AdminGate::new(false, vec!["alice!a@ops.example".to_string()]);
        assert!(gate.is_admin(Some("alice!a@ops.example")));
        assert!(!gate.is_admin(Some("mallory!a@ops.example")));
    }

    #[test]
    fn missing_or_malformed_mask_is_denied() {
        let gate = AdminGate::new(false, vec!["ops.example".to_string()]);
        assert_eq!(gate.authorize(None), Err(PermissionDenied));
        assert_eq!(gate.authorize(Some("ops.example")), Err(PermissionDenied));
    }

    #[test]
    fn no_admin_admits_everyone() {
        let gate = AdminGate::new(true, Vec::new());
        assert!(gate.authorize(None).is_ok());
    }
}
