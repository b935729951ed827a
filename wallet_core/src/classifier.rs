//! Identifier classification.
//!
//! The two predicates overlap: every `@handle` is also a domain name. Callers walk
//! [`RESOLUTION_ORDER`] instead of testing the predicates independently, so the
//! naming service is always asked before the social-handle path is taken.

/// Suffix of names served by the naming service.
pub const DOMAIN_SUFFIX: &str = ".id.dvita.com";

/// Identifier classes in the order resolution tries them.
pub const RESOLUTION_ORDER: [IdentifierClass; 3] = [
    IdentifierClass::DomainName,
    IdentifierClass::SocialHandle,
    IdentifierClass::RawAddress,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierClass {
    /// Resolved through the naming service.
    DomainName,
    /// Balance looked up through the proxy ledger; never yields an account.
    SocialHandle,
    /// Parsed directly as an account.
    RawAddress,
}

impl IdentifierClass {
    pub fn matches(&self, input: &str) -> bool {
        match self {
            Self::DomainName => is_domain_name(input),
            Self::SocialHandle => is_social_handle(input),
            Self::RawAddress => !input.trim().is_empty(),
        }
    }
}

/// Matches `^[A-Za-z0-9_.-]*\.id\.dvita\.com$`, anything starting with `@`, or
/// anything containing both `@` and `.` (e-mail style names).
pub fn is_domain_name(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }
    let suffixed = input.ends_with(DOMAIN_SUFFIX)
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    suffixed || input.starts_with('@') || (input.contains('@') && input.contains('.'))
}

pub fn is_social_handle(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }
    input.starts_with('@')
}

/// First class in [`RESOLUTION_ORDER`] that accepts `input`.
pub fn classify(input: &str) -> Option<IdentifierClass> {
    RESOLUTION_ORDER.into_iter().find(|class| class.matches(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_names_are_domains() {
        assert!(is_domain_name("alice.id.dvita.com"));
        assert!(is_domain_name("a_b-c.d.id.dvita.com"));
        assert!(is_domain_name(".id.dvita.com"));
        assert!(!is_domain_name("alice.com"));
        assert!(!is_domain_name("alice id.dvita.com"));
        assert!(!is_domain_name("alice.id.dvita.com.evil"));
    }

    #[test]
    fn email_style_names_are_domains() {
        assert!(is_domain_name("a@b.com"));
        assert!(is_domain_name("user.name@example"));
        assert!(!is_domain_name("a@b"));
    }

    #[test]
    fn handles_are_both_classes() {
        assert!(is_domain_name("@alice"));
        assert!(is_social_handle("@alice"));
        assert_eq!(classify("@alice"), Some(IdentifierClass::DomainName));
    }

    #[test]
    fn blank_input_fails_closed() {
        for blank in ["", " ", "\t\n"] {
            assert!(!is_domain_name(blank));
            assert!(!is_social_handle(blank));
            assert_eq!(classify(blank), None);
        }
    }

    #[test]
    fn plain_strings_fall_through_to_raw_address() {
        assert_eq!(
            classify("NVhCWHzmB4pRKsLzaBSyU4uxddgsvUsX9V"),
            Some(IdentifierClass::RawAddress)
        );
        assert!(!is_social_handle("alice"));
    }

    #[test]
    fn order_is_domain_then_handle_then_raw() {
        assert_eq!(
            RESOLUTION_ORDER,
            [
                IdentifierClass::DomainName,
                IdentifierClass::SocialHandle,
                IdentifierClass::RawAddress
            ]
        );
    }
}
