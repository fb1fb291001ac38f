/// Number of bus-master domains the controller distinguishes.
pub const MAX_DOMAINS: usize = 16;

/// Identity of a bus master as seen by the access controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainId(pub u8);

impl DomainId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Access rule the hardware applies to one (domain, slave) pair.
///
/// Discriminants are the hardware field encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Permission {
    /// Any access is allowed.
    NoProtection = 0,
    /// Only secure read/write.
    SecRwOnly = 1,
    /// Secure read/write, non-secure read.
    SecRwNsR = 2,
    /// All access is rejected.
    Forbidden = 3,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::NoProtection,
        Permission::SecRwOnly,
        Permission::SecRwNsR,
        Permission::Forbidden,
    ];
}

/// Named per-slave policy.
///
/// Many slaves share a handful of policies; each one expands to a
/// [`Permission`] per domain, with every unnamed domain forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlavePolicy {
    ForbidAll,
    NoProtection,
    ForbidExceptD5NoProtect,
    ForbidExceptD0SecRw,
    ForbidExceptD0SecRwD5NoProtect,
    ForbidExceptD0SecRwNsRD5NoProtect,
    ForbidExceptD0D5NoProtect,
    ForbidExceptD0D5NoProtectD3SecRw,
    ForbidExceptD0D3SecRwD5NoProtect,
}

impl SlavePolicy {
    pub const ALL: [SlavePolicy; 9] = [
        SlavePolicy::ForbidAll,
        SlavePolicy::NoProtection,
        SlavePolicy::ForbidExceptD5NoProtect,
        SlavePolicy::ForbidExceptD0SecRw,
        SlavePolicy::ForbidExceptD0SecRwD5NoProtect,
        SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect,
        SlavePolicy::ForbidExceptD0D5NoProtect,
        SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw,
        SlavePolicy::ForbidExceptD0D3SecRwD5NoProtect,
    ];

    /// Permission this policy grants `domain`.
    ///
    /// Domains outside [`MAX_DOMAINS`] are always forbidden.
    pub const fn permission(self, domain: DomainId) -> Permission {
        if domain.index() >= MAX_DOMAINS {
            return Permission::Forbidden;
        }

        match (self, domain.0) {
            (SlavePolicy::NoProtection, _) => Permission::NoProtection,
            (SlavePolicy::ForbidAll, _) => Permission::Forbidden,

            (SlavePolicy::ForbidExceptD5NoProtect, 5) => Permission::NoProtection,

            (SlavePolicy::ForbidExceptD0SecRw, 0) => Permission::SecRwOnly,

            (SlavePolicy::ForbidExceptD0SecRwD5NoProtect, 0) => Permission::SecRwOnly,
            (SlavePolicy::ForbidExceptD0SecRwD5NoProtect, 5) => Permission::NoProtection,

            (SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect, 0) => Permission::SecRwNsR,
            (SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect, 5) => Permission::NoProtection,

            (SlavePolicy::ForbidExceptD0D5NoProtect, 0 | 5) => Permission::NoProtection,

            (SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw, 0 | 5) => Permission::NoProtection,
            (SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw, 3) => Permission::SecRwOnly,

            (SlavePolicy::ForbidExceptD0D3SecRwD5NoProtect, 0 | 3) => Permission::SecRwOnly,
            (SlavePolicy::ForbidExceptD0D3SecRwD5NoProtect, 5) => Permission::NoProtection,

            _ => Permission::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_domains_are_forbidden() {
        let policy = SlavePolicy::ForbidExceptD0SecRwD5NoProtect;
        assert_eq!(policy.permission(DomainId(0)), Permission::SecRwOnly);
        assert_eq!(policy.permission(DomainId(5)), Permission::NoProtection);
        for d in [1, 2, 3, 4, 6, 15] {
            assert_eq!(policy.permission(DomainId(d)), Permission::Forbidden);
        }
    }

    #[test]
    fn policy_expansion_scenarios() {
        // D0 gets secure rw with non-secure read
        assert_eq!(
            SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect.permission(DomainId(0)),
            Permission::SecRwNsR
        );

        // D3 gets secure rw, D0/D5 unrestricted
        let acx = SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw;
        assert_eq!(acx.permission(DomainId(0)), Permission::NoProtection);
        assert_eq!(acx.permission(DomainId(3)), Permission::SecRwOnly);
        assert_eq!(acx.permission(DomainId(5)), Permission::NoProtection);
        assert_eq!(acx.permission(DomainId(4)), Permission::Forbidden);

        // Only D0 has access
        let reviser = SlavePolicy::ForbidExceptD0SecRw;
        assert_eq!(reviser.permission(DomainId(0)), Permission::SecRwOnly);
        assert_eq!(reviser.permission(DomainId(5)), Permission::Forbidden);
    }

    #[test]
    fn domains_past_the_table_are_forbidden() {
        assert_eq!(
            SlavePolicy::NoProtection.permission(DomainId(MAX_DOMAINS as u8)),
            Permission::Forbidden
        );
        assert_eq!(
            SlavePolicy::NoProtection.permission(DomainId(15)),
            Permission::NoProtection
        );
    }
}
