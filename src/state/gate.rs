//! Command permission gate.

use serenity::model::id::RoleId;

/// Whether a caller holding `caller_roles` may run a restricted command.
///
/// Guilds without a restriction are open to everyone.
pub fn allowed(restriction: Option<RoleId>, caller_roles: &[RoleId]) -> bool {
    match restriction {
        None => true,
        Some(required) => caller_roles.contains(&required),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(ids: &[u64]) -> Vec<RoleId> {
        ids.iter().copied().map(RoleId::new).collect()
    }

    #[test]
    fn test_unrestricted_allows_everyone() {
        assert!(allowed(None, &[]));
        assert!(allowed(None, &roles(&[1, 2, 3])));
    }

    #[test]
    fn test_restricted_requires_role() {
        let required = Some(RoleId::new(7));

        assert!(allowed(required, &roles(&[7])));
        assert!(allowed(required, &roles(&[1, 7, 9])));
        assert!(!allowed(required, &roles(&[1, 9])));
        assert!(!allowed(required, &[]));
    }
}
