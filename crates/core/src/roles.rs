#![forbid(unsafe_code)]

//! Placement-role registry.
//!
//! One registry serves both resolver strategies; role ids the registry does
//! not know resolve to the `"unknown"` sentinel instead of failing.

use std::collections::BTreeMap;

pub const UNKNOWN_ROLE: &str = "unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role {
    pub name: String,
    pub screen_color: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RoleRegistry {
    roles: BTreeMap<u32, Role>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed role mapping of the board layout; carries no display colors.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (role_id, name) in [(12, "start"), (13, "middle"), (14, "finish"), (15, "foot")] {
            registry.insert(role_id, name.to_string(), None);
        }
        registry
    }

    pub fn insert(&mut self, role_id: u32, name: String, screen_color: Option<String>) {
        self.roles.insert(role_id, Role { name, screen_color });
    }

    pub fn get(&self, role_id: u32) -> Option<&Role> {
        self.roles.get(&role_id)
    }

    /// Resolves a role name, falling back to the `"unknown"` sentinel.
    pub fn name_or_unknown(&self, role_id: u32) -> &str {
        self.roles
            .get(&role_id)
            .map(|role| role.name.as_str())
            .unwrap_or(UNKNOWN_ROLE)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_the_four_layout_roles() {
        let registry = RoleRegistry::builtin();
        assert_eq!(registry.name_or_unknown(12), "start");
        assert_eq!(registry.name_or_unknown(13), "middle");
        assert_eq!(registry.name_or_unknown(14), "finish");
        assert_eq!(registry.name_or_unknown(15), "foot");
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn unknown_role_resolves_to_sentinel() {
        let registry = RoleRegistry::builtin();
        assert_eq!(registry.name_or_unknown(99), UNKNOWN_ROLE);
        assert!(registry.get(99).is_none());
    }

    #[test]
    fn insert_keeps_screen_color() {
        let mut registry = RoleRegistry::new();
        registry.insert(12, "start".to_string(), Some("#00DD00".to_string()));
        let role = registry.get(12).unwrap();
        assert_eq!(role.name, "start");
        assert_eq!(role.screen_color.as_deref(), Some("#00DD00"));
    }
}
