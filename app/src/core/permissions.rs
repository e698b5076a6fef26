use serde::Serialize;

use crate::models::team_member::{Model as TeamMember, Role};

/// Per-member capability overrides. `None` means "use the role default";
/// the columns are nullable for exactly this reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionToggles {
    pub can_manage_agency: Option<bool>,
    pub can_approve_posts: Option<bool>,
    pub can_final_approval: Option<bool>,
}

impl PermissionToggles {
    pub fn from_member(member: &TeamMember) -> Self {
        Self {
            can_manage_agency: member.can_manage_agency,
            can_approve_posts: member.can_approve_posts,
            can_final_approval: member.can_final_approval,
        }
    }
}

/// Everything a caller may do inside a workspace, resolved once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub manage_team: bool,
    pub manage_settings: bool,
    pub manage_agency: bool,
    pub approve_posts: bool,
    pub final_approval: bool,
    pub create_posts: bool,
    pub edit_own_posts: bool,
    pub edit_all_posts: bool,
    pub delete_own_posts: bool,
    pub delete_all_posts: bool,
    pub view_analytics: bool,
    pub manage_accounts: bool,
    pub access_inbox: bool,
}

impl Capabilities {
    pub const fn owner() -> Self {
        Self {
            manage_team: true,
            manage_settings: true,
            manage_agency: true,
            approve_posts: true,
            final_approval: true,
            create_posts: true,
            edit_own_posts: true,
            edit_all_posts: true,
            delete_own_posts: true,
            delete_all_posts: true,
            view_analytics: true,
            manage_accounts: true,
            access_inbox: true,
        }
    }

    const fn member_defaults() -> Self {
        Self {
            manage_team: false,
            manage_settings: false,
            manage_agency: false,
            approve_posts: false,
            final_approval: false,
            create_posts: true,
            edit_own_posts: true,
            edit_all_posts: false,
            delete_own_posts: true,
            delete_all_posts: false,
            view_analytics: true,
            manage_accounts: false,
            access_inbox: true,
        }
    }

    const fn viewer_defaults() -> Self {
        Self {
            manage_team: false,
            manage_settings: false,
            manage_agency: false,
            approve_posts: false,
            final_approval: false,
            create_posts: false,
            edit_own_posts: false,
            edit_all_posts: false,
            delete_own_posts: false,
            delete_all_posts: false,
            view_analytics: true,
            manage_accounts: false,
            access_inbox: false,
        }
    }

    fn as_flags(&self) -> [bool; 13] {
        [
            self.manage_team,
            self.manage_settings,
            self.manage_agency,
            self.approve_posts,
            self.final_approval,
            self.create_posts,
            self.edit_own_posts,
            self.edit_all_posts,
            self.delete_own_posts,
            self.delete_all_posts,
            self.view_analytics,
            self.manage_accounts,
            self.access_inbox,
        ]
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.as_flags()
            .iter()
            .zip(other.as_flags())
            .all(|(mine, theirs)| *mine || !theirs)
    }
}

/// Map legacy role strings onto the canonical three. Unknown strings resolve
/// to Viewer, the least-privileged role.
pub fn normalize_role(raw: &str) -> Role {
    match raw.trim().to_ascii_lowercase().as_str() {
        "owner" => Role::Owner,
        "member" | "admin" | "editor" => Role::Member,
        _ => Role::Viewer,
    }
}

/// Static defaults per role, then per-member toggle overrides. Owner is never
/// downgraded: toggles do not apply to it.
pub fn resolve(role: Role, toggles: PermissionToggles) -> Capabilities {
    let mut caps = match role {
        Role::Owner => return Capabilities::owner(),
        Role::Member => Capabilities::member_defaults(),
        Role::Viewer => Capabilities::viewer_defaults(),
    };

    if let Some(v) = toggles.can_manage_agency {
        caps.manage_agency = v;
    }
    if let Some(v) = toggles.can_approve_posts {
        caps.approve_posts = v;
    }
    if let Some(v) = toggles.can_final_approval {
        caps.final_approval = v;
    }

    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle_values() -> [Option<bool>; 3] {
        [None, Some(false), Some(true)]
    }

    #[test]
    fn test_empty_toggles_give_static_defaults() {
        assert_eq!(
            resolve(Role::Owner, PermissionToggles::default()),
            Capabilities::owner()
        );
        assert_eq!(
            resolve(Role::Member, PermissionToggles::default()),
            Capabilities::member_defaults()
        );
        assert_eq!(
            resolve(Role::Viewer, PermissionToggles::default()),
            Capabilities::viewer_defaults()
        );
    }

    #[test]
    fn test_member_defaults_shape() {
        let caps = resolve(Role::Member, PermissionToggles::default());
        assert!(caps.create_posts);
        assert!(caps.edit_own_posts);
        assert!(caps.access_inbox);
        assert!(!caps.manage_team);
        assert!(!caps.approve_posts);
        assert!(!caps.final_approval);
        assert!(!caps.edit_all_posts);
    }

    #[test]
    fn test_viewer_defaults_shape() {
        let caps = resolve(Role::Viewer, PermissionToggles::default());
        assert!(caps.view_analytics);
        assert!(!caps.create_posts);
        assert!(!caps.access_inbox);
        assert!(!caps.approve_posts);
    }

    #[test]
    fn test_toggles_override_defaults() {
        let caps = resolve(
            Role::Member,
            PermissionToggles {
                can_manage_agency: Some(true),
                can_approve_posts: Some(true),
                can_final_approval: None,
            },
        );
        assert!(caps.manage_agency);
        assert!(caps.approve_posts);
        assert!(!caps.final_approval);

        // a client granted final approval, the two-tier reviewer case
        let caps = resolve(
            Role::Viewer,
            PermissionToggles {
                can_manage_agency: None,
                can_approve_posts: None,
                can_final_approval: Some(true),
            },
        );
        assert!(caps.final_approval);
        assert!(!caps.create_posts);
    }

    #[test]
    fn test_owner_ignores_toggles() {
        let caps = resolve(
            Role::Owner,
            PermissionToggles {
                can_manage_agency: Some(false),
                can_approve_posts: Some(false),
                can_final_approval: Some(false),
            },
        );
        assert_eq!(caps, Capabilities::owner());
    }

    #[test]
    fn test_owner_is_superset_for_every_toggle_combination() {
        for agency in toggle_values() {
            for approve in toggle_values() {
                for finalize in toggle_values() {
                    let toggles = PermissionToggles {
                        can_manage_agency: agency,
                        can_approve_posts: approve,
                        can_final_approval: finalize,
                    };
                    let owner = resolve(Role::Owner, toggles);
                    assert!(owner.is_superset_of(&resolve(Role::Member, toggles)));
                    assert!(owner.is_superset_of(&resolve(Role::Viewer, toggles)));
                }
            }
        }
    }

    #[test]
    fn test_legacy_role_normalization() {
        assert_eq!(normalize_role("owner"), Role::Owner);
        assert_eq!(normalize_role("member"), Role::Member);
        assert_eq!(normalize_role("admin"), Role::Member);
        assert_eq!(normalize_role("editor"), Role::Member);
        assert_eq!(normalize_role("viewer"), Role::Viewer);
        assert_eq!(normalize_role("client"), Role::Viewer);
        assert_eq!(normalize_role("view_only"), Role::Viewer);
        assert_eq!(normalize_role("  Admin "), Role::Member);
        assert_eq!(normalize_role("something-else"), Role::Viewer);
    }
}
