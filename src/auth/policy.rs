//! Role to capability mapping.
//!
//! Every predicate here is pure. Services call them on each mutation; the
//! capability summary exists so clients can hide controls, which is never a
//! substitute for the service-side checks.

use serde::{Deserialize, Serialize};

use crate::domain::{User, UserRole};

pub fn can_create_announcement(role: UserRole) -> bool {
    matches!(role, UserRole::Admin | UserRole::Superadmin)
}

pub fn can_pin_announcement(role: UserRole) -> bool {
    matches!(role, UserRole::Admin | UserRole::Superadmin)
}

/// Reading the user directory and changing roles.
pub fn can_manage_users(role: UserRole) -> bool {
    role == UserRole::Superadmin
}

/// Only a superadmin may change roles, and never their own.
pub fn can_change_role(acting: &User, target: &User, _new_role: UserRole) -> bool {
    can_manage_users(acting.role) && acting.id != target.id
}

pub fn can_view_analytics(role: UserRole) -> bool {
    matches!(role, UserRole::Admin | UserRole::Superadmin)
}

/// Which dashboard a role lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    Employee,
    Admin,
    Superadmin,
}

impl DashboardView {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Superadmin => DashboardView::Superadmin,
            UserRole::Admin => DashboardView::Admin,
            UserRole::Employee => DashboardView::Employee,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub create_announcements: bool,
    pub pin_announcements: bool,
    pub manage_users: bool,
    pub view_analytics: bool,
}

impl Capabilities {
    pub fn for_role(role: UserRole) -> Self {
        Self {
            create_announcements: can_create_announcement(role),
            pin_announcements: can_pin_announcement(role),
            manage_users: can_manage_users(role),
            view_analytics: can_view_analytics(role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            department: "Engineering".to_string(),
            role,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn only_admins_create_and_pin() {
        assert!(!can_create_announcement(UserRole::Employee));
        assert!(can_create_announcement(UserRole::Admin));
        assert!(can_create_announcement(UserRole::Superadmin));

        assert!(!can_pin_announcement(UserRole::Employee));
        assert!(can_pin_announcement(UserRole::Admin));
        assert!(can_pin_announcement(UserRole::Superadmin));
    }

    #[test]
    fn superadmin_changes_other_users_roles() {
        let acting = user(UserRole::Superadmin);
        let target = user(UserRole::Employee);

        for role in UserRole::ALL {
            assert!(can_change_role(&acting, &target, role));
        }
    }

    #[test]
    fn nobody_changes_their_own_role() {
        for role in UserRole::ALL {
            let acting = user(role);
            for new_role in UserRole::ALL {
                assert!(!can_change_role(&acting, &acting, new_role));
            }
        }
    }

    #[test]
    fn admins_and_employees_cannot_change_roles() {
        let target = user(UserRole::Employee);
        assert!(!can_change_role(&user(UserRole::Admin), &target, UserRole::Superadmin));
        assert!(!can_change_role(&user(UserRole::Employee), &target, UserRole::Admin));
    }

    #[test]
    fn capabilities_follow_role() {
        let employee = Capabilities::for_role(UserRole::Employee);
        assert_eq!(
            employee,
            Capabilities {
                create_announcements: false,
                pin_announcements: false,
                manage_users: false,
                view_analytics: false,
            }
        );

        let admin = Capabilities::for_role(UserRole::Admin);
        assert!(admin.create_announcements && admin.view_analytics);
        assert!(!admin.manage_users);

        assert!(Capabilities::for_role(UserRole::Superadmin).manage_users);
        assert!(!can_manage_users(UserRole::Admin));
        assert!(!can_manage_users(UserRole::Employee));
        assert_eq!(DashboardView::for_role(UserRole::Admin), DashboardView::Admin);
    }
}
