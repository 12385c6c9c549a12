//! Landing areas chosen from the session role.

use std::fmt;

use crate::models::Role;

/// Top-level storefront area a signed-in user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Book search and browsing.
    Catalog,
    /// Admin dashboard (book management, statistics).
    AdminDashboard,
}

impl Area {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => Area::AdminDashboard,
            Role::User => Area::Catalog,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Area::Catalog => "/books",
            Area::AdminDashboard => "/admin/dashboard",
        }
    }

    /// Whether a session with `role` may enter this area.
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Area::Catalog => true,
            Area::AdminDashboard => role == Role::Admin,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
