//! Portal roles
//!
//! Every account carries exactly one [`Role`]. Owners and Developers are
//! administrators; Banned accounts are signed out on their next request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Developer,
    Member,
    Guest,
    Banned,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Owner,
        Role::Developer,
        Role::Member,
        Role::Guest,
        Role::Banned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Developer => "Developer",
            Role::Member => "Member",
            Role::Guest => "Guest",
            Role::Banned => "Banned",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Developer)
    }

    /// Whether this role may post in the general chat.
    pub fn can_chat(&self) -> bool {
        !matches!(self, Role::Guest | Role::Banned)
    }

    /// Whether `self` may give another account the `target` role.
    ///
    /// Only an Owner promotes or demotes (Member, Developer, Owner). Any
    /// admin may ban. Guest is never assigned; it is the role of visitors
    /// without an account.
    pub fn can_assign(&self, target: Role) -> bool {
        match target {
            Role::Member | Role::Developer | Role::Owner => *self == Role::Owner,
            Role::Banned => self.is_admin(),
            Role::Guest => false,
        }
    }

    /// Whether accounts with this role appear in the members sidebar.
    pub fn is_listed(&self) -> bool {
        !matches!(self, Role::Guest | Role::Banned)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| SharedError::validation("role", format!("Unknown role: {}", s)))
    }
}
