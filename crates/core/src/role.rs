//! The closed role table.
//!
//! Every principal carries exactly one role. Roles travel over the wire as
//! ordinal codes (`1..=4`), sometimes as numeric strings, and in older
//! payloads as names; all of those forms resolve through [`Role::from_str`].

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawRole", into = "u8")]
pub enum Role {
    Owner,
    Veterinarian,
    Partner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Owner, Role::Veterinarian, Role::Partner, Role::Admin];

    /// Ordinal code used by the backend.
    pub const fn code(self) -> u8 {
        match self {
            Role::Owner => 1,
            Role::Veterinarian => 2,
            Role::Partner => 3,
            Role::Admin => 4,
        }
    }

    pub const fn from_code(code: u8) -> Option<Role> {
        match code {
            1 => Some(Role::Owner),
            2 => Some(Role::Veterinarian),
            3 => Some(Role::Partner),
            4 => Some(Role::Admin),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Veterinarian => "veterinarian",
            Role::Partner => "partner",
            Role::Admin => "admin",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self.code() - 1)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Role::from_code(code).ok_or_else(|| CoreError::unknown_role(trimmed));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "owner" | "petowner" => Ok(Role::Owner),
            "veterinarian" | "vet" | "professional" => Ok(Role::Veterinarian),
            "partner" => Ok(Role::Partner),
            "admin" => Ok(Role::Admin),
            _ => Err(CoreError::unknown_role(trimmed)),
        }
    }
}

impl TryFrom<u64> for Role {
    type Error = CoreError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Role::from_code)
            .ok_or_else(|| CoreError::unknown_role(value.to_string()))
    }
}

impl From<Role> for u8 {
    fn from(value: Role) -> Self {
        value.code()
    }
}

/// Wire form of a role: a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRole {
    Code(u64),
    Text(String),
}

impl TryFrom<RawRole> for Role {
    type Error = CoreError;

    fn try_from(value: RawRole) -> Result<Self, Self::Error> {
        match value {
            RawRole::Code(code) => Role::try_from(code),
            RawRole::Text(text) => text.parse(),
        }
    }
}

/// A set of roles, stored as a bitmask over the closed table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < Role::ALL.len() {
            bits |= Role::ALL[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn only(role: Role) -> Self {
        Self(role.bit())
    }

    pub fn of(roles: &[Role]) -> Self {
        roles.iter().fold(Self::empty(), |set, role| set.with(*role))
    }

    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, role| set.with(role))
    }
}

impl Serialize for RoleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl core::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.iter().map(Role::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
