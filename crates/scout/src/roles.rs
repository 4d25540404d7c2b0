//! Roles the host platform grants to the current actor.

use std::{collections::BTreeSet, convert::Infallible, fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Administrator,
    Editor,
    Author,
    Contributor,
    Subscriber,
    Other(String),
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s.trim().to_ascii_lowercase().as_str() {
            "administrator" => Role::Administrator,
            "editor" => Role::Editor,
            "author" => Role::Author,
            "contributor" => Role::Contributor,
            "subscriber" => Role::Subscriber,
            other => Role::Other(other.to_string()),
        };
        Ok(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Administrator => f.write_str("administrator"),
            Role::Editor => f.write_str("editor"),
            Role::Author => f.write_str("author"),
            Role::Contributor => f.write_str("contributor"),
            Role::Subscriber => f.write_str("subscriber"),
            Role::Other(name) => f.write_str(name),
        }
    }
}

/// The actor's role set. Read only; nothing here ever grants a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roles(BTreeSet<Role>);

impl Roles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma separated list such as `administrator, editor`.
    /// Blank entries are skipped.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .filter(|name| !name.trim().is_empty())
            .filter_map(|name| name.parse::<Role>().ok())
            .collect()
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only administrators may purge the remote cache.
    pub fn can_purge(&self) -> bool {
        self.contains(&Role::Administrator)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Roles {
    type Item = Role;
    type IntoIter = std::collections::btree_set::IntoIter<Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(Role::to_string).collect();
        f.write_str(&names.join(","))
    }
}
