//! The two views and how paths map onto them

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Register,
    Inventory,
}

impl Route {
    /// Resolve a path. The empty path and anything unknown land on
    /// registration.
    pub fn resolve(path: &str) -> Self {
        match path.trim().trim_matches('/') {
            "inventory" => Self::Inventory,
            _ => Self::Register,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::Inventory => "/inventory",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
