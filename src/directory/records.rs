//! Directory record and request types
//!
//! Records are produced only by parsing the external query utilities'
//! structured output; nothing here is cached or written back. Request
//! types carry an explicit ordered field schema for building positional
//! signal parameters — the record's key always comes first, the remaining
//! fields follow in declared order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One user as reported by the list-users utility
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub shell: String,
    #[serde(default)]
    pub password_expires: bool,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, rename = "new")]
    pub is_new: bool,
}

/// One group as reported by the list-groups utility
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupRecord {
    #[serde(default)]
    pub members: Vec<String>,
}

/// Keyed listings, as the query utilities emit them. An empty map is a
/// valid result for a scoped query whose subject does not exist.
pub type UserListing = BTreeMap<String, UserRecord>;
pub type GroupListing = BTreeMap<String, GroupRecord>;

/// Request to create or replace a group
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub name: String,
    pub members: Vec<String>,
}

impl GroupSpec {
    /// Positional signal parameters: name, then each member
    pub fn signal_params(&self) -> Vec<String> {
        let mut params = Vec::with_capacity(self.members.len() + 1);
        params.push(self.name.clone());
        params.extend(self.members.iter().cloned());
        params
    }
}

/// Request to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub shell: String,
}

impl NewUser {
    /// Positional signal parameters: username, display name, password, shell
    pub fn signal_params(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.display_name.clone(),
            self.password.clone(),
            self.shell.clone(),
        ]
    }
}

/// Request to edit a user's attributes
#[derive(Debug, Clone)]
pub struct UserEdit {
    pub username: String,
    pub display_name: Option<String>,
    pub shell: Option<String>,
    pub locked: Option<bool>,
}
