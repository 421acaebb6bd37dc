//! Directory operations facade
//!
//! Every operation is a short pipeline over the three injected
//! collaborators: spawn a query utility, parse its output, and (for
//! mutations) emit one named event requesting the change. The external
//! account service is the sole source of truth and the sole mutator; this
//! facade never writes anything itself.
//!
//! The precondition read and the signal emission of a mutation are not
//! atomic. Two concurrent callers can both pass the same precondition and
//! both emit; the account service arbitrates. Mutations resolve when the
//! signal is accepted for delivery, not when the change lands.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::{DirectoryError, DomainError};
use super::records::{GroupListing, GroupSpec, NewUser, UserEdit, UserListing};
use crate::config::ScriptsConfig;
use crate::external::command::{CommandError, CommandExecutor};
use crate::external::signal::SignalEmitter;
use crate::external::validate::FieldValidator;

// Events the account service subscribes to. User creation rides the
// modify event; the service treats it as create-or-update.
pub const GROUP_CREATE: &str = "group-create";
pub const GROUP_MODIFY: &str = "group-modify";
pub const GROUP_DELETE: &str = "group-delete";
pub const USER_MODIFY: &str = "user-modify";
pub const USER_DELETE: &str = "user-delete";

/// Validation rule consulted before a user create is signaled
pub const PASSWORD_STRENGTH_RULE: &str = "password-strength";

// Log-correlation identifiers, one literal per failure site.
const ERR_GROUP_EXISTS: u64 = 1150823484726;
const ERR_EDIT_GROUP_MISSING: u64 = 1150825584272;
const ERR_DELETE_GROUP_MISSING: u64 = 1150827079793;
const ERR_USER_EXISTS: u64 = 1340134415147;
const ERR_PASSWORD_WEAK: u64 = 1340134737252;
const ERR_EDIT_USER_MISSING: u64 = 1340135051657;
const ERR_DELETE_USER_MISSING: u64 = 1508246496389;

/// User and group directory operations over the external utilities
///
/// One instance per process, constructed with its collaborators at
/// startup and passed explicitly to consumers.
pub struct DirectoryFacade {
    executor: Arc<dyn CommandExecutor>,
    signals: Arc<dyn SignalEmitter>,
    validator: Arc<dyn FieldValidator>,
    scripts: ScriptsConfig,
}

impl DirectoryFacade {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        signals: Arc<dyn SignalEmitter>,
        validator: Arc<dyn FieldValidator>,
        scripts: ScriptsConfig,
    ) -> Self {
        Self {
            executor,
            signals,
            validator,
            scripts,
        }
    }

    /// List all users known to the directory
    pub async fn list_users(
        &self,
        timeout: Option<Duration>,
    ) -> Result<UserListing, DirectoryError> {
        let args = self.listing_args(timeout, None);
        let stdout = self.run_query(&self.scripts.list_users, &args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Query one user; the result is empty if the user does not exist
    pub async fn get_user(
        &self,
        username: &str,
        timeout: Option<Duration>,
    ) -> Result<UserListing, DirectoryError> {
        let args = self.listing_args(timeout, Some(username));
        let stdout = self.run_query(&self.scripts.list_users, &args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Names of the groups a user belongs to, order as reported
    pub async fn user_groups(&self, username: &str) -> Result<Vec<String>, DirectoryError> {
        let args = vec![username.to_string()];
        let stdout = self.run_query(&self.scripts.user_groups, &args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// List all groups known to the directory
    pub async fn list_groups(
        &self,
        timeout: Option<Duration>,
    ) -> Result<GroupListing, DirectoryError> {
        let args = self.listing_args(timeout, None);
        let stdout = self.run_query(&self.scripts.list_groups, &args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Members of one group; empty if the group does not exist
    pub async fn group_members(
        &self,
        groupname: &str,
        timeout: Option<Duration>,
    ) -> Result<Vec<String>, DirectoryError> {
        let args = self.listing_args(timeout, Some(groupname));
        let stdout = self.run_query(&self.scripts.list_groups, &args).await?;
        let mut listing: GroupListing = serde_json::from_str(&stdout)?;
        Ok(listing
            .remove(groupname)
            .map(|group| group.members)
            .unwrap_or_default())
    }

    /// Ask the external generator for a fresh random password
    pub async fn generate_password(&self) -> Result<String, DirectoryError> {
        let stdout = self.run_query(&self.scripts.password_gen, &[]).await?;
        Ok(stdout.trim_end_matches('\n').to_string())
    }

    /// Create a group: reject if the name is taken, then signal the create
    pub async fn add_group(&self, spec: &GroupSpec) -> Result<(), DirectoryError> {
        let groups = self.list_groups(None).await?;
        if groups.contains_key(&spec.name) {
            warn!(group = %spec.name, id = ERR_GROUP_EXISTS, "Rejecting duplicate group create");
            return Err(DomainError::not_valid(ERR_GROUP_EXISTS)
                .with_attribute("name", format!("group {} already exists", spec.name))
                .into());
        }

        self.signals
            .signal(GROUP_CREATE, &spec.signal_params())
            .await?;
        Ok(())
    }

    /// Replace a group's membership: reject if the group is unknown
    pub async fn edit_group(&self, spec: &GroupSpec) -> Result<(), DirectoryError> {
        let groups = self.list_groups(None).await?;
        if !groups.contains_key(&spec.name) {
            warn!(group = %spec.name, id = ERR_EDIT_GROUP_MISSING, "Rejecting edit of unknown group");
            return Err(DomainError::not_found(ERR_EDIT_GROUP_MISSING)
                .with_attribute("name", format!("group {} does not exist", spec.name))
                .into());
        }

        self.signals
            .signal(GROUP_MODIFY, &spec.signal_params())
            .await?;
        Ok(())
    }

    /// Delete a group: reject if the group is unknown
    pub async fn delete_group(&self, groupname: &str) -> Result<(), DirectoryError> {
        let groups = self.list_groups(None).await?;
        if !groups.contains_key(groupname) {
            warn!(group = groupname, id = ERR_DELETE_GROUP_MISSING, "Rejecting delete of unknown group");
            return Err(DomainError::not_found(ERR_DELETE_GROUP_MISSING)
                .with_attribute("name", format!("group {groupname} does not exist"))
                .into());
        }

        self.signals
            .signal(GROUP_DELETE, &[groupname.to_string()])
            .await?;
        Ok(())
    }

    /// Create a user: reject duplicates, check password strength, then
    /// signal the create
    pub async fn add_user(&self, user: &NewUser) -> Result<(), DirectoryError> {
        let existing = self.get_user(&user.username, None).await?;
        if !existing.is_empty() {
            warn!(user = %user.username, id = ERR_USER_EXISTS, "Rejecting duplicate user create");
            return Err(DomainError::not_valid(ERR_USER_EXISTS)
                .with_attribute("username", format!("user {} already exists", user.username))
                .into());
        }

        self.validator
            .validate(
                PASSWORD_STRENGTH_RULE,
                &[user.password.clone()],
                DomainError::not_valid(ERR_PASSWORD_WEAK)
                    .with_attribute("password", "password does not meet strength requirements"),
            )
            .await?;

        self.signals
            .signal(USER_MODIFY, &user.signal_params())
            .await?;
        Ok(())
    }

    /// Edit a user: reject if the user is unknown
    ///
    /// Checks the precondition and stops. The attribute-edit script only
    /// accepts whole-record updates today, so nothing is signaled.
    /// TODO: emit user-modify here once the account service accepts
    /// partial attribute updates.
    pub async fn edit_user(&self, edit: &UserEdit) -> Result<(), DirectoryError> {
        let existing = self.get_user(&edit.username, None).await?;
        if existing.is_empty() {
            warn!(user = %edit.username, id = ERR_EDIT_USER_MISSING, "Rejecting edit of unknown user");
            return Err(DomainError::not_found(ERR_EDIT_USER_MISSING)
                .with_attribute("username", format!("user {} does not exist", edit.username))
                .into());
        }

        debug!(user = %edit.username, "User edit accepted; no signal emitted");
        Ok(())
    }

    /// Delete a user: reject if the user is unknown
    pub async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        let existing = self.get_user(username, None).await?;
        if existing.is_empty() {
            warn!(user = username, id = ERR_DELETE_USER_MISSING, "Rejecting delete of unknown user");
            return Err(DomainError::not_found(ERR_DELETE_USER_MISSING)
                .with_attribute("username", format!("user {username} does not exist"))
                .into());
        }

        self.signals
            .signal(USER_DELETE, &[username.to_string()])
            .await?;
        Ok(())
    }

    /// Flags common to the listing utilities: forwarded timeout, structured
    /// output, optional trailing subject
    fn listing_args(&self, timeout: Option<Duration>, subject: Option<&str>) -> Vec<String> {
        let secs = timeout
            .unwrap_or(Duration::from_secs(self.scripts.default_timeout_secs))
            .as_secs();

        let mut args = vec!["-t".to_string(), secs.to_string(), "-s".to_string()];
        if let Some(subject) = subject {
            args.push(subject.to_string());
        }
        args
    }

    async fn run_query(&self, program: &str, args: &[String]) -> Result<String, DirectoryError> {
        let output = self.executor.run(program, args).await?;

        if !output.success() {
            return Err(CommandError::ExecutionFailed {
                message: output.stderr.trim().to_string(),
            }
            .into());
        }

        Ok(output.stdout)
    }
}
