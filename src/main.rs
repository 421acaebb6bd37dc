use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

mod config;
mod directory;
mod external;
mod telemetry;

use config::UserdirConfig;
use directory::{DirectoryFacade, GroupSpec};
use external::{
    CommandExecutor, NotifierSignalEmitter, ScriptFieldValidator, TokioCommandExecutor,
};

#[derive(Parser)]
#[command(name = "userdir")]
#[command(about = "User and group directory operations over external system utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all users in the directory
    Users {
        /// Listing timeout in seconds, forwarded to the external utility
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Show one user
    User {
        username: String,
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// List the groups a user belongs to
    Memberships { username: String },
    /// List all groups in the directory
    Groups {
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// List one group's members
    Members {
        groupname: String,
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Generate a random password
    Passwd,
    /// Create a group
    AddGroup {
        name: String,
        /// Initial members
        members: Vec<String>,
    },
    /// Delete a group
    DelGroup { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = UserdirConfig::load()?;
    telemetry::init_telemetry(&config.observability)?;

    let facade = build_facade(&config);
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Users { timeout } => runtime.block_on(users_command(&facade, timeout)),
        Commands::User { username, timeout } => {
            runtime.block_on(user_command(&facade, &username, timeout))
        }
        Commands::Memberships { username } => {
            runtime.block_on(memberships_command(&facade, &username))
        }
        Commands::Groups { timeout } => runtime.block_on(groups_command(&facade, timeout)),
        Commands::Members { groupname, timeout } => {
            runtime.block_on(members_command(&facade, &groupname, timeout))
        }
        Commands::Passwd => runtime.block_on(passwd_command(&facade)),
        Commands::AddGroup { name, members } => {
            runtime.block_on(add_group_command(&facade, name, members))
        }
        Commands::DelGroup { name } => runtime.block_on(del_group_command(&facade, &name)),
    }
}

fn build_facade(config: &UserdirConfig) -> DirectoryFacade {
    let executor: Arc<dyn CommandExecutor> = Arc::new(TokioCommandExecutor);
    let signals = Arc::new(NotifierSignalEmitter::new(
        executor.clone(),
        config.signals.notifier.clone(),
    ));
    let validator = Arc::new(ScriptFieldValidator::new(
        executor.clone(),
        config.scripts.validate.clone(),
    ));
    DirectoryFacade::new(executor, signals, validator, config.scripts.clone())
}

fn seconds(timeout: Option<u64>) -> Option<Duration> {
    timeout.map(Duration::from_secs)
}

async fn users_command(facade: &DirectoryFacade, timeout: Option<u64>) -> Result<()> {
    let users = facade.list_users(seconds(timeout)).await?;

    if users.is_empty() {
        println!("No users in the directory");
        return Ok(());
    }

    for (username, record) in &users {
        let mut flags = Vec::new();
        if record.locked {
            flags.push("locked");
        }
        if record.is_new {
            flags.push("new");
        }
        if record.password_expires {
            flags.push("password expires");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        println!("{username}  {} ({}){}", record.display_name, record.shell, flags);
    }
    Ok(())
}

async fn user_command(
    facade: &DirectoryFacade,
    username: &str,
    timeout: Option<u64>,
) -> Result<()> {
    let users = facade.get_user(username, seconds(timeout)).await?;

    match users.get(username) {
        Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
        None => println!("User '{username}' does not exist"),
    }
    Ok(())
}

async fn memberships_command(facade: &DirectoryFacade, username: &str) -> Result<()> {
    let groups = facade.user_groups(username).await?;

    if groups.is_empty() {
        println!("{username} belongs to no groups");
    } else {
        for group in groups {
            println!("{group}");
        }
    }
    Ok(())
}

async fn groups_command(facade: &DirectoryFacade, timeout: Option<u64>) -> Result<()> {
    let groups = facade.list_groups(seconds(timeout)).await?;

    for (name, record) in &groups {
        println!("{name}  ({} members)", record.members.len());
    }
    Ok(())
}

async fn members_command(
    facade: &DirectoryFacade,
    groupname: &str,
    timeout: Option<u64>,
) -> Result<()> {
    let members = facade.group_members(groupname, seconds(timeout)).await?;

    if members.is_empty() {
        println!("Group '{groupname}' has no members (or does not exist)");
    } else {
        for member in members {
            println!("{member}");
        }
    }
    Ok(())
}

async fn passwd_command(facade: &DirectoryFacade) -> Result<()> {
    let password = facade.generate_password().await?;
    println!("{password}");
    Ok(())
}

async fn add_group_command(
    facade: &DirectoryFacade,
    name: String,
    members: Vec<String>,
) -> Result<()> {
    let spec = GroupSpec { name, members };
    facade.add_group(&spec).await?;
    println!("✅ Requested creation of group '{}'", spec.name);
    Ok(())
}

async fn del_group_command(facade: &DirectoryFacade, name: &str) -> Result<()> {
    facade.delete_group(name).await?;
    println!("✅ Requested deletion of group '{name}'");
    Ok(())
}
