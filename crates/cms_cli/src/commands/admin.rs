//! Admin account and session commands.
//!
//! The first admin can be added by anyone; every further account needs a
//! signed-in admin.

use anyhow::bail;
use clap::Subcommand;
use cms_core::{AdminConsole, AdminDirectory, RecordStore, SessionPersistence};
use log::info;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Register a new admin account
    Add {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "CMS_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Delete the signed-in admin account and end its session
    RemoveSelf,
}

pub fn run<S, P>(console: &AdminConsole<'_, S, P>, action: AdminAction) -> anyhow::Result<()>
where
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    let directory = AdminDirectory::new(console.store());
    match action {
        AdminAction::Add { username, password } => {
            if !directory.is_empty()? && !console.session().is_authenticated() {
                bail!("admin login required to add another admin");
            }
            let identity = directory.register(&username, &password)?;
            info!("event=cli_admin_add module=cli status=ok id={}", identity.id);
            println!("added admin {} ({})", identity.username, identity.id);
        }
        AdminAction::RemoveSelf => {
            let Some(identity) = console.session().current_identity() else {
                bail!("admin login required");
            };
            directory.remove(&identity)?;
            console.sign_out()?;
            println!("removed admin {}", identity.username);
        }
    }
    Ok(())
}

pub fn login<S, P>(
    console: &AdminConsole<'_, S, P>,
    username: &str,
    password: &str,
) -> anyhow::Result<()>
where
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    let identity = console.sign_in(username, password)?;
    println!("signed in as {}", identity.username);
    Ok(())
}

pub fn logout<S, P>(console: &AdminConsole<'_, S, P>) -> anyhow::Result<()>
where
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    console.sign_out()?;
    println!("signed out");
    Ok(())
}

pub fn whoami<S, P>(console: &AdminConsole<'_, S, P>) -> anyhow::Result<()>
where
    S: RecordStore + ?Sized,
    P: SessionPersistence,
{
    match console.session().current_identity() {
        Some(identity) => println!("{} ({})", identity.username, identity.id),
        None => println!("anonymous"),
    }
    Ok(())
}
