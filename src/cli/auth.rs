//! Authentication CLI commands
//!
//! Sign-up, sign-in, sign-out and password change. Passwords come from a
//! flag, an environment variable or a hidden prompt, in that order.

use clap::Subcommand;

use crate::config::Settings;
use crate::crypto::SecureString;
use crate::error::{ExpenseError, ExpenseResult};
use crate::services::AuthService;
use crate::storage::Storage;

/// Authentication subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account and sign in
    #[command(alias = "register")]
    Signup {
        /// Email address
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in
    #[command(alias = "signin")]
    Login {
        /// Email address
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out
    #[command(alias = "signout")]
    Logout,
    /// Show who is signed in
    Status,
    /// Change your password
    Passwd {
        /// Current password
        #[arg(long, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
        current: Option<String>,
        /// New password
        #[arg(long = "new", env = "EXPENSE_TRACKER_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
        /// New password again
        #[arg(long, env = "EXPENSE_TRACKER_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: Option<String>,
    },
}

/// Handle an auth command
pub fn handle_auth_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AuthCommands,
) -> ExpenseResult<()> {
    let auth = AuthService::new(storage, settings);

    match cmd {
        AuthCommands::Signup { email, password } => {
            let password = match password {
                Some(p) => SecureString::new(p),
                None => prompt_new_password()?,
            };

            let user = auth.sign_up(&email, &password)?;
            println!("Account created. Signed in as {}", user.email);
        }

        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password, "Password: ")?;

            let user = auth.sign_in(&email, &password)?;
            println!("Signed in as {}", user.email);
        }

        AuthCommands::Logout => match auth.sign_out()? {
            Some(email) => println!("Signed out {}", email),
            None => println!("Not signed in."),
        },

        AuthCommands::Status => match auth.current_user()? {
            Some(user) => {
                println!("Signed in as {}", user.email);
                println!("  User ID: {}", user.id.short());
                println!(
                    "  Password last changed: {}",
                    user.password_changed_at.format("%Y-%m-%d %H:%M UTC")
                );
            }
            None => println!("Not signed in."),
        },

        AuthCommands::Passwd {
            current,
            new_password,
            confirm,
        } => {
            let user = auth.require_user()?;

            let current = password_or_prompt(current, "Current password: ")?;
            let new_password = password_or_prompt(new_password, "New password: ")?;
            let confirm = password_or_prompt(confirm, "Confirm new password: ")?;

            auth.update_password(&user, &current, &new_password, &confirm)?;
            println!("Password updated successfully!");
        }
    }

    Ok(())
}

/// Use the given password or ask for it
fn password_or_prompt(given: Option<String>, prompt: &str) -> ExpenseResult<SecureString> {
    match given {
        Some(p) => Ok(SecureString::new(p)),
        None => prompt_password(prompt),
    }
}

/// Ask for a new password twice
fn prompt_new_password() -> ExpenseResult<SecureString> {
    let first = prompt_password("Password: ")?;
    let second = prompt_password("Confirm password: ")?;

    if first != second {
        return Err(ExpenseError::Validation("Passwords do not match.".into()));
    }
    Ok(first)
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> ExpenseResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| ExpenseError::Io(format!("Failed to read password: {}", e)))
}
