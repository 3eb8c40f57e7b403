use anyhow::{bail, Context, Result};
use hr_client::{Session, SessionContext};
use std::io::{self, Write};

/// Run the interactive login flow:
/// 1. Ask for the email on stdin
/// 2. Ask for the password without echo
/// 3. POST /auth/login and persist the returned token
pub async fn run_login(ctx: &SessionContext) -> Result<Session> {
    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin()
        .read_line(&mut email)
        .context("Failed to read email")?;
    let email = email.trim();
    if email.is_empty() {
        bail!("Email is required");
    }

    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    if password.is_empty() {
        bail!("Password is required");
    }

    let session = ctx
        .login(email, &password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Login failed")))?;

    println!("Logged in as {}.", session.user().full_name());
    if session.must_change_password() {
        println!("Your password must be changed. Please update it in the web portal.");
    }
    Ok(session)
}
