//! Session commands: login, register, logout, whoami.

use secrecy::SecretString;

use flock_client::RegisterInput;
use flock_core::User;

use super::{CliError, Context};

/// Sign in and report the resulting session.
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), CliError> {
    let password = SecretString::from(password);
    ctx.session.login(email, &password).await?;

    match ctx.session.state().user() {
        Some(user) => print_user("Signed in as", user),
        // Credentials were accepted but the session could not be resolved;
        // the next command will retry against the stored tokens.
        None => print_line("Signed in, but the session could not be resolved yet."),
    }
    Ok(())
}

/// Create an account, sign in and report the resulting session.
pub async fn register(
    ctx: &Context,
    name: Option<String>,
    email: String,
    password: String,
) -> Result<(), CliError> {
    let input = RegisterInput {
        name,
        email,
        password: SecretString::from(password),
    };
    ctx.session.register(&input).await?;

    match ctx.session.state().user() {
        Some(user) => print_user("Registered and signed in as", user),
        None => print_line("Registered, but the session could not be resolved yet."),
    }
    Ok(())
}

/// Delete stored credentials. Purely local; no network call.
pub fn logout(ctx: &Context) {
    ctx.session.logout();
    print_line("Signed out.");
}

/// Show the currently signed-in user.
pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    let user = ctx.current_user().await?;
    print_user("Signed in as", &user);
    Ok(())
}

fn print_user(prefix: &str, user: &User) {
    let role = user.role.map_or("unknown role", |r| r.as_str());
    let name = user.name.as_deref().unwrap_or(&user.email);
    print_line(&format!("{prefix} {name} <{}> ({role})", user.email));
}

#[allow(clippy::print_stdout)]
pub(super) fn print_line(line: &str) {
    println!("{line}");
}
