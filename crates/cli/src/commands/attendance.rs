//! Attendance commands.

use super::auth::print_line;
use super::{CliError, Context};

/// Record a check-in for yourself, or for another member (managers only).
pub async fn check_in(ctx: &Context, member: Option<&str>) -> Result<(), CliError> {
    require_self_or_manager(ctx, member).await?;
    ctx.api.check_in(member).await?;

    match member {
        Some(id) => print_line(&format!("Checked in member {id}.")),
        None => print_line("Checked in."),
    }
    Ok(())
}

/// Record a check-out for yourself, or for another member (managers only).
pub async fn check_out(ctx: &Context, member: Option<&str>) -> Result<(), CliError> {
    require_self_or_manager(ctx, member).await?;
    ctx.api.check_out(member).await?;

    match member {
        Some(id) => print_line(&format!("Checked out member {id}.")),
        None => print_line("Checked out."),
    }
    Ok(())
}

/// Checking another member in or out is reserved for manager roles; the
/// backend enforces this too, but failing early gives a clearer message.
async fn require_self_or_manager(ctx: &Context, member: Option<&str>) -> Result<(), CliError> {
    if member.is_some() {
        ctx.current_manager().await?;
    } else {
        ctx.current_user().await?;
    }
    Ok(())
}
