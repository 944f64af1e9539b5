//! Member directory commands.

use flock_core::{Member, Role};

use super::auth::print_line;
use super::{CliError, Context};

/// List the directory, optionally filtered by a name/email substring.
pub async fn list(ctx: &Context, query: Option<&str>) -> Result<(), CliError> {
    ctx.current_user().await?;
    let members = ctx.api.list_members().await?;

    let filtered: Vec<&Member> = match query {
        Some(q) => {
            let q = q.trim().to_lowercase();
            members
                .iter()
                .filter(|m| {
                    let haystack =
                        format!("{} {}", m.name, m.email.as_deref().unwrap_or_default());
                    haystack.to_lowercase().contains(&q)
                })
                .collect()
        }
        None => members.iter().collect(),
    };

    if filtered.is_empty() {
        print_line("No members found.");
        return Ok(());
    }

    for member in filtered {
        print_line(&format_member(member));
    }
    Ok(())
}

/// Show one member by id.
pub async fn show(ctx: &Context, id: &str) -> Result<(), CliError> {
    ctx.current_user().await?;
    let member = ctx.api.get_member(id).await?;
    print_line(&format_member(&member));
    Ok(())
}

/// Change a member's role. Manager roles only.
pub async fn set_role(ctx: &Context, id: &str, role: &str) -> Result<(), CliError> {
    ctx.current_manager().await?;

    let role = Role::parse(role).ok_or_else(|| CliError::InvalidRole(role.to_string()))?;
    ctx.api.update_member_role(id, role).await?;

    print_line(&format!("Member {id} is now {role}."));
    Ok(())
}

fn format_member(member: &Member) -> String {
    let id = if member.id.is_empty() { "-" } else { &member.id };
    let email = member.email.as_deref().unwrap_or("-");
    let role = member.role.map_or("-", |r| r.as_str());
    format!("{id:>8}  {:<24}  {email:<28}  {role}", member.name)
}
