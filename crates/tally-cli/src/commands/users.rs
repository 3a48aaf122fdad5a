//! User provisioning commands

use anyhow::Result;
use tally_core::db::Database;

pub fn cmd_user_add(db: &Database, name: &str) -> Result<()> {
    let user = db.create_user(name)?;

    println!("✅ User '{}' provisioned (id {})", user.name, user.id);
    println!();
    println!("Bearer token (store it somewhere safe, it is not shown again):");
    println!("  {}", user.token);
    println!();
    println!("Use it as: Authorization: Bearer <token>");

    Ok(())
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users provisioned. Add one with: tally user add NAME");
        return Ok(());
    }

    println!("👥 Users");
    println!("   ─────────────────────────────");
    for user in users {
        println!(
            "   {:>4}  {}  (since {})",
            user.id,
            user.name,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
