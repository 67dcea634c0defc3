//! Session commands: login, logout, whoami, switch, users.

use anyhow::{Result, bail};
use cmlre::{AccessProfile, Platform, User, UserId};
use comfy_table::Cell;

use crate::OutputFormat;
use crate::style::colors::SemanticStyle;
use crate::style::{
    grant_cell, print_data_table, print_header, print_hint, print_info_table, print_labeled,
    print_spacer, print_success,
};

pub fn login(platform: &Platform, email: &str, password: &str) -> Result<()> {
    let Some(state) = platform.auth().login(email, password)? else {
        bail!("Invalid email or password");
    };
    let Some(user) = state.user else {
        bail!("Login did not produce a session");
    };

    platform.access().log_user_action(&user, "login", "session", None);
    print_success(&format!(
        "Signed in as {} ({})",
        user.name.header(),
        user.role.as_str().info()
    ));
    Ok(())
}

pub fn logout(platform: &Platform) -> Result<()> {
    let previous = platform.auth().restore()?.user;
    platform.auth().logout()?;

    match previous {
        Some(user) => {
            platform.access().log_user_action(&user, "logout", "session", None);
            print_success(&format!("Signed out {}", user.name));
        }
        None => print_hint("No active session"),
    }
    Ok(())
}

pub fn whoami(platform: &Platform, format: OutputFormat) -> Result<()> {
    let Some(user) = platform.auth().restore()?.user else {
        print_hint("Not signed in. Run 'cmlre login <email> --password <password>'.");
        return Ok(());
    };
    let profile = AccessProfile::for_user(&user);

    if let OutputFormat::Json = format {
        let json = serde_json::json!({ "user": user, "profile": profile });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    print_header(&format!("{} <{}>", user.name, user.email));
    print_labeled("ID", &user.id.to_string().code());
    print_labeled("Role", user.role.display_name());
    print_labeled(
        "Department",
        user.department.as_deref().unwrap_or("Not specified"),
    );
    print_labeled("Clearance", profile.clearance.as_str());
    print_labeled(
        "Active permissions",
        &format!("{} of {}", profile.granted, profile.total()),
    );
    print_labeled(
        "Security score",
        &format!("{}%", profile.security_score).info(),
    );
    print_spacer();

    print_info_table(&[
        ("Specializations", join_or_none(user.specializations.iter())),
        ("Project access", join_or_none(user.project_access.iter())),
        (
            "Data classifications",
            join_or_none(user.data_classifications.iter()),
        ),
    ]);

    let rows = profile
        .capabilities
        .iter()
        .map(|c| vec![Cell::new(c.label), grant_cell(c.granted)])
        .collect();
    print_data_table(&["Capability", "Granted"], rows, "capability");
    Ok(())
}

pub fn switch(platform: &Platform, user_id: &str) -> Result<()> {
    let state = platform.auth().switch_user(&UserId::from(user_id))?;
    if let Some(user) = state.user {
        platform.access().log_user_action(&user, "switch_user", "session", None);
        print_success(&format!(
            "Switched to {} ({})",
            user.name.header(),
            user.role.as_str().info()
        ));
    }
    Ok(())
}

pub fn users(platform: &Platform) -> Result<()> {
    let current = platform.auth().restore()?.user.map(|u| u.id);
    let rows = platform
        .auth()
        .directory()
        .users()
        .iter()
        .map(|user| user_row(user, current.as_ref() == Some(&user.id)))
        .collect();

    print_data_table(
        &["", "ID", "Name", "Email", "Role", "Department", "Clearance"],
        rows,
        "user",
    );
    Ok(())
}

fn user_row(user: &User, active: bool) -> Vec<Cell> {
    vec![
        Cell::new(if active { "*" } else { "" }),
        Cell::new(user.id.as_str()),
        Cell::new(&user.name),
        Cell::new(&user.email),
        Cell::new(user.role.as_str()),
        Cell::new(user.department.as_deref().unwrap_or("-")),
        Cell::new(user.effective_clearance().as_str()),
    ]
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = items.map(String::as_str).collect();
    if joined.is_empty() {
        "None assigned".to_string()
    } else {
        joined.join(", ")
    }
}
