//! `passvault edit`: change fields of an existing credential.
//!
//! With flags, only the given fields change.  Without any flag, every
//! field is prompted for with the current value as the default (the
//! password prompt keeps the old password when left empty).

use dialoguer::{Input, Password};

use crate::audit::{log_audit, AuditOp};
use crate::cli::output;
use crate::cli::{open_session, Cli, FieldArgs};
use crate::errors::{Result, VaultError};
use crate::vault::EntryFields;

/// Execute the `edit` command.
pub fn execute(cli: &Cli, id: &str, args: &FieldArgs) -> Result<()> {
    let (mut session, _settings) = open_session(cli)?;

    let store = session.store()?;
    let id = store.resolve(id)?;
    let current = store
        .get(id)
        .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;

    let fields = if args.is_empty() {
        prompt_fields(current.fields())?
    } else {
        apply_flags(current.fields(), args)
    };
    let edited = current.revise(fields)?;
    let short_id = edited.short_id();

    session.store_mut()?.update(edited)?;
    session.save()?;

    log_audit(cli, AuditOp::Edit, Some(&short_id), None);
    output::success(&format!("Updated entry {short_id}"));

    Ok(())
}

/// Overwrite the fields given on the command line.
fn apply_flags(mut fields: EntryFields, args: &FieldArgs) -> EntryFields {
    let FieldArgs {
        website,
        url,
        username,
        password,
        note,
    } = args;
    for (target, value) in [
        (&mut fields.website_name, website),
        (&mut fields.url, url),
        (&mut fields.username, username),
        (&mut fields.password, password),
        (&mut fields.note, note),
    ] {
        if let Some(value) = value {
            *target = value.clone();
        }
    }
    fields
}

fn prompt_fields(current: EntryFields) -> Result<EntryFields> {
    let input = |prompt: &str, initial: &str, optional: bool| {
        Input::<String>::new()
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(optional)
            .interact_text()
            .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
    };

    let password = Password::new()
        .with_prompt("Password (empty keeps the current one)")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

    Ok(EntryFields {
        website_name: input("Website", &current.website_name, false)?,
        url: input("URL", &current.url, false)?,
        username: input("Username", &current.username, false)?,
        password: if password.is_empty() {
            current.password.clone()
        } else {
            password
        },
        note: input("Note", &current.note, true)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_flags_change() {
        let current = EntryFields {
            website_name: "GitHub".into(),
            url: "https://github.com".into(),
            username: "octocat".into(),
            password: "old".into(),
            note: "n".into(),
        };
        let args = FieldArgs {
            password: Some("new".into()),
            note: Some(String::new()),
            ..FieldArgs::default()
        };
        let fields = apply_flags(current, &args);
        assert_eq!(fields.website_name, "GitHub");
        assert_eq!(fields.password, "new");
        assert_eq!(fields.note, "");
    }
}
