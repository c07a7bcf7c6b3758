//! Key subcommand handlers.

use clarify_config::CredentialSettings;
use clarify_core::credentials::mask_key;
use clarify_core::{EnvCredentialStore, FileCredentialStore};
use clarify_protocols::CredentialStore;

use crate::cli::KeyAction;

/// Handle key subcommands.
pub(crate) fn handle_key_command(settings: &CredentialSettings, action: KeyAction) -> anyhow::Result<()> {
    let file = FileCredentialStore::new(&settings.path);
    match action {
        KeyAction::Set { key } => {
            file.set_api_key(&key)?;
            println!("API key saved to {}", file.path().display());
        }
        KeyAction::Show => {
            println!("{}", describe_key(&file, &EnvCredentialStore::new(&settings.env_var), &settings.env_var));
        }
        KeyAction::Clear => {
            file.clear()?;
            println!("API key removed from {}", file.path().display());
        }
    }
    Ok(())
}

fn describe_key(file: &FileCredentialStore, env: &EnvCredentialStore, env_var: &str) -> String {
    if let Some(key) = file.api_key() {
        let saved = file
            .saved_at()
            .map(|at| format!(", saved {}", at.format("%Y-%m-%d %H:%M UTC")))
            .unwrap_or_default();
        return format!("{} (from {}{})", mask_key(&key), file.path().display(), saved);
    }
    match env.api_key() {
        Some(key) => format!("{} (from ${})", mask_key(&key), env_var),
        None => "No API key configured".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_show_clear() {
        let dir = TempDir::new().unwrap();
        let settings = CredentialSettings {
            path: dir.path().join("credentials.json"),
            env_var: "CLARIFY_TEST_KEY_UNSET_41c2".to_string(),
        };
        let file = FileCredentialStore::new(&settings.path);
        let env = EnvCredentialStore::new(&settings.env_var);

        assert_eq!(describe_key(&file, &env, &settings.env_var), "No API key configured");

        handle_key_command(&settings, KeyAction::Set { key: "gsk_0123456789wxyz".to_string() }).unwrap();
        let shown = describe_key(&file, &env, &settings.env_var);
        assert!(shown.starts_with("gsk_...wxyz (from "));
        assert!(shown.contains("saved "));

        handle_key_command(&settings, KeyAction::Clear).unwrap();
        assert!(file.api_key().is_none());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let settings = CredentialSettings {
            path: dir.path().join("credentials.json"),
            env_var: "CLARIFY_TEST_KEY_UNSET_41c2".to_string(),
        };
        assert!(handle_key_command(&settings, KeyAction::Set { key: "  ".to_string() }).is_err());
    }
}
