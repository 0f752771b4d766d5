//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use tracing::warn;

use crate::backup::BackupManager;
use crate::error::{VaultError, VaultResult};

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Snapshot the current document
    Create,

    /// List all available backups, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore the document from a backup
    Restore {
        /// Backup filename (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific backup
    Info {
        /// Backup filename (use 'latest' for most recent)
        backup: String,
    },
}

/// Handle a backup command
pub fn handle_backup_command(manager: &BackupManager, cmd: BackupCommands) -> VaultResult<()> {
    match cmd {
        BackupCommands::Create => {
            let filename = manager.snapshot()?;
            println!("Backup created: {}", filename);
            println!("Location: {}", manager.backup_dir().join(&filename).display());
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: config-vault backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created);
                let age_str = format_duration(age);

                if verbose {
                    println!(
                        "{}. {}\n   Modified: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        age_str,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let filename = resolve_backup_name(manager, &backup)?;
            let validation = manager.validate(&filename)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", filename);
            println!(
                "Modified: {}",
                validation.created.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Status: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will overwrite the current config document!");
                println!("To proceed, run again with --force flag:");
                println!("  config-vault backup restore {} --force", backup);
                return Ok(());
            }

            // Keep the current document recoverable
            println!("Creating backup of current document before restore...");
            match manager.snapshot() {
                Ok(pre_restore) => println!("Pre-restore backup saved: {}", pre_restore),
                Err(VaultError::StorageRead(reason)) => {
                    warn!(%reason, "current document is unreadable, restoring without a pre-restore backup");
                    println!("Current document is unreadable, skipping pre-restore backup.");
                }
                Err(e) => return Err(e),
            }
            println!();

            let doc = manager.restore(&filename)?;
            println!("Restore complete! {} section(s) restored.", doc.len());
        }

        BackupCommands::Info { backup } => {
            let filename = resolve_backup_name(manager, &backup)?;
            let validation = manager.validate(&filename)?;

            println!("Backup Details");
            println!("==============");
            println!("File: {}", validation.filename);
            println!("Size: {}", format_size(validation.size_bytes));
            println!(
                "Modified: {}",
                validation.created.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!();
            if validation.is_object {
                println!("Sections:");
                for section in &validation.sections {
                    println!("  {}", section);
                }
                println!();
            }
            println!("Status: {}", validation.summary());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a filename in the backup directory
fn resolve_backup_name(manager: &BackupManager, backup: &str) -> VaultResult<String> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest()?
            .map(|b| b.filename)
            .ok_or_else(|| VaultError::BackupNotFound("latest".to_string()));
    }

    // Accept the bare timestamp part as shorthand
    if manager.get_backup(backup)?.is_none() {
        let expanded = format!(
            "{}{}{}",
            crate::backup::BACKUP_PREFIX,
            backup,
            crate::backup::BACKUP_SUFFIX
        );
        if manager.get_backup(&expanded)?.is_some() {
            return Ok(expanded);
        }
    }

    Ok(backup.to_string())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ConfigStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path().join("config.json"));
        store.replace(json!({"theme": "dark"})).unwrap();
        let manager = BackupManager::new(temp_dir.path().join("backups"), store);
        (manager, temp_dir)
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(5)), "5s");
        assert_eq!(format_duration(chrono::Duration::minutes(3)), "3m");
        assert_eq!(format_duration(chrono::Duration::hours(5)), "5h");
        assert_eq!(format_duration(chrono::Duration::days(2)), "2d");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
        assert_eq!(format_duration(chrono::Duration::seconds(-3)), "0s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_resolve_latest_without_backups() {
        let (manager, _temp) = create_test_manager();
        let err = resolve_backup_name(&manager, "latest").unwrap_err();
        assert!(matches!(err, VaultError::BackupNotFound(_)));
    }

    #[test]
    fn test_resolve_latest_and_shorthand() {
        let (manager, _temp) = create_test_manager();
        let filename = manager.snapshot().unwrap();

        assert_eq!(resolve_backup_name(&manager, "LATEST").unwrap(), filename);

        let stamp = filename
            .strip_prefix(crate::backup::BACKUP_PREFIX)
            .and_then(|s| s.strip_suffix(crate::backup::BACKUP_SUFFIX))
            .unwrap();
        assert_eq!(resolve_backup_name(&manager, stamp).unwrap(), filename);
        assert_eq!(resolve_backup_name(&manager, &filename).unwrap(), filename);
    }

    #[test]
    fn test_restore_requires_force() {
        let (manager, _temp) = create_test_manager();
        let filename = manager.snapshot().unwrap();

        handle_backup_command(
            &manager,
            BackupCommands::Restore {
                backup: filename,
                force: false,
            },
        )
        .unwrap();

        // Nothing restored, no pre-restore snapshot taken
        assert_eq!(manager.list().unwrap().len(), 1);
    }

    #[test]
    fn test_forced_restore_takes_pre_restore_snapshot() {
        let (manager, temp) = create_test_manager();
        let filename = manager.snapshot().unwrap();
        std::fs::write(temp.path().join("config.json"), r#"{"a":1}"#).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        handle_backup_command(
            &manager,
            BackupCommands::Restore {
                backup: filename,
                force: true,
            },
        )
        .unwrap();

        assert_eq!(manager.list().unwrap().len(), 2);
        let doc = crate::storage::read_json_value(temp.path().join("config.json")).unwrap();
        assert_eq!(doc, json!({"theme": "dark"}));
    }

    #[test]
    fn test_forced_restore_over_corrupt_document() {
        let (manager, temp) = create_test_manager();
        let filename = manager.snapshot().unwrap();
        std::fs::write(temp.path().join("config.json"), "{ corrupt").unwrap();

        handle_backup_command(
            &manager,
            BackupCommands::Restore {
                backup: filename,
                force: true,
            },
        )
        .unwrap();

        // Unreadable document cannot be snapshotted, restore still goes ahead
        assert_eq!(manager.list().unwrap().len(), 1);
        let doc = crate::storage::read_json_value(temp.path().join("config.json")).unwrap();
        assert_eq!(doc, json!({"theme": "dark"}));
    }

    #[test]
    fn test_forced_restore_over_missing_document() {
        let (manager, temp) = create_test_manager();
        let filename = manager.snapshot().unwrap();
        std::fs::remove_file(temp.path().join("config.json")).unwrap();

        handle_backup_command(
            &manager,
            BackupCommands::Restore {
                backup: filename,
                force: true,
            },
        )
        .unwrap();

        let doc = crate::storage::read_json_value(temp.path().join("config.json")).unwrap();
        assert_eq!(doc, json!({"theme": "dark"}));
    }
}
