//! Tests for the mirror subcommand and config overrides.

use super::parse;
use crate::cli::{apply_overrides, CliCommand};
use std::path::{Path, PathBuf};
use twing_core::config::MirrorConfig;

#[test]
fn cli_parse_mirror_defaults() {
    let cli = parse(&["twing", "mirror"]);
    assert!(!cli.log_file);
    match cli.command {
        CliCommand::Mirror {
            input,
            backup_root,
            sheets,
            dry_run,
        } => {
            assert!(input.is_none());
            assert!(backup_root.is_none());
            assert!(sheets.is_empty());
            assert!(!dry_run);
        }
        _ => panic!("expected Mirror"),
    }
}

#[test]
fn cli_parse_mirror_all_flags() {
    let cli = parse(&[
        "twing",
        "mirror",
        "--input",
        "data/db.xlsx",
        "-o",
        "/srv/backup",
        "--sheet",
        "Photos",
        "--sheet",
        "Art",
        "--dry-run",
        "--log-file",
    ]);
    assert!(cli.log_file);
    match cli.command {
        CliCommand::Mirror {
            input,
            backup_root,
            sheets,
            dry_run,
        } => {
            assert_eq!(input.as_deref(), Some(Path::new("data/db.xlsx")));
            assert_eq!(backup_root.as_deref(), Some(Path::new("/srv/backup")));
            assert_eq!(sheets, vec!["Photos", "Art"]);
            assert!(dry_run);
        }
        _ => panic!("expected Mirror with flags"),
    }
}

#[test]
fn overrides_replace_only_given_values() {
    let base = MirrorConfig::default();
    let cfg = apply_overrides(base.clone(), Some(PathBuf::from("x.xlsx")), None);
    assert_eq!(cfg.input_file, PathBuf::from("x.xlsx"));
    assert_eq!(cfg.backup_root, base.backup_root);

    let cfg = apply_overrides(base.clone(), None, Some(PathBuf::from("/b")));
    assert_eq!(cfg.input_file, base.input_file);
    assert_eq!(cfg.backup_root, PathBuf::from("/b"));
}
