// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults() {
    let args = Args::try_parse_from(["timerd"]).unwrap();
    assert_eq!(args.config, PathBuf::from("config.yaml"));
    assert_eq!(args.pid_file, PathBuf::from("timerd.pid"));
    assert!(!args.syntax);
    assert!(!args.verbose);
    assert_eq!(args.log_dir(), PathBuf::from("."));
}

#[test]
fn short_flags() {
    let args = Args::try_parse_from(["timerd", "-c", "/etc/timerd/remotes.yaml", "-s", "-v"])
        .unwrap();
    assert_eq!(args.config, PathBuf::from("/etc/timerd/remotes.yaml"));
    assert!(args.syntax);
    assert!(args.verbose);
}

#[test]
fn log_dir_follows_config_file() {
    let args = Args::try_parse_from(["timerd", "--config", "/etc/timerd/remotes.yaml"]).unwrap();
    assert_eq!(args.log_dir(), PathBuf::from("/etc/timerd"));
}

#[test]
fn explicit_log_dir_wins() {
    let args = Args::try_parse_from([
        "timerd",
        "--config",
        "/etc/timerd/remotes.yaml",
        "--log-dir",
        "/var/log/timerd",
    ])
    .unwrap();
    assert_eq!(args.log_dir(), PathBuf::from("/var/log/timerd"));
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Args::try_parse_from(["timerd", "--bogus"]).is_err());
}
