use clap::{CommandFactory, Parser};
use cookdb::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["cookdb", "check", "content://fx/bloom.fx"],
        vec!["cookdb", "check", "fx/bloom.fx", "--details"],
        vec!["cookdb", "deps", "content://fx/common.fxh"],
        vec!["cookdb", "show", "content://ui/foo.png"],
        vec![
            "cookdb",
            "update",
            "content://fx/bloom.fx",
            "--source",
            "content://fx/bloom.fx",
            "--source",
            "content://fx/common.fxh",
            "--directory",
            "content://fx/includes",
        ],
        vec![
            "cookdb",
            "update",
            "content://ui/foo.png",
            "--cooked-timestamp",
            "1000",
            "--sibling",
            "content://ui/foo.sif1",
        ],
        vec!["cookdb", "versions"],
        vec!["cookdb", "config"],
        vec!["cookdb", "watch", "--seconds", "5", "--poll-ms", "50"],
        vec!["cookdb", "--platform", "Android", "versions"],
        vec![
            "cookdb",
            "--workspace",
            "/tmp/ws",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "check",
            "content://a.fx",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_invocations() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["cookdb"],
        vec!["cookdb", "check"],
        vec!["cookdb", "show", "a.fx", "b.fx"],
        vec!["cookdb", "update", "a.fx", "--cooked-timestamp", "yesterday"],
        vec!["cookdb", "watch", "--seconds", "-1"],
        vec!["cookdb", "rebuild"],
    ];

    for args in cases {
        assert!(
            Cli::try_parse_from(args.clone()).is_err(),
            "expected parse failure for args: {args:?}"
        );
    }
}

#[test]
fn repeated_dependency_flags_accumulate() {
    let cli = Cli::try_parse_from([
        "cookdb",
        "update",
        "content://x.fx",
        "--source",
        "content://x.fx",
        "--source",
        "content://y.fxh",
        "--directory",
        "content://inc",
    ])
    .unwrap();
    match cli.command {
        Commands::Update {
            sources,
            siblings,
            directories,
            cooked_timestamp,
            ..
        } => {
            assert_eq!(sources.len(), 2);
            assert!(siblings.is_empty());
            assert_eq!(directories, vec!["content://inc".to_string()]);
            assert_eq!(cooked_timestamp, None);
        }
        _ => panic!("expected update command"),
    }
}

#[test]
fn watch_defaults() {
    let cli = Cli::try_parse_from(["cookdb", "watch"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Watch {
            seconds: 60,
            poll_ms: 250
        }
    ));
}

#[test]
fn top_level_help_lists_every_command() {
    let mut command = Cli::command();
    let mut output = Vec::new();
    command.write_long_help(&mut output).unwrap();
    let help = String::from_utf8(output).unwrap();
    for name in ["check", "deps", "show", "update", "versions", "config", "watch"] {
        assert!(help.contains(name), "help is missing {name}");
    }
}
