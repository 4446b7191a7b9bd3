use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["centrefind"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.sources.is_none());
}

#[test]
fn parses_nearest_with_coordinates() {
    let cli = Cli::try_parse_from([
        "centrefind",
        "nearest",
        "--lat",
        "51.5",
        "--lon",
        "-0.12",
        "-k",
        "5",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Nearest {
            lat,
            lon,
            address,
            k,
            min_separation,
            json,
        }) => {
            assert_eq!(lat, Some(51.5));
            assert_eq!(lon, Some(-0.12));
            assert!(address.is_none());
            assert_eq!(k, Some(5));
            assert!(min_separation.is_none());
            assert!(!json);
        }
        other => panic!("expected nearest, got {other:?}"),
    }
}

#[test]
fn parses_nearest_with_address_and_separation() {
    let cli = Cli::try_parse_from([
        "centrefind",
        "nearest",
        "--address",
        "10 Downing Street London",
        "--min-separation",
        "0.5",
        "--json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Nearest {
            address: Some(ref a),
            min_separation: Some(sep),
            json: true,
            ..
        }) if a == "10 Downing Street London" && (sep - 0.5).abs() < f64::EPSILON
    ));
}

#[test]
fn nearest_requires_a_target() {
    assert!(Cli::try_parse_from(["centrefind", "nearest"]).is_err());
}

#[test]
fn nearest_lat_requires_lon() {
    assert!(Cli::try_parse_from(["centrefind", "nearest", "--lat", "51.5"]).is_err());
}

#[test]
fn nearest_rejects_address_with_coordinates() {
    let result = Cli::try_parse_from([
        "centrefind",
        "nearest",
        "--lat",
        "51.5",
        "--lon",
        "-0.12",
        "--address",
        "somewhere",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_consolidate_json() {
    let cli = Cli::try_parse_from(["centrefind", "consolidate", "--json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Consolidate { json: true })
    ));
}

#[test]
fn sources_flag_is_global() {
    let cli = Cli::try_parse_from(["centrefind", "check-config", "--sources", "/tmp/s.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    assert_eq!(cli.sources, Some(PathBuf::from("/tmp/s.yaml")));
}
