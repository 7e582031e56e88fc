//! End-to-end tests: JSON -> .vhs -> JSON through the command modules

use std::path::PathBuf;

use vector_hand::{HandCodec, Layout};
use vhand_cli::config::{CONFIG_FILE_NAME, VhandConfig, load_config};
use vhand_cli::decode::read_stream_file;
use vhand_cli::encode::{EncodeArgs, encode_file};
use vhand_cli::init::{InitArgs, execute as init};
use vhand_cli::inspect::summarize;
use vhand_cli::poses::{read_poses, write_poses};
use vhand_cli::sample::sample_hands;

fn write_sample(dir: &std::path::Path, count: usize) -> PathBuf {
    let path = dir.join("hands.json");
    let file = std::fs::File::create(&path).unwrap();
    write_poses(file, &sample_hands(count), true).unwrap();
    path
}

#[test]
fn test_encode_decode_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path(), 6);

    for layout in Layout::ALL {
        let output = dir.path().join(format!("hands-{}.vhs", layout));
        let header = encode_file(&input, &output, layout).unwrap();
        assert_eq!(header.hand_count, 6);
        assert_eq!(
            std::fs::metadata(&output).unwrap().len() as usize,
            8 + 6 * HandCodec::new(layout).required_byte_count()
        );

        let (parsed, decoded) = read_stream_file(&output).unwrap();
        assert_eq!(parsed.layout, layout);

        let original = read_poses(&input).unwrap();
        for (a, b) in original.iter().zip(&decoded) {
            assert_eq!(a.is_left, b.is_left);
            for ((a0, a1), (b0, b1)) in a.joint_pairs().zip(b.joint_pairs()) {
                assert!(a0.distance(b0) < 0.01, "{} prev joint drift", layout);
                assert!(a1.distance(b1) < 0.01, "{} next joint drift", layout);
            }
        }
    }
}

#[test]
fn test_encode_args_default_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path(), 2);
    let config = VhandConfig::default();

    vhand_cli::encode::execute(
        EncodeArgs {
            input: input.clone(),
            output: None,
            layout: Some(Layout::Compact),
        },
        &config,
    )
    .unwrap();

    let (header, hands) = read_stream_file(&input.with_extension("vhs")).unwrap();
    assert_eq!(header.layout, Layout::Compact, "flag overrides config");
    assert_eq!(hands.len(), 2);
}

#[test]
fn test_encode_rejects_malformed_json_pose() {
    let dir = tempfile::tempdir().unwrap();
    let mut hands = sample_hands(1);
    hands[0].fingers.truncate(3);

    let input = dir.path().join("bad.json");
    write_poses(std::fs::File::create(&input).unwrap(), &hands, false).unwrap();

    let output = dir.path().join("bad.vhs");
    let err = encode_file(&input, &output, Layout::Framed).unwrap_err();
    assert!(
        format!("{:#}", err).contains("expected 5 fingers, found 3"),
        "unexpected error: {:#}",
        err
    );
}

#[test]
fn test_failed_encode_keeps_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_sample(dir.path(), 2);
    let output = dir.path().join("keep.vhs");
    encode_file(&good, &output, Layout::Framed).unwrap();
    let before = std::fs::read(&output).unwrap();

    let mut hands = sample_hands(2);
    hands[1].fingers.truncate(3);
    let bad = dir.path().join("bad.json");
    write_poses(std::fs::File::create(&bad).unwrap(), &hands, false).unwrap();

    assert!(encode_file(&bad, &output, Layout::Framed).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), before);

    let (header, decoded) = read_stream_file(&output).unwrap();
    assert_eq!(header.hand_count, 2);
    assert_eq!(decoded.len(), 2);
}

#[test]
fn test_inspect_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path(), 3);
    let output = dir.path().join("hands.vhs");
    encode_file(&input, &output, Layout::Framed).unwrap();

    let report = summarize(&output).unwrap();
    assert!(report.contains("layout:      framed"));
    assert!(report.contains("record size: 518 bytes"));
    assert!(report.contains("hands:       3"));
    assert!(report.contains("right"));
    assert!(report.contains("left"));
}

#[test]
fn test_init_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let written = init(InitArgs {
        output: Some(path.clone()),
        force: false,
    })
    .unwrap();
    assert_eq!(written, path);
    assert_eq!(load_config(&path).unwrap(), VhandConfig::default());

    // Refuses to clobber without --force
    assert!(
        init(InitArgs {
            output: Some(path.clone()),
            force: false,
        })
        .is_err()
    );
    assert!(
        init(InitArgs {
            output: Some(path),
            force: true,
        })
        .is_ok()
    );
}
