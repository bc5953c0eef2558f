//! Integration tests for log replay and peer encoding.

use hexwire::prelude::*;

const CAPTURE: &str = "# captured from a 2.x server\n\
1039|ga,2,3\n\
SOCJoin:nickname=m name|password empty|host=-|channel=ch name\n\
\n\
1005|cha\0member name\0msg which may,have,delimiters\n\
9999|nope\n\
SOCGameState:game=ga|state=20\r\n\
garbage line\n";

#[tokio::test]
async fn test_replay_counts_and_failures() {
    let report = Replayer::default().replay(CAPTURE.as_bytes()).await.unwrap();

    assert_eq!(report.lines, 6);
    assert_eq!(report.decoded(), 4);
    assert_eq!(report.counts["SOCAcceptOffer"], 1);
    assert_eq!(report.counts["SOCJoinChannel"], 1);
    assert_eq!(report.counts["SOCChannelTextMsg"], 1);
    assert_eq!(report.counts["SOCGameState"], 1);

    let failed: Vec<usize> = report.failures.iter().map(|f| f.line).collect();
    assert_eq!(failed, [6, 8]);
    assert!(report.failures[0].reason.contains("9999"));
    assert_eq!(report.round_trip_mismatches, 0);
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_replay_halts_on_first_failure() {
    let replayer = Replayer::new(ReplayConfig {
        halt_on_error: true,
        ..ReplayConfig::default()
    });
    let err = replayer.replay(CAPTURE.as_bytes()).await.unwrap_err();
    assert!(matches!(err, HexwireError::ReplayHalted { line: 6, .. }));
}

#[tokio::test]
async fn test_replay_reports_wire_mismatch() {
    // The trailing player number is optional on read but always written.
    let capture = "1040|ga,0,0,2,0,0,1,0,0,0,0\n1040|ga,0,0,2,0,0,1,0,0,0,0,3\n";
    let report = Replayer::default().replay(capture.as_bytes()).await.unwrap();
    assert_eq!(report.counts["SOCBankTrade"], 2);
    assert_eq!(report.round_trip_mismatches, 1);

    let unchecked = Replayer::new(ReplayConfig {
        verify_round_trip: false,
        ..ReplayConfig::default()
    });
    let report = unchecked.replay(capture.as_bytes()).await.unwrap();
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_masked_password_is_not_a_mismatch() {
    let capture = "SOCJoinChannel:nickname=m|password=secret|host=-|channel=ch\n";
    let report = Replayer::default().replay(capture.as_bytes()).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.decoded(), 1);
}

#[tokio::test]
async fn test_empty_capture() {
    let report = Replayer::default().replay(&b""[..]).await.unwrap();
    assert_eq!(report, ReplayReport::default());
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_report_serializes() {
    let report = Replayer::default().replay(CAPTURE.as_bytes()).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["lines"], 6);
    assert_eq!(json["counts"]["SOCGameState"], 1);
    assert_eq!(json["failures"][1]["line"], 8);
}

#[test]
fn test_config_from_json_fills_defaults() {
    let config: ReplayConfig =
        serde_json::from_str(r#"{"form":"wire","halt_on_error":true}"#).unwrap();
    assert_eq!(config.form, LineForm::Wire);
    assert!(config.halt_on_error);
    assert!(config.verify_round_trip);
    assert_eq!(config.max_line_len, 65536);
}

#[test]
fn test_peer_encoder_splits_seat_locks_for_old_peers() {
    let msg = Message::from(
        SetSeatLock::all_seats(
            "ga",
            vec![
                SeatLockState::Locked,
                SeatLockState::Unlocked,
                SeatLockState::ClearOnReset,
                SeatLockState::Locked,
            ],
        )
        .unwrap(),
    );
    let old = PeerEncoder::new(1118).encode(&msg).unwrap();
    assert_eq!(
        old,
        ["1068|ga,0,true", "1068|ga,1,false", "1068|ga,2,false", "1068|ga,3,true"]
    );
    let new = PeerEncoder::new(2000).encode(&msg).unwrap();
    assert_eq!(new, ["1068|ga,true,false,clear,true"]);
}

#[test]
fn test_peer_encoder_rejects_types_newer_than_peer() {
    let msg = from_wire("1102|ga,2,3,R,4,5,F,7,4").unwrap();
    let err = PeerEncoder::new(2000).encode(&msg).unwrap_err();
    assert!(matches!(
        err,
        HexwireError::Compat(CompatError::PeerTooOld { .. })
    ));
    assert_eq!(PeerEncoder::new(2450).encode(&msg).unwrap(), ["1102|ga,2,3,R,4,5,F,7,4"]);
}
