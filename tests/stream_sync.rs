mod common;

use bm25s3221::{Bm25s3221, Config, TelemetryFrame};
use common::{corrupted, telemetry_frame, MockDelay, MockTransport};

fn sensor(stream: &[u8]) -> Bm25s3221<MockTransport, MockDelay> {
    Bm25s3221::new(MockTransport::with_stream(stream), MockDelay::default())
}

fn payload() -> [u8; 26] {
    let mut payload = [0u8; 26];
    // PM1.0, PM2.5 and PM10, factory environment
    payload[0..6].copy_from_slice(&[0x00, 0x05, 0x00, 0x07, 0x00, 0x09]);
    payload[24] = 0x97;
    payload
}

#[test]
fn short_stream_is_not_available() {
    let frame = telemetry_frame(payload());
    let mut module = sensor(&frame[..31]);

    assert_eq!(module.is_info_available(), Ok(false));

    // nothing was consumed
    let (transport, _) = module.release();
    assert_eq!(transport.incoming.len(), 31);
}

#[test]
fn frame_is_found_and_extracted() {
    let frame = telemetry_frame(payload());
    let mut module = sensor(&frame);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), frame);
}

#[test]
fn leading_noise_is_skipped() {
    let frame = telemetry_frame(payload());
    let mut stream = vec![0x00, 0x13, 0x4D, 0xFF, 0x1C];
    stream.extend_from_slice(&frame);
    let mut module = sensor(&stream);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), frame);
}

#[test]
fn pure_noise_fails_fast() {
    let mut module = sensor(&[0x55; 100]);

    assert_eq!(module.is_info_available(), Ok(false));

    // at most available - 32 bytes may be skipped, plus the one that broke the budget
    let (transport, _) = module.release();
    assert_eq!(transport.incoming.len(), 100 - (100 - 32) - 1);
}

#[test]
fn three_corrupted_frames_then_valid_one_is_found() {
    let frame = telemetry_frame(payload());
    let mut stream = Vec::new();
    for _ in 0..3 {
        stream.extend_from_slice(&corrupted(frame));
    }
    stream.extend_from_slice(&frame);
    let mut module = sensor(&stream);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), frame);
}

#[test]
fn four_corrupted_frames_exhaust_the_attempts() {
    let frame = telemetry_frame(payload());
    let mut stream = Vec::new();
    for _ in 0..4 {
        stream.extend_from_slice(&corrupted(frame));
    }
    stream.extend_from_slice(&frame);
    let mut module = sensor(&stream);

    assert_eq!(module.is_info_available(), Ok(false));
    assert_eq!(module.read_info_packet(), [0u8; 32]);

    // the search stopped right after the fourth bad frame, the next call finds the valid one
    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), frame);
}

#[test]
fn attempt_budget_follows_config() {
    let frame = telemetry_frame(payload());
    let mut stream = corrupted(frame).to_vec();
    stream.extend_from_slice(&frame);

    let config = Config {
        max_sync_failures: 0,
        ..Config::default()
    };
    let mut module = Bm25s3221::with_config(
        MockTransport::with_stream(&stream),
        MockDelay::default(),
        config,
    );

    assert_eq!(module.is_info_available(), Ok(false));
}

#[test]
fn broken_headers_count_as_attempts() {
    let frame = telemetry_frame(payload());
    let mut stream = vec![0x42, 0x4D, 0x00, 0x00, 0x42, 0x00];
    stream.extend_from_slice(&frame);
    let mut module = sensor(&stream);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), frame);
}

#[test]
fn second_extraction_is_zeroed() {
    let frame = telemetry_frame(payload());
    let mut module = sensor(&frame);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), frame);
    assert_eq!(module.read_info_packet(), [0u8; 32]);
}

#[test]
fn extraction_without_sync_is_zeroed() {
    let mut module = sensor(&[]);
    assert_eq!(module.read_info_packet(), [0u8; 32]);
}

#[test]
fn failed_check_drops_earlier_frame() {
    let frame = telemetry_frame(payload());
    let mut module = sensor(&frame);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.is_info_available(), Ok(false));
    assert_eq!(module.read_info_packet(), [0u8; 32]);
}

#[test]
fn consecutive_frames_are_read_one_per_call() {
    let first = telemetry_frame(payload());
    let mut second_payload = payload();
    second_payload[3] = 0x06;
    let second = telemetry_frame(second_payload);

    let mut stream = first.to_vec();
    stream.extend_from_slice(&second);
    let mut module = sensor(&stream);

    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), first);
    assert_eq!(module.is_info_available(), Ok(true));
    assert_eq!(module.read_info_packet(), second);
    assert_eq!(module.is_info_available(), Ok(false));
}

#[test]
fn extracted_frame_decodes() {
    let mut module = sensor(&telemetry_frame(payload()));

    assert_eq!(module.is_info_available(), Ok(true));
    let frame = TelemetryFrame::from_bytes(&module.read_info_packet()).unwrap();

    assert_eq!(frame.frame_length, 0x1C);
    assert_eq!(frame.pm1_0, 5);
    assert_eq!(frame.pm2_5, 7);
    assert_eq!(frame.pm10, 9);
    assert_eq!(frame.reserved, 0x9700);
}

#[test]
fn synchronizer_never_waits() {
    let frame = telemetry_frame(payload());
    let mut stream = vec![0x00; 3];
    stream.extend_from_slice(&frame[..20]);
    let mut module = sensor(&stream);

    assert_eq!(module.is_info_available(), Ok(false));
    let (_, delay) = module.release();
    assert!(delay.calls.is_empty());
}
