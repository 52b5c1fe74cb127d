use moq_protocol::codec::{write_string, write_u53, write_u62, write_u8, Encode};
use moq_protocol::error::Error;
use moq_protocol::message::*;
use moq_protocol::params::Parameters;
use moq_protocol::types::*;
use moq_protocol::varint::{MAX_U53, MAX_VARINT};

/// Wrap a hand-built payload in a frame header with the given declared length.
fn frame(id: u64, declared: u64, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_u53(&mut buf, id).unwrap();
    write_u53(&mut buf, declared).unwrap();
    buf.extend_from_slice(payload);
    buf
}

fn namespace_bytes(parts: &[&str]) -> Vec<u8> {
    TrackNamespace::from_strings(parts)
        .unwrap()
        .encode_to_vec()
        .unwrap()
}

/// SUBSCRIBE payload up to (not including) the group order byte.
fn subscribe_prefix() -> Vec<u8> {
    let mut buf = Vec::new();
    write_u62(&mut buf, 1).unwrap();
    write_u62(&mut buf, 2).unwrap();
    buf.extend(namespace_bytes(&["live"]));
    write_string(&mut buf, "video").unwrap();
    write_u8(&mut buf, 127);
    buf
}

// ---------------------------------------------------------------------------
// A. Framing
// ---------------------------------------------------------------------------

#[test]
fn declared_length_too_long() {
    let payload = [0x05, 0xff];
    let buf = frame(Unsubscribe::ID, 2, &payload);
    assert_eq!(
        decode_message(&buf),
        Err(Error::FrameLengthMismatch {
            declared: 2,
            consumed: 1
        })
    );
}

#[test]
fn declared_length_too_short() {
    // MAX_SUBSCRIBE_ID with a 2-byte varint but only 1 byte declared.
    let buf = frame(MaxSubscribeId::ID, 1, &[0x40, 0x64]);
    assert_eq!(
        decode_message(&buf),
        Err(Error::FrameOverrun { declared: 1 })
    );
}

#[test]
fn length_mismatch_is_a_protocol_violation() {
    let buf = frame(Unsubscribe::ID, 3, &[0x01, 0x02, 0x03]);
    let err = decode_message(&buf).unwrap_err();
    assert!(err.is_protocol_violation());
}

#[test]
fn header_beyond_u53_rejected() {
    let mut buf = Vec::new();
    write_u62(&mut buf, MAX_U53 + 1).unwrap();
    write_u8(&mut buf, 0);
    assert_eq!(decode_message(&buf), Err(Error::IntegerOverflow(MAX_U53 + 1)));
}

#[test]
fn unknown_message_type_is_fatal() {
    let buf = frame(0x01, 0, &[]);
    let err = decode_message(&buf).unwrap_err();
    assert_eq!(err, Error::UnknownMessageType(0x01));
    assert!(err.is_protocol_violation());
}

#[test]
fn go_away_is_not_fatal() {
    let buf = frame(MSG_GO_AWAY, 0, &[]);
    let err = decode_message(&buf).unwrap_err();
    assert_eq!(err, Error::Unsupported("go_away"));
    assert!(!err.is_protocol_violation());
}

// ---------------------------------------------------------------------------
// B. Enum bounds
// ---------------------------------------------------------------------------

#[test]
fn subscribe_group_order_out_of_range() {
    for order in [3u8, 4, 0x7f, 0xff] {
        let mut payload = subscribe_prefix();
        write_u8(&mut payload, order);
        write_u62(&mut payload, 1).unwrap();
        write_u53(&mut payload, 0).unwrap();
        let buf = frame(Subscribe::ID, payload.len() as u64, &payload);
        assert_eq!(decode_message(&buf), Err(Error::InvalidGroupOrder(order)));
    }
}

#[test]
fn subscribe_location_mode_out_of_range() {
    for mode in [0u64, 5, 0x40, MAX_VARINT] {
        let mut payload = subscribe_prefix();
        write_u8(&mut payload, 0);
        write_u62(&mut payload, mode).unwrap();
        write_u53(&mut payload, 0).unwrap();
        let buf = frame(Subscribe::ID, payload.len() as u64, &payload);
        assert_eq!(decode_message(&buf), Err(Error::InvalidLocationMode(mode)));
    }
}

#[test]
fn subscribe_ok_group_order_out_of_range() {
    let payload = [0x01, 0x00, 0x03, 0x00, 0x00];
    let buf = frame(SubscribeOk::ID, payload.len() as u64, &payload);
    assert_eq!(decode_message(&buf), Err(Error::InvalidGroupOrder(3)));
}

#[test]
fn absolute_range_reads_four_fields() {
    let mut payload = subscribe_prefix();
    write_u8(&mut payload, 1);
    write_u62(&mut payload, 4).unwrap();
    for v in [1, 2, 3, 4] {
        write_u53(&mut payload, v).unwrap();
    }
    write_u53(&mut payload, 0).unwrap();
    let buf = frame(Subscribe::ID, payload.len() as u64, &payload);

    let (msg, _) = decode_message(&buf).unwrap();
    let Message::Subscribe(sub) = msg else {
        panic!("expected subscribe");
    };
    assert_eq!(
        sub.location,
        Location::AbsoluteRange {
            start: Position::new(1, 2),
            end: Position::new(3, 4),
        }
    );
}

// ---------------------------------------------------------------------------
// C. Presence flags
// ---------------------------------------------------------------------------

#[test]
fn subscribe_ok_presence_flag_out_of_range() {
    let payload = [0x01, 0x00, 0x01, 0x02, 0x00];
    let buf = frame(SubscribeOk::ID, payload.len() as u64, &payload);
    assert_eq!(decode_message(&buf), Err(Error::InvalidPresenceFlag(2)));
}

#[test]
fn subscribe_done_presence_flag_out_of_range() {
    let mut payload = Vec::new();
    write_u62(&mut payload, 1).unwrap();
    write_u62(&mut payload, 0).unwrap();
    write_string(&mut payload, "bye").unwrap();
    write_u8(&mut payload, 0xff);
    let buf = frame(SubscribeDone::ID, payload.len() as u64, &payload);
    assert_eq!(decode_message(&buf), Err(Error::InvalidPresenceFlag(0xff)));
}

#[test]
fn absent_optional_writes_a_single_zero() {
    let done = Message::SubscribeDone(SubscribeDone {
        id: 1,
        code: 0,
        reason: String::new(),
        final_position: None,
    });
    let mut buf = Vec::new();
    encode_message(&done, &mut buf).unwrap();
    // type, length, id, code, empty reason, flag
    assert_eq!(buf, vec![0x0b, 0x04, 0x01, 0x00, 0x00, 0x00]);
}

// ---------------------------------------------------------------------------
// D. Parameters
// ---------------------------------------------------------------------------

#[test]
fn zero_parameters_decode_as_absent() {
    let mut payload = namespace_bytes(&["live"]);
    write_u53(&mut payload, 0).unwrap();
    let buf = frame(Announce::ID, payload.len() as u64, &payload);

    let (msg, _) = decode_message(&buf).unwrap();
    assert_eq!(
        msg,
        Message::Announce(Announce {
            namespace: TrackNamespace::from_strings(&["live"]).unwrap(),
            params: None,
        })
    );
}

#[test]
fn empty_parameters_encode_as_absent() {
    let msg = Message::Announce(Announce {
        namespace: TrackNamespace::default(),
        params: Some(Parameters::new()),
    });
    let mut buf = Vec::new();
    encode_message(&msg, &mut buf).unwrap();
    let (decoded, _) = decode_message(&buf).unwrap();
    let Message::Announce(announce) = decoded else {
        panic!("expected announce");
    };
    assert_eq!(announce.params, None);
}

#[test]
fn duplicate_parameter_rejected() {
    let mut payload = namespace_bytes(&["live"]);
    write_u53(&mut payload, 2).unwrap();
    for _ in 0..2 {
        write_u62(&mut payload, 0x02).unwrap();
        write_u53(&mut payload, 1).unwrap();
        write_u8(&mut payload, 0xaa);
    }
    let buf = frame(SubscribeNamespace::ID, payload.len() as u64, &payload);
    assert_eq!(decode_message(&buf), Err(Error::DuplicateParameter(0x02)));
}

// ---------------------------------------------------------------------------
// E. Strings and namespaces
// ---------------------------------------------------------------------------

#[test]
fn reason_must_be_utf8() {
    let payload = [0x01, 0x00, 0x02, 0xc3, 0x28];
    let buf = frame(SubscribeError::ID, payload.len() as u64, &payload);
    assert_eq!(decode_message(&buf), Err(Error::InvalidUtf8));
}

#[test]
fn namespace_with_empty_field_rejected() {
    let payload = [0x01, 0x00];
    let buf = frame(AnnounceOk::ID, payload.len() as u64, &payload);
    assert!(matches!(
        decode_message(&buf),
        Err(Error::InvalidTrackNamespace(_))
    ));
}

#[test]
fn huge_namespace_count_does_not_allocate() {
    let mut payload = Vec::new();
    write_u53(&mut payload, MAX_U53).unwrap();
    let buf = frame(Unannounce::ID, payload.len() as u64, &payload);
    assert_eq!(
        decode_message(&buf),
        Err(Error::FrameOverrun {
            declared: payload.len()
        })
    );
}

#[test]
fn u53_fields_rejected_on_encode() {
    let msg = Message::SubscribeOk(SubscribeOk {
        id: 0,
        expires: 0,
        group_order: GroupOrder::Publisher,
        latest: Some(Position::new(0, MAX_U53 + 1)),
        params: None,
    });
    let mut buf = Vec::new();
    assert_eq!(
        encode_message(&msg, &mut buf),
        Err(Error::IntegerOverflow(MAX_U53 + 1))
    );
}
