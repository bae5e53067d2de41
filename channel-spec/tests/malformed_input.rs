//! Tests for malformed buffer handling in the record decoders
//!
//! Every case must surface a DecodeError; nothing may panic or read past the
//! end of the buffer.

use channel_spec::{
    ChannelInstruction, Claim, CodecConfig, DecodeError, Deployment, Envelope, ExecutionRequest,
    Input, IxType, StatusReport, TableBuilder, TableReader,
};

fn request_bytes() -> Vec<u8> {
    ExecutionRequest {
        execution_id: "exec-1".to_string(),
        image_id: "abc123".to_string(),
        inputs: vec![Input::public(b"hello".to_vec()), Input::private(vec![1, 2, 3])],
        input_digest: Some(vec![0xAB; 32]),
        ..Default::default()
    }
    .to_bytes()
    .unwrap()
}

// ============================================================================
// Truncation
// ============================================================================

/// A prefix decodes only when nothing but trailing alignment padding was cut,
/// and then it decodes to the original record.
fn assert_truncations_rejected<T: PartialEq + std::fmt::Debug>(
    bytes: &[u8],
    decode: impl Fn(&[u8]) -> Result<T, DecodeError>,
) {
    let full = decode(bytes).unwrap();
    for cut in 0..bytes.len() {
        if let Ok(decoded) = decode(&bytes[..cut]) {
            assert!(
                bytes[cut..].iter().all(|&b| b == 0),
                "decoded a buffer truncated to {cut} bytes"
            );
            assert_eq!(decoded, full);
        }
    }
}

#[test]
fn test_every_truncation_fails() {
    let bytes = request_bytes();
    assert_truncations_rejected(&bytes, ExecutionRequest::from_bytes);
    assert!(ExecutionRequest::from_bytes(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn test_truncated_envelope() {
    let bytes = ChannelInstruction::from(Claim {
        execution_id: "exec-1".to_string(),
        block_commitment: 9,
    })
    .to_bytes()
    .unwrap();
    assert_truncations_rejected(&bytes, ChannelInstruction::from_bytes);
    assert!(ChannelInstruction::from_bytes(&bytes[..bytes.len() - 8]).is_err());
}

#[test]
fn test_empty_buffer() {
    assert!(matches!(
        ExecutionRequest::from_bytes(&[]),
        Err(DecodeError::Truncated { .. })
    ));
    assert!(Deployment::from_bytes(&[]).is_err());
    assert!(Claim::from_bytes(&[]).is_err());
    assert!(StatusReport::from_bytes(&[]).is_err());
    assert!(Envelope::from_bytes(&[]).is_err());
}

// ============================================================================
// Corrupted Offsets
// ============================================================================

#[test]
fn test_root_offset_past_end() {
    let mut bytes = request_bytes();
    let len = bytes.len() as u32;
    bytes[..4].copy_from_slice(&(len + 100).to_le_bytes());
    assert!(ExecutionRequest::from_bytes(&bytes).is_err());
}

#[test]
fn test_vector_length_past_end() {
    let mut table = TableBuilder::new(2);
    table.push_vector(1, b"payload").unwrap();
    let mut bytes = table.finish().unwrap();

    // the count sits 4 bytes before the data
    let data_pos = bytes
        .windows(b"payload".len())
        .position(|window| window == b"payload")
        .unwrap();
    let count_pos = data_pos - 4;
    bytes[count_pos..count_pos + 4].copy_from_slice(&64u32.to_le_bytes());

    let reader = TableReader::root(&bytes).unwrap();
    assert!(matches!(
        reader.vector(1),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_garbage_does_not_panic() {
    let mut state = 0x2545F4914F6CDD1Du64;
    for len in 0..256usize {
        let bytes: Vec<u8> = (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state as u8
            })
            .collect();
        let _ = ExecutionRequest::from_bytes(&bytes);
        let _ = Deployment::from_bytes(&bytes);
        let _ = StatusReport::from_bytes(&bytes);
        let _ = ChannelInstruction::from_bytes(&bytes);
    }
}

// ============================================================================
// Limits and Envelope
// ============================================================================

#[test]
fn test_vector_limit_from_config() {
    let bytes = request_bytes();
    let config = CodecConfig::new(8, 1, 16).unwrap();
    assert!(matches!(
        ExecutionRequest::from_bytes_with_config(&bytes, config),
        Err(DecodeError::VectorTooLong { .. })
    ));
}

#[test]
fn test_unknown_discriminant_is_fatal() {
    let mut table = TableBuilder::new(5);
    table.push_scalar(0, 200u8, 0).push_vector(1, &request_bytes()).unwrap();
    let bytes = table.finish().unwrap();
    assert_eq!(
        ChannelInstruction::from_bytes(&bytes),
        Err(DecodeError::UnknownDiscriminant(200))
    );
}

#[test]
fn test_payload_of_wrong_shape() {
    // execute discriminant over a claim payload: the request is missing its image id
    let claim = Claim {
        execution_id: "exec-1".to_string(),
        block_commitment: 1,
    }
    .to_bytes()
    .unwrap();
    let bytes = Envelope::new(IxType::ExecuteV1, claim).to_bytes().unwrap();
    assert_eq!(
        ChannelInstruction::from_bytes(&bytes),
        Err(DecodeError::MissingField("image_id"))
    );
}
