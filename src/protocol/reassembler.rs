use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::core::{InboundSample, INBOUND_FRAME_LEN};
use super::codec::LinkCodec;

/// Reassembles decoded samples from an arbitrarily-chunked byte stream.
///
/// Owns the receive buffer exclusively: chunks from the transport are
/// appended, complete frames are carved off the front, and unparseable bytes
/// are absorbed one at a time by the codec's resynchronization step. Every
/// drain iteration either consumes at least one byte or ends with fewer than
/// four bytes buffered, so the buffer cannot grow without bound.
///
/// Calls must be serialized by the owner; the drain loop is not safe for
/// concurrent mutation of the buffer.
#[derive(Debug, Default)]
pub struct ReceiveReassembler {
    codec: LinkCodec,
    buffer: BytesMut,
}

impl ReceiveReassembler {
    /// Creates a reassembler with an empty buffer
    pub fn new() -> Self {
        ReceiveReassembler {
            codec: LinkCodec::new(),
            buffer: BytesMut::with_capacity(4 * INBOUND_FRAME_LEN),
        }
    }

    /// Appends a chunk and drains every decodable sample, earliest first.
    ///
    /// Corrupted or misaligned bytes are dropped silently; a trailing partial
    /// frame stays buffered until more data arrives. Never blocks.
    pub fn on_bytes_received(&mut self, chunk: &[u8]) -> Vec<InboundSample> {
        self.buffer.extend_from_slice(chunk);

        let mut samples = Vec::new();
        while let Ok(Some(sample)) = self.codec.decode(&mut self.buffer) {
            samples.push(sample);
        }
        samples
    }

    /// Number of bytes buffered while waiting for the rest of a frame
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Discards all buffered bytes.
    ///
    /// Called at connection close, before the reassembler could see bytes
    /// from a new connection.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // [0xFF, 0x12, 0x34, 0x45]: checksum = (0xFF + 0x12 + 0x34) % 0x100
    const VALID_FRAME: [u8; 4] = [0xFF, 0x12, 0x34, 0x45];

    #[test]
    fn test_single_frame() {
        let mut reassembler = ReceiveReassembler::new();
        let samples = reassembler.on_bytes_received(&VALID_FRAME);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 0x1234);
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn test_resync_recovers_following_frame() {
        let mut reassembler = ReceiveReassembler::new();

        let mut stream = vec![0xAB];
        stream.extend_from_slice(&VALID_FRAME);
        let samples = reassembler.on_bytes_received(&stream);

        // The garbage byte costs one candidate window, not the valid frame
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 0x1234);
    }

    #[test]
    fn test_partial_delivery() {
        let mut reassembler = ReceiveReassembler::new();

        let samples = reassembler.on_bytes_received(&VALID_FRAME[..2]);
        assert!(samples.is_empty());
        assert_eq!(reassembler.pending(), 2);

        let samples = reassembler.on_bytes_received(&VALID_FRAME[2..]);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 0x1234);
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn test_byte_at_a_time_delivery() {
        let mut reassembler = ReceiveReassembler::new();

        for byte in &VALID_FRAME[..3] {
            assert!(reassembler.on_bytes_received(&[*byte]).is_empty());
        }
        let samples = reassembler.on_bytes_received(&VALID_FRAME[3..]);
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_two_frames_in_one_chunk() {
        let mut reassembler = ReceiveReassembler::new();

        let mut stream = Vec::new();
        stream.extend_from_slice(&VALID_FRAME);
        stream.extend_from_slice(&[0xFF, 0x00, 0x01, 0x00]); // checksum 0x100 % 0x100

        let samples = reassembler.on_bytes_received(&stream);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].value, 0x1234);
        assert_eq!(samples[1].value, 0x0001);
        assert!(samples[0].timestamp <= samples[1].timestamp);
    }

    #[test]
    fn test_all_zero_stream() {
        let mut reassembler = ReceiveReassembler::new();

        let samples = reassembler.on_bytes_received(&[0u8; 17]);
        assert!(samples.is_empty());
        // Everything decodable was dropped via resync; a sub-frame tail remains
        assert!(reassembler.pending() < 4);
    }

    #[test]
    fn test_corrupted_checksum_absorbed() {
        let mut reassembler = ReceiveReassembler::new();

        let mut stream = vec![0xFF, 0x12, 0x34, 0x46]; // checksum off by one
        stream.extend_from_slice(&VALID_FRAME);
        let samples = reassembler.on_bytes_received(&stream);

        // The corrupted frame is consumed byte-by-byte; the next one survives
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 0x1234);
    }

    #[test]
    fn test_buffer_stays_bounded() {
        let mut reassembler = ReceiveReassembler::new();

        for _ in 0..1000 {
            reassembler.on_bytes_received(&[0x00; 16]);
            assert!(reassembler.pending() < 4);
        }
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let mut reassembler = ReceiveReassembler::new();

        reassembler.on_bytes_received(&VALID_FRAME[..3]);
        assert_eq!(reassembler.pending(), 3);

        reassembler.reset();
        assert_eq!(reassembler.pending(), 0);

        // A fresh frame after reset decodes cleanly
        let samples = reassembler.on_bytes_received(&VALID_FRAME);
        assert_eq!(samples.len(), 1);
    }
}
