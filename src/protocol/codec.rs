use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::core::{Error, InboundSample, INBOUND_FRAME_LEN};
use super::command::OutboundCommand;
use super::frame;

/// Frame codec for the control link.
///
/// Encodes outbound commands into 16-byte frames and decodes 4-byte inbound
/// frames, resynchronizing on corrupted or misaligned bytes by dropping one
/// byte at a time.
#[derive(Debug, Clone, Default)]
pub struct LinkCodec;

impl LinkCodec {
    /// Creates a new link codec
    pub fn new() -> Self {
        LinkCodec
    }
}

impl Decoder for LinkCodec {
    type Item = InboundSample;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while src.len() >= INBOUND_FRAME_LEN {
            let mut candidate = [0u8; INBOUND_FRAME_LEN];
            candidate.copy_from_slice(&src[..INBOUND_FRAME_LEN]);

            match frame::try_decode(&candidate) {
                Ok(value) => {
                    src.advance(INBOUND_FRAME_LEN);
                    return Ok(Some(InboundSample::new(value)));
                }
                Err(reason) => {
                    // Resynchronization step: drop exactly one byte so a
                    // well-aligned frame later in the stream is still found.
                    trace!(%reason, dropped = candidate[0], "resync");
                    src.advance(1);
                }
            }
        }

        // Fewer than 4 bytes left; wait for more data
        Ok(None)
    }
}

impl Encoder<OutboundCommand> for LinkCodec {
    type Error = Error;

    fn encode(&mut self, item: OutboundCommand, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let frame = frame::encode(item.opcode(), item.payload())?;
        dst.extend_from_slice(frame.as_ref());
        Ok(())
    }
}
