//! Protocol implementation module
//!
//! This module defines the wire framing spoken to the motor-control
//! microcontroller: fixed-length frame encoding/decoding, the link codec,
//! and the receive-side reassembler.

pub mod codec;
pub mod command;
pub mod frame;
pub mod reassembler;

pub use self::codec::LinkCodec;
pub use self::command::{Command, Opcode, OutboundCommand};
pub use self::frame::OutboundFrame;
pub use self::reassembler::ReceiveReassembler;
