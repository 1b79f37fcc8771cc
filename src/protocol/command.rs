use serde::{Serialize, Deserialize};

use crate::core::{Direction, Error, Result, MAX_PAYLOAD_LEN};
use super::frame::{self, OutboundFrame};

/// Control codes understood by the firmware.
///
/// The high byte selects the subsystem, the low byte the operation within it.
/// Interpretation of each code is owned by the firmware; this crate only
/// carries the codes and their payload layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Opcode {
    /// Loopback test
    Echo = 0x0000,
    /// Open-loop DC motor drive
    DcMotorOpenLoopVoltage = 0x0100,
    /// Closed-loop DC motor move to an absolute position
    DcMotorAbsolutePosition = 0x0101,
    /// Closed-loop DC motor move by a relative offset
    DcMotorRelativePosition = 0x0102,
    /// Single stepper half-step
    StepperMotorSingleStep = 0x0200,
    /// Open-loop stepper speed
    StepperMotorOpenLoopSpeed = 0x0201,
    /// Coordinated two-axis interpolation step
    TwoAxisControl = 0x0300,
}

impl Opcode {
    /// Returns the 16-bit wire code
    pub fn code(&self) -> u16 {
        *self as u16
    }
}

/// A command ready to be framed: a 16-bit opcode and at most 12 payload bytes.
///
/// Immutable once constructed; the length precondition is enforced here so
/// encoding downstream cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    opcode: u16,
    payload: Vec<u8>,
}

impl OutboundCommand {
    /// Creates a command from a raw opcode and payload.
    ///
    /// Fails with [`Error::InvalidPayloadLength`] if the payload exceeds
    /// 12 bytes. Escape hatch for codes without a typed constructor, such as
    /// the DC position opcodes.
    pub fn new(opcode: u16, payload: Vec<u8>) -> Result<Self> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidPayloadLength(payload.len()));
        }
        Ok(OutboundCommand { opcode, payload })
    }

    /// Returns the 16-bit opcode
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    /// Returns the unpadded payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encodes this command into its outbound frame
    pub fn frame(&self) -> Result<OutboundFrame> {
        frame::encode(self.opcode, &self.payload)
    }
}

/// Typed constructors for the payload layouts the control panel produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Loopback test frame with an empty payload
    Echo,

    /// Open-loop DC motor drive; the sign selects the direction
    DcOpenLoopVoltage {
        /// Signed duty value; magnitude saturates at `u16::MAX`
        drive: i32,
    },

    /// Single stepper half-step in the given direction
    StepperSingleStep {
        direction: Direction,
    },

    /// Open-loop stepper speed; the sign selects the direction
    StepperOpenLoopSpeed {
        /// Signed speed value; magnitude saturates at `u16::MAX`
        speed: i32,
    },

    /// One interpolation step of a coordinated two-axis move
    TwoAxisStep {
        /// DC motor axis increment, in encoder ticks
        x_step: i16,
        /// Stepper axis increment, in half-steps
        y_step: i16,
        /// Stepper speed for this step
        speed: u16,
    },
}

impl Command {
    /// Returns the control code this command is sent under
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Echo => Opcode::Echo,
            Command::DcOpenLoopVoltage { .. } => Opcode::DcMotorOpenLoopVoltage,
            Command::StepperSingleStep { .. } => Opcode::StepperMotorSingleStep,
            Command::StepperOpenLoopSpeed { .. } => Opcode::StepperMotorOpenLoopSpeed,
            Command::TwoAxisStep { .. } => Opcode::TwoAxisControl,
        }
    }

    /// Lowers this command into its wire payload.
    ///
    /// Every layout here fits the 12-byte maximum by construction.
    pub fn into_command(self) -> OutboundCommand {
        let payload = match self {
            Command::Echo => Vec::new(),

            Command::DcOpenLoopVoltage { drive } => {
                let (direction, magnitude) = Direction::split(drive);
                vec![
                    direction.as_byte(),
                    (magnitude >> 8) as u8,
                    (magnitude & 0xFF) as u8,
                ]
            }

            Command::StepperSingleStep { direction } => vec![direction.as_byte()],

            Command::StepperOpenLoopSpeed { speed } => {
                let (direction, magnitude) = Direction::split(speed);
                vec![
                    direction.as_byte(),
                    (magnitude >> 8) as u8,
                    (magnitude & 0xFF) as u8,
                ]
            }

            // Field offsets match the two-axis firmware table: four reserved
            // bytes, then little-endian X step, speed, and Y step, each
            // followed by one reserved byte.
            Command::TwoAxisStep {
                x_step,
                y_step,
                speed,
            } => {
                let mut payload = vec![0u8; 4];
                payload.extend_from_slice(&x_step.to_le_bytes());
                payload.push(0);
                payload.extend_from_slice(&speed.to_le_bytes());
                payload.push(0);
                payload.extend_from_slice(&y_step.to_le_bytes());
                payload
            }
        };

        OutboundCommand {
            opcode: self.opcode().code(),
            payload,
        }
    }
}

impl From<Command> for OutboundCommand {
    fn from(command: Command) -> Self {
        command.into_command()
    }
}
