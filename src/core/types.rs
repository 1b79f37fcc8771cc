use std::time::{Duration, SystemTime};

use serde::{Serialize, Deserialize};

/// A decoded measurement received from the microcontroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundSample {
    /// Raw 16-bit value carried by the frame
    pub value: u16,
    /// Wall-clock time the frame was decoded; not transmitted on the wire
    #[serde(serialize_with = "super::serde::serialize_time")]
    #[serde(deserialize_with = "super::serde::deserialize_time")]
    pub timestamp: SystemTime,
}

impl InboundSample {
    /// Stamps a decoded value with the current wall-clock time
    pub fn new(value: u16) -> Self {
        InboundSample {
            value,
            timestamp: SystemTime::now(),
        }
    }
}

/// Drive direction encoded as the leading byte of motor command payloads.
///
/// `Forward` (clockwise for the stepper) encodes as 1, `Reverse` as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Reverse,
    Forward,
}

impl Direction {
    /// Derives the direction from a signed control value
    pub fn from_signed(value: i32) -> Self {
        if value > 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Splits a signed control value into a direction and a 16-bit magnitude.
    ///
    /// Magnitudes beyond `u16::MAX` saturate.
    pub fn split(value: i32) -> (Self, u16) {
        let magnitude = value.unsigned_abs().min(u16::MAX as u32) as u16;
        (Self::from_signed(value), magnitude)
    }

    /// Returns the wire encoding of this direction
    pub fn as_byte(&self) -> u8 {
        match self {
            Direction::Reverse => 0,
            Direction::Forward => 1,
        }
    }
}

/// Configuration for the serial control link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Serial device path, e.g. "/dev/ttyUSB0" or "COM3"
    pub port_name: String,
    /// Baud rate; the firmware speaks 9600 8N1
    pub baud_rate: u32,
    /// Timeout for individual port reads
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub read_timeout: Duration,
    /// Interval between receive polls
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub poll_interval: Duration,
    /// Capacity of the command and sample channels
    pub channel_capacity: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            port_name: String::new(),
            baud_rate: super::DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(10),
            channel_capacity: 100,
        }
    }
}
