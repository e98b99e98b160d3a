//! The wire format spoken to the chassis: a fixed three-byte frame of
//! signed wheel duties. The firmware reads the sign of each duty as the
//! wheel's direction and twice its magnitude as the PWM level.

#![no_std]

use serde::{Deserialize, Serialize};

/// One actuation frame.
///
/// `auto_stop` asks the firmware to cut power if the link goes quiet; we
/// never set it, since the drawing sequence times every motion itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub left: i8,
    pub right: i8,
    pub auto_stop: i8,
}

impl Frame {
    /// The all-zero frame. Safe to send at any time, as often as you like.
    pub const STOP: Frame = Frame {
        left: 0,
        right: 0,
        auto_stop: 0,
    };

    pub fn drive(left: i8, right: i8) -> Frame {
        Frame {
            left,
            right,
            auto_stop: 0,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.left == 0 && self.right == 0
    }

    /// Wire order is left, right, flag; two's-complement bytes.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.left as u8, self.right as u8, self.auto_stop as u8]
    }
}
