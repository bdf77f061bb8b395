//! Drive commands and their wire encoding.
//!
//! Commands arrive as short text frames on the realtime channel. The wire
//! format is a sentinel byte followed by a one-letter code:
//!
//! ```text
//! #F  forward
//! #B  backward
//! #L  pivot left
//! #R  pivot right
//! ```
//!
//! Anything else decodes to [`Command::Stop`]: a missing sentinel, an empty or
//! one-byte frame, or an unknown code. Bad input must never leave the robot
//! running on a stale command.
//!
//! ```rust
//! use rs_wifibot::Command;
//!
//! assert_eq!(Command::decode(b"#F"), Command::Forward);
//! assert_eq!(Command::decode(b"#Q"), Command::Stop);
//! assert_eq!(Command::decode(b""), Command::Stop);
//! ```

/// Marker byte that must open every command frame.
pub const COMMAND_SENTINEL: u8 = b'#';

/// A decoded drive command.
///
/// Defaults to [`Stop`](Self::Stop).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Command {
    /// Both duties at mid-scale, directions held.
    #[default]
    Stop,
    /// Both motors forward at full duty.
    Forward,
    /// Both motors backward at zero duty.
    Backward,
    /// Pivot left: left motor backward, right motor forward.
    Left,
    /// Pivot right: left motor forward, right motor backward.
    Right,
}

impl Command {
    /// Every command, in wire-code order.
    pub const ALL: [Command; 5] = [
        Command::Stop,
        Command::Forward,
        Command::Backward,
        Command::Left,
        Command::Right,
    ];

    /// Decode an inbound frame.
    ///
    /// Only the first two bytes are inspected. Codes are case-sensitive.
    pub fn decode(frame: &[u8]) -> Self {
        match frame {
            [COMMAND_SENTINEL, code, ..] => Self::from_code(*code).unwrap_or(Command::Stop),
            _ => Command::Stop,
        }
    }

    /// Command selected by a code byte, if it names a motion.
    ///
    /// `S` is accepted as an explicit stop code; every other unknown byte
    /// returns `None`.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'F' => Some(Command::Forward),
            b'B' => Some(Command::Backward),
            b'L' => Some(Command::Left),
            b'R' => Some(Command::Right),
            b'S' => Some(Command::Stop),
            _ => None,
        }
    }

    /// The code byte for this command.
    pub const fn code(&self) -> u8 {
        match self {
            Command::Stop => b'S',
            Command::Forward => b'F',
            Command::Backward => b'B',
            Command::Left => b'L',
            Command::Right => b'R',
        }
    }

    /// Wire form of this command, e.g. `"#F"`.
    ///
    /// ```
    /// use rs_wifibot::Command;
    ///
    /// for cmd in Command::ALL {
    ///     assert_eq!(Command::decode(cmd.encode().as_bytes()), cmd);
    /// }
    /// ```
    pub const fn encode(&self) -> &'static str {
        match self {
            Command::Stop => "#S",
            Command::Forward => "#F",
            Command::Backward => "#B",
            Command::Left => "#L",
            Command::Right => "#R",
        }
    }

    /// Lowercase name for logs and JSON.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::Stop => "stop",
            Command::Forward => "forward",
            Command::Backward => "backward",
            Command::Left => "left",
            Command::Right => "right",
        }
    }

    /// Returns true for [`Command::Stop`].
    #[inline]
    pub const fn is_stop(&self) -> bool {
        matches!(self, Command::Stop)
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Decoding
    // =========================================================================

    #[test]
    fn decode_motion_codes() {
        assert_eq!(Command::decode(b"#F"), Command::Forward);
        assert_eq!(Command::decode(b"#B"), Command::Backward);
        assert_eq!(Command::decode(b"#L"), Command::Left);
        assert_eq!(Command::decode(b"#R"), Command::Right);
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        assert_eq!(Command::decode(b"#Fxyz"), Command::Forward);
        assert_eq!(Command::decode(b"#R\n"), Command::Right);
    }

    #[test]
    fn decode_without_sentinel_is_stop() {
        assert_eq!(Command::decode(b"F"), Command::Stop);
        assert_eq!(Command::decode(b"FF"), Command::Stop);
        assert_eq!(Command::decode(b"!F"), Command::Stop);
    }

    #[test]
    fn decode_truncated_is_stop() {
        assert_eq!(Command::decode(b""), Command::Stop);
        assert_eq!(Command::decode(b"#"), Command::Stop);
    }

    #[test]
    fn decode_unknown_code_is_stop() {
        assert_eq!(Command::decode(b"#Q"), Command::Stop);
        assert_eq!(Command::decode(b"#f"), Command::Stop);
        assert_eq!(Command::decode(b"##"), Command::Stop);
        assert_eq!(Command::decode(&[COMMAND_SENTINEL, 0xFF]), Command::Stop);
    }

    #[test]
    fn every_non_motion_byte_is_stop() {
        for b in 0u8..=255 {
            let expected = match b {
                b'F' => Command::Forward,
                b'B' => Command::Backward,
                b'L' => Command::Left,
                b'R' => Command::Right,
                _ => Command::Stop,
            };
            assert_eq!(Command::decode(&[COMMAND_SENTINEL, b]), expected, "byte {b}");
        }
    }

    // =========================================================================
    // Encoding / naming
    // =========================================================================

    #[test]
    fn codes_match_encoding() {
        for cmd in Command::ALL {
            let wire = cmd.encode().as_bytes();
            assert_eq!(wire[0], COMMAND_SENTINEL);
            assert_eq!(wire[1], cmd.code());
        }
    }

    #[test]
    fn default_is_stop() {
        assert_eq!(Command::default(), Command::Stop);
        assert!(Command::default().is_stop());
        assert!(!Command::Forward.is_stop());
    }

    #[test]
    fn display_uses_lowercase_name() {
        assert_eq!(format!("{}", Command::Left), "left");
        assert_eq!(Command::Backward.as_str(), "backward");
    }
}
