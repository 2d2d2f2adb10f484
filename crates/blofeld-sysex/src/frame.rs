//! Sound dump frames (SNDR / SNDD)
//!
//! ```text
//! request:  F0 3E 13 <dev> 00 <bank> <prog> F7
//! dump:     F0 3E 13 <dev> 10 <bank> <prog> <SDATA x383> <checksum> F7
//! ```
//!
//! The checksum is the 7-bit sum of the SDATA bytes. A received checksum of
//! `0x7F` means "not computed" and disables validation for that frame.

use std::fmt;
use std::str::FromStr;

use blofeld_sdata::{codec, Patch, SDATA_LEN};
use tracing::{debug, trace};

use crate::error::FrameError;

/// SysEx envelope bytes
pub mod sysex {
    pub const START: u8 = 0xF0;
    pub const END: u8 = 0xF7;
    pub const MANUFACTURER_WALDORF: u8 = 0x3E;
    pub const FAMILY_BLOFELD: u8 = 0x13;
}

/// Message type codes
pub mod message_type {
    /// Sound request (SNDR)
    pub const SOUND_REQUEST: u8 = 0x00;
    /// Sound dump (SNDD)
    pub const SOUND_DUMP: u8 = 0x10;
}

/// Received checksum value that disables validation
pub const CHECKSUM_WILDCARD: u8 = 0x7F;

/// Bytes before the SDATA payload
const HEADER_LEN: usize = 7;

pub const REQUEST_FRAME_LEN: usize = HEADER_LEN + 1;

/// Full SNDD frame: header, payload, checksum, terminator
pub const DUMP_FRAME_LEN: usize = HEADER_LEN + SDATA_LEN + 2;

/// Sound bank A-H
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bank(u8);

impl Bank {
    /// Parse a single bank letter, case-insensitive
    pub fn parse(s: &str) -> Result<Self, FrameError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ('A'..='H').contains(&c.to_ascii_uppercase()) => {
                Ok(Self(c.to_ascii_uppercase() as u8 - b'A'))
            }
            _ => Err(FrameError::InvalidBank(s.to_string())),
        }
    }

    /// Wire value 0-7
    pub fn byte(self) -> u8 {
        self.0
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

impl FromStr for Bank {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Program slot 1-128 within a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Program(u8);

impl Program {
    pub fn new(number: u32) -> Result<Self, FrameError> {
        match number {
            1..=128 => Ok(Self((number - 1) as u8)),
            _ => Err(FrameError::InvalidProgram(number)),
        }
    }

    /// 1-based program number
    pub fn number(self) -> u32 {
        self.0 as u32 + 1
    }

    /// Wire value 0-127
    pub fn byte(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// 7-bit running sum of the payload
pub fn checksum(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(0u8, |chk, &b| chk.wrapping_add(b) & 0x7F)
}

/// Build a sound request for an already validated slot
pub fn request_frame(device_id: u8, bank: Bank, program: Program) -> Vec<u8> {
    vec![
        sysex::START,
        sysex::MANUFACTURER_WALDORF,
        sysex::FAMILY_BLOFELD,
        device_id,
        message_type::SOUND_REQUEST,
        bank.byte(),
        program.byte(),
        sysex::END,
    ]
}

/// Build a sound dump for an already validated slot
pub fn patch_frame(device_id: u8, bank: Bank, program: Program, patch: &Patch) -> Vec<u8> {
    let sdata = codec::encode(patch);

    let mut out = Vec::with_capacity(DUMP_FRAME_LEN);
    out.extend_from_slice(&[
        sysex::START,
        sysex::MANUFACTURER_WALDORF,
        sysex::FAMILY_BLOFELD,
        device_id,
        message_type::SOUND_DUMP,
        bank.byte(),
        program.byte(),
    ]);
    out.extend_from_slice(&sdata);
    out.push(checksum(&sdata));
    out.push(sysex::END);

    trace!(frame = %hex::encode(&out), "Built SNDD frame");
    out
}

/// Validate the slot and build a sound request
pub fn build_request_frame(device_id: u8, bank: &str, program: u32) -> Result<Vec<u8>, FrameError> {
    Ok(request_frame(
        device_id,
        Bank::parse(bank)?,
        Program::new(program)?,
    ))
}

/// Validate the slot and build a sound dump carrying `patch`
pub fn build_patch_frame(
    device_id: u8,
    bank: &str,
    program: u32,
    patch: &Patch,
) -> Result<Vec<u8>, FrameError> {
    Ok(patch_frame(
        device_id,
        Bank::parse(bank)?,
        Program::new(program)?,
        patch,
    ))
}

/// A validated inbound sound dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Device id the synth answered with
    pub device_id: u8,
    /// Raw bank byte (not limited to 0-7; edit buffers use other values)
    pub bank: u8,
    /// Raw program byte
    pub program: u8,
    pub patch: Patch,
}

/// Validate an inbound SNDD message and decode its payload
pub fn parse_response_frame_full(msg: &[u8]) -> Result<ResponseFrame, FrameError> {
    trace!(frame = %hex::encode(msg), "Parsing SysEx frame");

    if msg.len() != DUMP_FRAME_LEN {
        return Err(FrameError::LengthMismatch {
            expected: DUMP_FRAME_LEN,
            actual: msg.len(),
        });
    }

    if msg[0] != sysex::START || msg[msg.len() - 1] != sysex::END {
        return Err(FrameError::NotSysExFrame);
    }

    if msg[1] != sysex::MANUFACTURER_WALDORF || msg[2] != sysex::FAMILY_BLOFELD {
        return Err(FrameError::WrongManufacturer {
            manufacturer: msg[1],
            family: msg[2],
        });
    }

    if msg[4] != message_type::SOUND_DUMP {
        return Err(FrameError::WrongMessageType(msg[4]));
    }

    let sdata = &msg[HEADER_LEN..HEADER_LEN + SDATA_LEN];
    let received = msg[HEADER_LEN + SDATA_LEN];

    if received == CHECKSUM_WILDCARD {
        debug!("Checksum wildcard received, skipping validation");
    } else {
        let expected = checksum(sdata);
        if expected != received {
            return Err(FrameError::ChecksumMismatch { expected, received });
        }
    }

    let patch = codec::decode(sdata)?;

    Ok(ResponseFrame {
        device_id: msg[3],
        bank: msg[5],
        program: msg[6],
        patch,
    })
}

/// Validate an inbound SNDD message, returning the patch and responding device id
pub fn parse_response_frame(msg: &[u8]) -> Result<(Patch, u8), FrameError> {
    parse_response_frame_full(msg).map(|frame| (frame.patch, frame.device_id))
}
