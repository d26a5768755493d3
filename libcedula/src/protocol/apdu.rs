// libcedula/src/protocol/apdu.rs
//! ISO 7816-4 APDU command building and response parsing.
//!
//! Commands come in the four ISO shapes:
//!
//! 1. `[CLA, INS, P1, P2]` — no data, no response body expected
//! 2. `[CLA, INS, P1, P2, Le]` — no data, response body expected
//! 3. `[CLA, INS, P1, P2, Lc, data...]` — data, no response body expected
//! 4. `[CLA, INS, P1, P2, Lc, data..., Le]` — data and response body
//!
//! Responses always end with the SW1/SW2 trailer; anything before it is the
//! response body.

use crate::constants::MAX_APDU_DATA_LEN;
use crate::protocol::status::{self, StatusOutcome};
use crate::utils::{parse_hex, parse_hex_byte};
use crate::{Error, Result};

/// A single APDU command, ready to be encoded onto the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduCommand {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    data: Option<Vec<u8>>,
    le: Option<u8>,
}

impl ApduCommand {
    /// Case 1: header only, no response body expected.
    pub fn case1(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Case 2: header plus Le, response body expected.
    pub fn case2(cla: u8, ins: u8, p1: u8, p2: u8, le: u8) -> Self {
        Self {
            le: Some(le),
            ..Self::case1(cla, ins, p1, p2)
        }
    }

    /// Case 3: header plus Lc and command data, no response body expected.
    ///
    /// `lc` must equal `data.len()`, which must fit a short APDU.
    pub fn case3(cla: u8, ins: u8, p1: u8, p2: u8, lc: u8, data: Vec<u8>) -> Result<Self> {
        Self::check_body(lc, &data)?;
        Ok(Self {
            data: Some(data),
            ..Self::case1(cla, ins, p1, p2)
        })
    }

    /// Case 4: header, command data and Le.
    pub fn case4(cla: u8, ins: u8, p1: u8, p2: u8, lc: u8, data: Vec<u8>, le: u8) -> Result<Self> {
        Self::check_body(lc, &data)?;
        Ok(Self {
            data: Some(data),
            le: Some(le),
            ..Self::case1(cla, ins, p1, p2)
        })
    }

    /// Case 1 from hex-string fields ("FF", "CA", ...). Base-16,
    /// case-insensitive; fails with a parse error on non-hex input.
    pub fn case1_hex(cla: &str, ins: &str, p1: &str, p2: &str) -> Result<Self> {
        Ok(Self::case1(
            parse_hex_byte(cla)?,
            parse_hex_byte(ins)?,
            parse_hex_byte(p1)?,
            parse_hex_byte(p2)?,
        ))
    }

    /// Case 2 from hex-string fields.
    pub fn case2_hex(cla: &str, ins: &str, p1: &str, p2: &str, le: &str) -> Result<Self> {
        Ok(Self::case2(
            parse_hex_byte(cla)?,
            parse_hex_byte(ins)?,
            parse_hex_byte(p1)?,
            parse_hex_byte(p2)?,
            parse_hex_byte(le)?,
        ))
    }

    /// Case 3 from hex-string fields; `data` is a hex string such as
    /// `"FFFFFFFFFFFF"` or `"FF FF FF FF FF FF"`.
    pub fn case3_hex(cla: &str, ins: &str, p1: &str, p2: &str, lc: &str, data: &str) -> Result<Self> {
        Self::case3(
            parse_hex_byte(cla)?,
            parse_hex_byte(ins)?,
            parse_hex_byte(p1)?,
            parse_hex_byte(p2)?,
            parse_hex_byte(lc)?,
            parse_hex(data)?,
        )
    }

    /// Case 4 from hex-string fields.
    pub fn case4_hex(
        cla: &str,
        ins: &str,
        p1: &str,
        p2: &str,
        lc: &str,
        data: &str,
        le: &str,
    ) -> Result<Self> {
        Self::case4(
            parse_hex_byte(cla)?,
            parse_hex_byte(ins)?,
            parse_hex_byte(p1)?,
            parse_hex_byte(p2)?,
            parse_hex_byte(lc)?,
            parse_hex(data)?,
            parse_hex_byte(le)?,
        )
    }

    fn check_body(lc: u8, data: &[u8]) -> Result<()> {
        if data.len() > MAX_APDU_DATA_LEN {
            return Err(Error::InvalidLength {
                expected: MAX_APDU_DATA_LEN,
                actual: data.len(),
            });
        }
        if lc as usize != data.len() {
            return Err(Error::LcMismatch {
                lc: lc as usize,
                data: data.len(),
            });
        }
        Ok(())
    }

    /// Encode the command into its wire representation.
    pub fn encode(&self) -> Vec<u8> {
        let body_len = self.data.as_ref().map_or(0, |d| d.len());
        let mut out = Vec::with_capacity(4 + 1 + body_len + 1);
        out.push(self.cla);
        out.push(self.ins);
        out.push(self.p1);
        out.push(self.p2);
        if let Some(data) = &self.data {
            out.push(data.len() as u8);
            out.extend_from_slice(data);
        }
        if let Some(le) = self.le {
            out.push(le);
        }
        out
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(&self.encode())
    }
}

/// A parsed APDU response: body plus the described status word.
#[derive(Debug, Clone)]
pub struct ApduResponse {
    pub data: Vec<u8>,
    pub sw1: u8,
    pub sw2: u8,
    pub outcome: StatusOutcome,
}

impl ApduResponse {
    /// Split a raw received buffer into body and trailer. The buffer must be
    /// at least two bytes long (a bare status word).
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(Error::ResponseTooShort { actual: raw.len() });
        }
        let sw1 = raw[raw.len() - 2];
        let sw2 = raw[raw.len() - 1];
        Ok(Self {
            data: raw[..raw.len() - 2].to_vec(),
            sw1,
            sw2,
            outcome: status::describe(sw1, sw2),
        })
    }

    /// Strict success: the trailer is exactly `90 00`.
    pub fn is_success(&self) -> bool {
        (self.sw1, self.sw2) == crate::constants::SW_SUCCESS
    }

    /// An all-zero trailer on an empty body. This is what a
    /// default-initialized response looks like; callers that choose to
    /// tolerate it should log the fact rather than trust it silently.
    pub fn is_blank(&self) -> bool {
        self.sw1 == 0 && self.sw2 == 0 && self.data.is_empty()
    }

    pub fn status_word(&self) -> u16 {
        ((self.sw1 as u16) << 8) | self.sw2 as u16
    }

    pub fn sw_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(&[self.sw1, self.sw2])
    }
}
