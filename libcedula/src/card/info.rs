// libcedula/src/card/info.rs

use crate::{Error, Result};

/// Basic RF-field information reported by the reader's card-info escape
/// command: presence, negotiated baud rate, and card mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardInfo {
    pub present: bool,
    baud: u8,
    mode: u8,
}

impl CardInfo {
    /// Decode the three-byte escape-command response.
    pub fn from_response(data: &[u8]) -> Result<Self> {
        if data.len() != 3 {
            return Err(Error::Parse(format!(
                "card info response must be 3 bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            present: data[0] == 0x01,
            baud: data[1],
            mode: data[2],
        })
    }

    pub fn baud_description(&self) -> &'static str {
        match self.baud {
            0x00 => "106 kbps in both directions",
            0x01 => "106 kbps from PICC to PCD, 212 kbps from PCD to PICC",
            0x02 => "106 kbps from PICC to PCD, 424 kbps from PCD to PICC",
            0x03 => "106 kbps from PICC to PCD, 848 kbps from PCD to PICC",
            0x10 => "212 kbps from PICC to PCD, 106 kbps from PCD to PICC",
            0x11 => "212 kbps in both directions",
            0x12 => "212 kbps from PICC to PCD, 424 kbps from PCD to PICC",
            _ => "unknown baud rate",
        }
    }

    pub fn mode_description(&self) -> &'static str {
        match self.mode {
            0x00 => "memory card, type A",
            0x01 => "memory card, type B",
            0x10 => "T=CL card, type A",
            0x11 => "T=CL card, type B",
            0x20 => "dual mode card, type A",
            0x21 => "dual mode card, type B",
            _ => "unknown card mode",
        }
    }
}

impl std::fmt::Display for CardInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}; {}; {}",
            if self.present {
                "card present"
            } else {
                "no card present"
            },
            self.baud_description(),
            self.mode_description()
        )
    }
}
