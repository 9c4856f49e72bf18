//! Byte-for-byte templates of every frame the driver sends.
//!
//! Each template is a complete frame as the device expects it, plus the offsets of the bytes that
//! change per command. Rendering copies the template, patches those bytes, and recomputes the
//! checksum, so nothing is ever mutated in place.

use crate::checksum;
use crate::frame::{CR, FIELD_TERMINATOR, STX};

/// Offset of the opcode byte, which selects between the text drawing variants.
pub(crate) const OPCODE_OFFSET: usize = 4;

/// Offset of the target framebuffer id in clear and text frames.
pub(crate) const FRAMEBUFFER_OFFSET: usize = 5;

pub(crate) const CLEAR_CLASS: u8 = b'G';
pub(crate) const CLEAR_SUBCLASS: u8 = b'R';
pub(crate) const CLEAR_OPCODE: u8 = b'C';

pub(crate) const TEXT_CLASS: u8 = b'T';
pub(crate) const TEXT_SUBCLASS: u8 = b'O';
pub(crate) const DRAW_AND_SHOW_OPCODE: u8 = b'D';
pub(crate) const BACKBUFFER_ONLY_OPCODE: u8 = b'B';

pub(crate) const FLIP_CLASS: u8 = b'L';
pub(crate) const FLIP_SUBCLASS: u8 = b'C';
pub(crate) const FLIP_OPCODE: u8 = b'F';

/// A fixed frame layout with named variable bytes.
#[derive(Debug)]
pub(crate) struct Template {
    /// The frame as sent with its default field values (foreground, draw-and-show, zero digits).
    pub bytes: &'static [u8],

    /// Offsets of the digit characters, in display order.
    pub digits: &'static [usize],
}

impl Template {
    /// Offset of the checksum byte, just before the trailing CR.
    pub fn checksum_offset(&self) -> usize {
        self.bytes.len() - 2
    }

    /// Copies the template, applies `patches` as `(offset, value)` pairs, and fixes up the checksum.
    pub fn render(&self, patches: &[(usize, u8)]) -> Vec<u8> {
        let mut bytes = self.bytes.to_vec();
        for &(offset, value) in patches {
            debug_assert!(offset < self.checksum_offset(), "patch outside checksummed range");
            bytes[offset] = value;
        }
        let offset = self.checksum_offset();
        bytes[offset] = checksum(&bytes, offset);
        bytes
    }

    /// Returns `true` if `bytes` has this template's fixed bytes everywhere except the digits,
    /// the checksum, and the offsets in `variable`.
    pub fn matches(&self, bytes: &[u8], variable: &[usize]) -> bool {
        bytes.len() == self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(bytes)
                .enumerate()
                .filter(|(i, _)| *i != self.checksum_offset() && !self.digits.contains(i) && !variable.contains(i))
                .all(|(_, (expected, actual))| expected == actual)
    }
}

/// Clears the 120 × 16 rectangle at (4, 8) holding the temperature text.
#[rustfmt::skip]
pub(crate) const CLEAR_TEMPERATURE: Template = Template {
    bytes: &[
        STX, 0x10, CLEAR_CLASS, CLEAR_SUBCLASS, CLEAR_OPCODE,
        0x00,                   // Framebuffer
        0x00, 0x04, 0x00, 0x08, // X, Y
        0x00, 0x78, 0x00, 0x10, // Width, height
        0x82, CR,
    ],
    digits: &[],
};

/// Clears the 120 × 16 rectangle at (4, 32) holding the humidity text.
#[rustfmt::skip]
pub(crate) const CLEAR_HUMIDITY: Template = Template {
    bytes: &[
        STX, 0x10, CLEAR_CLASS, CLEAR_SUBCLASS, CLEAR_OPCODE,
        0x00,
        0x00, 0x04, 0x00, 0x20,
        0x00, 0x78, 0x00, 0x10,
        0x9A, CR,
    ],
    digits: &[],
};

/// Draws text object 1, `"Temp: TO.t °C  "`.
#[rustfmt::skip]
pub(crate) const TEXT_TEMPERATURE: Template = Template {
    bytes: &[
        STX, 0x21, TEXT_CLASS, TEXT_SUBCLASS, DRAW_AND_SHOW_OPCODE,
        0x00, 0x01,             // Framebuffer, object id
        0x00, 0x04, 0x00, 0x08, // X, Y
        0x02, 0x0F, 0x00, 0x00, // Font, foreground, background, alignment
        b'T', b'e', b'm', b'p', b':', b' ',
        b' ', b'0', b'.', b'0',
        b' ', 0xDF, b'C', b' ', b' ', // 0xDF is the degree sign in the module's character ROM
        FIELD_TERMINATOR, 0x52, CR,
    ],
    digits: &[21, 22, 24],
};

/// Draws text object 2, `"Hum: TO %RH "`.
#[rustfmt::skip]
pub(crate) const TEXT_HUMIDITY: Template = Template {
    bytes: &[
        STX, 0x1E, TEXT_CLASS, TEXT_SUBCLASS, DRAW_AND_SHOW_OPCODE,
        0x00, 0x02,
        0x00, 0x04, 0x00, 0x20,
        0x02, 0x0F, 0x00, 0x00,
        b'H', b'u', b'm', b':', b' ',
        b' ', b'0',
        b' ', b'%', b'R', b'H', b' ',
        FIELD_TERMINATOR, 0x1B, CR,
    ],
    digits: &[20, 21],
};

/// Copies the virtual framebuffer (1) onto the foreground (0).
#[rustfmt::skip]
pub(crate) const FLIP: Template = Template {
    bytes: &[STX, 0x09, FLIP_CLASS, FLIP_SUBCLASS, FLIP_OPCODE, 0x01, 0x00, 0xE1, CR],
    digits: &[],
};

/// Checks that a template's length byte and stored checksum are right.
const fn is_consistent(template: &Template) -> bool {
    let len = template.bytes.len();
    template.bytes[1] as usize == len && checksum(template.bytes, len - 2) == template.bytes[len - 2]
}

const _: () = assert!(is_consistent(&CLEAR_TEMPERATURE));
const _: () = assert!(is_consistent(&CLEAR_HUMIDITY));
const _: () = assert!(is_consistent(&TEXT_TEMPERATURE));
const _: () = assert!(is_consistent(&TEXT_HUMIDITY));
const _: () = assert!(is_consistent(&FLIP));
