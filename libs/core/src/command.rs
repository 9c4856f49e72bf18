use std::fmt::{self, Display, Formatter};

use derive_more::{Display, LowerHex, UpperHex};

use crate::template::{self, Template, FRAMEBUFFER_OFFSET, OPCODE_OFFSET};
use crate::{Frame, HumidityDigits, TemperatureDigits};

/// One of the display module's three framebuffers.
///
/// Only the foreground is visible. The virtual framebuffer is typically drawn into and then copied
/// to the foreground in one step with [`Command::FlipToForeground`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Framebuffer {
    /// The visible layer.
    Foreground,
    /// An off-screen layer that can be flipped to the foreground.
    Virtual,
    /// The background layer behind the foreground.
    Background,
}

impl Framebuffer {
    /// Returns the id used to address the framebuffer on the wire.
    pub fn id(self) -> u8 {
        match self {
            Framebuffer::Foreground => 0x00,
            Framebuffer::Virtual => 0x01,
            Framebuffer::Background => 0x02,
        }
    }

    /// Looks up a framebuffer by its wire id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x00 => Some(Framebuffer::Foreground),
            0x01 => Some(Framebuffer::Virtual),
            0x02 => Some(Framebuffer::Background),
            _ => None,
        }
    }
}

/// The id under which a text object is registered with the display module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, LowerHex, UpperHex)]
pub struct ObjectId(pub u8);

/// A rectangle on the display, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width.
    pub width: u16,
    /// Height.
    pub height: u16,
}

/// The on-screen fields the driver knows how to update.
///
/// Each field is a registered text object with a fixed position and size.
///
/// # Examples
///
/// ```
/// use charmatrix_core::{Field, ObjectId};
///
/// assert_eq!(ObjectId(1), Field::Temperature.object_id());
/// assert_eq!(32, Field::Humidity.rect().y);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Field {
    /// The temperature label.
    Temperature,
    /// The relative humidity label.
    Humidity,
}

impl Field {
    /// Every field, in drawing order.
    pub const ALL: [Field; 2] = [Field::Temperature, Field::Humidity];

    /// Returns the id of the field's text object.
    pub fn object_id(self) -> ObjectId {
        match self {
            Field::Temperature => ObjectId(1),
            Field::Humidity => ObjectId(2),
        }
    }

    /// Returns the area the field occupies.
    pub fn rect(self) -> Rect {
        match self {
            Field::Temperature => Rect {
                x: 4,
                y: 8,
                width: 120,
                height: 16,
            },
            Field::Humidity => Rect {
                x: 4,
                y: 32,
                width: 120,
                height: 16,
            },
        }
    }

    fn clear_template(self) -> &'static Template {
        match self {
            Field::Temperature => &template::CLEAR_TEMPERATURE,
            Field::Humidity => &template::CLEAR_HUMIDITY,
        }
    }

    fn text_template(self) -> &'static Template {
        match self {
            Field::Temperature => &template::TEXT_TEMPERATURE,
            Field::Humidity => &template::TEXT_HUMIDITY,
        }
    }
}

/// How a text drawing command treats the framebuffer it targets.
///
/// The two variants differ only in their opcode byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Variant {
    /// Draw the text and show it immediately.
    DrawAndShow,
    /// Draw the text into the target framebuffer only, leaving the foreground alone.
    BackbufferOnly,
}

impl Variant {
    /// Returns the opcode byte for this variant.
    pub fn opcode(self) -> u8 {
        match self {
            Variant::DrawAndShow => template::DRAW_AND_SHOW_OPCODE,
            Variant::BackbufferOnly => template::BACKBUFFER_ONLY_OPCODE,
        }
    }

    fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            template::DRAW_AND_SHOW_OPCODE => Some(Variant::DrawAndShow),
            template::BACKBUFFER_ONLY_OPCODE => Some(Variant::BackbufferOnly),
            _ => None,
        }
    }
}

/// High-level representation of a command sent to the display module.
///
/// Ascribes meaning to a [`Frame`] and is freely convertible to and from one
/// (with `Unknown` to allow round-tripping frames that match no known template).
///
/// # Examples
///
/// ```
/// use charmatrix_core::{Command, Field, Frame, Framebuffer, TemperatureDigits, Variant};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let digits = TemperatureDigits::from_celsius(18.5)?;
/// let command = Command::DrawTemperature(Framebuffer::Foreground, Variant::DrawAndShow, digits);
/// let frame = Frame::from(command.clone());
/// assert_eq!(33, frame.len());
///
/// assert_eq!(command, Command::from(frame));
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Clears the rectangle occupied by a field on the given framebuffer.
    Clear(Framebuffer, Field),

    /// Draws the temperature text onto the given framebuffer.
    DrawTemperature(Framebuffer, Variant, TemperatureDigits),

    /// Draws the humidity text onto the given framebuffer.
    DrawHumidity(Framebuffer, Variant, HumidityDigits),

    /// Copies the virtual framebuffer onto the foreground.
    FlipToForeground,

    /// Wraps a [`Frame`] that does not correspond to any known command.
    Unknown(Frame),
}

impl Command {
    /// Returns the field this command affects, if any.
    pub fn field(&self) -> Option<Field> {
        match *self {
            Command::Clear(_, field) => Some(field),
            Command::DrawTemperature(..) => Some(Field::Temperature),
            Command::DrawHumidity(..) => Some(Field::Humidity),
            Command::FlipToForeground | Command::Unknown(_) => None,
        }
    }
}

impl Display for Command {
    /// Formats the command in a human-readable way.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Command::Clear(framebuffer, field) => write!(f, "Clear {} field on {}", field, framebuffer),
            Command::DrawTemperature(framebuffer, variant, digits) => {
                write!(f, "Draw temperature [{}] on {} ({})", digits, framebuffer, variant)
            }
            Command::DrawHumidity(framebuffer, variant, digits) => {
                write!(f, "Draw humidity [{}] on {} ({})", digits, framebuffer, variant)
            }
            Command::FlipToForeground => write!(f, "Flip virtual to foreground"),
            Command::Unknown(ref frame) => write!(f, "Unknown {}", frame),
        }
    }
}

impl From<Command> for Frame {
    /// Renders the command from its template.
    fn from(command: Command) -> Self {
        let bytes = match command {
            Command::Clear(framebuffer, field) => field
                .clear_template()
                .render(&[(FRAMEBUFFER_OFFSET, framebuffer.id())]),

            Command::DrawTemperature(framebuffer, variant, digits) => {
                let [tens, ones, _, tenths] = digits.to_bytes();
                render_text(Field::Temperature, framebuffer, variant, &[tens, ones, tenths])
            }

            Command::DrawHumidity(framebuffer, variant, digits) => {
                render_text(Field::Humidity, framebuffer, variant, &digits.to_bytes())
            }

            Command::FlipToForeground => template::FLIP.render(&[]),

            Command::Unknown(frame) => return frame,
        };
        Frame::from_encoded(bytes)
    }
}

impl From<Frame> for Command {
    /// Decodes a frame by matching it against the known templates.
    fn from(frame: Frame) -> Self {
        decode(&frame).unwrap_or(Command::Unknown(frame))
    }
}

fn render_text(field: Field, framebuffer: Framebuffer, variant: Variant, digits: &[u8]) -> Vec<u8> {
    let template = field.text_template();
    let mut patches = vec![(OPCODE_OFFSET, variant.opcode()), (FRAMEBUFFER_OFFSET, framebuffer.id())];
    patches.extend(template.digits.iter().copied().zip(digits.iter().copied()));
    template.render(&patches)
}

fn decode(frame: &Frame) -> Option<Command> {
    let bytes = frame.as_bytes();
    match frame.opcode() {
        (template::CLEAR_CLASS, template::CLEAR_SUBCLASS, template::CLEAR_OPCODE) => {
            let framebuffer = Framebuffer::from_id(bytes[FRAMEBUFFER_OFFSET])?;
            let field = Field::ALL
                .iter()
                .copied()
                .find(|field| field.clear_template().matches(bytes, &[FRAMEBUFFER_OFFSET]))?;
            Some(Command::Clear(framebuffer, field))
        }

        (template::TEXT_CLASS, template::TEXT_SUBCLASS, opcode) => {
            let variant = Variant::from_opcode(opcode)?;
            let framebuffer = Framebuffer::from_id(bytes[FRAMEBUFFER_OFFSET])?;
            let field = Field::ALL.iter().copied().find(|field| {
                field
                    .text_template()
                    .matches(bytes, &[OPCODE_OFFSET, FRAMEBUFFER_OFFSET])
            })?;

            let digits: Vec<u8> = field.text_template().digits.iter().map(|&i| bytes[i]).collect();
            match field {
                Field::Temperature => TemperatureDigits::from_chars(digits[0], digits[1], digits[2])
                    .map(|digits| Command::DrawTemperature(framebuffer, variant, digits)),
                Field::Humidity => HumidityDigits::from_chars(digits[0], digits[1])
                    .map(|digits| Command::DrawHumidity(framebuffer, variant, digits)),
            }
        }

        (template::FLIP_CLASS, template::FLIP_SUBCLASS, template::FLIP_OPCODE)
            if template::FLIP.matches(bytes, &[]) =>
        {
            Some(Command::FlipToForeground)
        }

        _ => None,
    }
}
