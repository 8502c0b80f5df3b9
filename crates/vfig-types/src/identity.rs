use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Number of hex characters in a catalog identifier.
pub const IDENTITY_HEX_LEN: usize = 16;

/// Trailing byte carried by every identifier in the public catalog.
pub const DEFAULT_FORMAT_TAG: u8 = 0x02;

fn default_format_tag() -> u8 {
    DEFAULT_FORMAT_TAG
}

fn is_default_format_tag(tag: &u8) -> bool {
    *tag == DEFAULT_FORMAT_TAG
}

/// Structured identity of a figure, decoded from its 16-character catalog
/// identifier.
///
/// The catalog string is laid out as six fixed-width hex fields, left to
/// right: game character id (4), character variant (2), figure type (2),
/// model number (4), series (2), format tag (2). The game character id is
/// stored byte-swapped in the catalog; every other field is read as-is.
///
/// The serialized form (field names and order) is the `id` object of a
/// current-layout `amiibo.json`. The format tag is only written when it
/// differs from [`DEFAULT_FORMAT_TAG`], so catalog identities serialize to
/// exactly the five documented keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexIdentity {
    game_character_id: u16,
    character_variant: u8,
    figure_type: u8,
    series: u8,
    model_number: u16,
    #[serde(
        default = "default_format_tag",
        skip_serializing_if = "is_default_format_tag"
    )]
    format_tag: u8,
}

impl HexIdentity {
    /// Create an identity from already-decoded fields.
    pub const fn new(
        game_character_id: u16,
        character_variant: u8,
        figure_type: u8,
        series: u8,
        model_number: u16,
    ) -> Self {
        Self {
            game_character_id,
            character_variant,
            figure_type,
            series,
            model_number,
            format_tag: DEFAULT_FORMAT_TAG,
        }
    }

    /// Replace the trailing format tag.
    pub const fn with_format_tag(mut self, format_tag: u8) -> Self {
        self.format_tag = format_tag;
        self
    }

    /// Decode from the catalog's head and tail fragments.
    ///
    /// The fragments are concatenated and must form exactly
    /// [`IDENTITY_HEX_LEN`] hex digits.
    pub fn decode(head: &str, tail: &str) -> CodecResult<Self> {
        let mut joined = String::with_capacity(head.len() + tail.len());
        joined.push_str(head);
        joined.push_str(tail);
        Self::from_hex(&joined)
    }

    /// Decode from a full 16-character catalog identifier.
    pub fn from_hex(s: &str) -> CodecResult<Self> {
        let actual = s.chars().count();
        if actual != IDENTITY_HEX_LEN {
            return Err(CodecError::MalformedLength { actual });
        }
        if !s.is_ascii() {
            return Err(CodecError::MalformedHex {
                segment: s.to_string(),
            });
        }

        let game_character_id = parse_segment(&s[0..4])? as u16;
        let character_variant = parse_segment(&s[4..6])? as u8;
        let figure_type = parse_segment(&s[6..8])? as u8;
        let model_number = parse_segment(&s[8..12])? as u16;
        let series = parse_segment(&s[12..14])? as u8;
        let format_tag = parse_segment(&s[14..16])? as u8;

        Ok(Self {
            game_character_id: game_character_id.swap_bytes(),
            character_variant,
            figure_type,
            series,
            model_number,
            format_tag,
        })
    }

    /// Encode back to the 16-character uppercase catalog form.
    pub fn to_hex(&self) -> String {
        format!(
            "{:04X}{:02X}{:02X}{:04X}{:02X}{:02X}",
            self.game_character_id.swap_bytes(),
            self.character_variant,
            self.figure_type,
            self.model_number,
            self.series,
            self.format_tag,
        )
    }

    pub fn game_character_id(&self) -> u16 {
        self.game_character_id
    }

    pub fn character_variant(&self) -> u8 {
        self.character_variant
    }

    pub fn figure_type(&self) -> u8 {
        self.figure_type
    }

    pub fn series(&self) -> u8 {
        self.series
    }

    pub fn model_number(&self) -> u16 {
        self.model_number
    }

    pub fn format_tag(&self) -> u8 {
        self.format_tag
    }
}

/// Parse one fixed-width field. `from_str_radix` tolerates a leading `+`,
/// so every character is checked first.
fn parse_segment(segment: &str) -> CodecResult<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::MalformedHex {
            segment: segment.to_string(),
        });
    }
    u32::from_str_radix(segment, 16).map_err(|_| CodecError::MalformedHex {
        segment: segment.to_string(),
    })
}

impl FromStr for HexIdentity {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for HexIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexIdentity({})", self.to_hex())
    }
}

impl fmt::Display for HexIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
