/// A 32-bit ARGB pixel. Alpha is always fully opaque, so the only way to build
/// one is through the constructors below.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    a: u8,
}

pub const OPAQUE: u8 = 0xFF;

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: OPAQUE }
    }

    /// Builds a colour from a packed `0xAARRGGBB` value. The alpha byte is
    /// ignored and forced opaque.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self::rgb((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
    }

    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.a
    }

    #[must_use]
    pub const fn to_argb(&self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Memory order of a little-endian ARGB word: b, g, r, a.
    #[must_use]
    pub const fn to_le_bytes(&self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}
