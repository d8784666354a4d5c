/// 16x16 one-bit sprite, one `u16` per row, most significant bit is the leftmost pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stencil {
    rows: [u16; 16],
}

impl Stencil {
    pub const SIZE: usize = 16;

    pub const fn new(rows: [u16; 16]) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn rows(&self) -> &[u16; 16] {
        &self.rows
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < Self::SIZE && y < Self::SIZE && self.rows[y] & (0x8000u16 >> x) != 0
    }

    /// Number of set pixels
    pub fn coverage(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }
}

/// Ring-shaped snowflake
pub const SNOWFLAKE: Stencil = Stencil::new([
    0b0000_0101_0100_0000,
    0b0001_0101_0101_0000,
    0b0010_1000_0010_1000,
    0b0101_0000_0001_0100,
    0b0010_0000_0000_1010,
    0b0100_0011_1100_0100,
    0b1000_0111_1110_0010,
    0b0100_0111_1110_0001,
    0b1000_0111_1110_0010,
    0b0100_0111_1110_0001,
    0b0010_0011_1100_0010,
    0b0101_0000_0000_0100,
    0b0010_1000_0001_0100,
    0b0001_0100_0100_1100,
    0b0000_1010_1010_1000,
    0b0000_0001_0100_0000,
]);
