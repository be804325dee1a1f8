/// Row address order (mirror Y).
pub const MADCTL_MY: u8 = 0x80;
/// Column address order (mirror X).
pub const MADCTL_MX: u8 = 0x40;
/// Row/column exchange.
pub const MADCTL_MV: u8 = 0x20;
/// BGR color filter panel order.
pub const MADCTL_BGR: u8 = 0x08;

/// Hardware rotation, applied through memory access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// Memory access control value per rotation, indexed by `Rotation as usize`.
const MADCTL_TABLE: [u8; 4] = [
    MADCTL_MX | MADCTL_BGR,
    MADCTL_MV | MADCTL_BGR,
    MADCTL_MY | MADCTL_BGR,
    MADCTL_MX | MADCTL_MY | MADCTL_MV | MADCTL_BGR,
];

impl Rotation {
    /// Maps any mode number onto a rotation, wrapping modulo 4.
    pub fn from_index(mode: u8) -> Self {
        match mode % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Get the next rotation in the cycle
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Get rotation angle in degrees for logging
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Memory access control byte sent with command 0x36.
    pub fn madctl(self) -> u8 {
        MADCTL_TABLE[self as usize]
    }

    /// True when rows and columns are exchanged, i.e. width and height swap.
    pub fn swaps_axes(self) -> bool {
        self.madctl() & MADCTL_MV != 0
    }

    /// Logical `(width, height)` for a panel whose rotation-0 size is given.
    pub fn dimensions(self, width: u16, height: u16) -> (u16, u16) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }
}
