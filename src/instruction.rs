use crate::rotation::{MADCTL_BGR, MADCTL_MX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Sleep Out (11h) - Exit low-power mode
    SleepOut = 0x11,
    /// Gamma Set (26h) - Select gamma curve
    GammaSet = 0x26,
    /// Display Inversion Off (20h) - Disable color inversion
    DisplayInversionOff = 0x20,
    /// Display Inversion On (21h) - Enable color inversion
    DisplayInversionOn = 0x21,
    /// Display On (29h) - Enable panel output
    DisplayOn = 0x29,
    /// Column Address Set (2Ah) - Horizontal addressing bounds
    ColumnAddressSet = 0x2A,
    /// Page Address Set (2Bh) - Vertical addressing bounds
    PageAddressSet = 0x2B,
    /// Memory Write (2Ch) - Write to memory
    MemoryWrite = 0x2C,
    /// Memory Access Control (36h) - GRAM orientation/order
    MemoryAccessControl = 0x36,
    /// Pixel Format Set (3Ah) - Color depth configuration
    PixelFormatSet = 0x3A,
    /// Frame Rate Control (B1h) - Normal mode division ratio
    FrameRateControl = 0xB1,
    /// Display Function Control (B6h) - Scan direction/number
    DisplayFunctionControl = 0xB6,
    /// Power Control 1 (C0h) - GVDD level
    PowerControl1 = 0xC0,
    /// Power Control 2 (C1h) - Step-up factor
    PowerControl2 = 0xC1,
    /// VCOM Control 1 (C5h) - VCOMH/VCOML voltage
    VcomControl1 = 0xC5,
    /// VCOM Control 2 (C7h) - VCOM offset
    VcomControl2 = 0xC7,
    /// Power Control A (CBh)
    PowerControlA = 0xCB,
    /// Power Control B (CFh)
    PowerControlB = 0xCF,
    /// Positive Gamma Correction (E0h)
    PositiveGamma = 0xE0,
    /// Negative Gamma Correction (E1h)
    NegativeGamma = 0xE1,
    /// Driver Timing Control A (E8h)
    DriverTimingA = 0xE8,
    /// Driver Timing Control B (EAh)
    DriverTimingB = 0xEA,
    /// Power On Sequence Control (EDh)
    PowerOnSequence = 0xED,
    /// Undocumented vendor register (EFh)
    VendorEf = 0xEF,
    /// Enable 3 Gamma Control (F2h)
    Enable3Gamma = 0xF2,
    /// Pump Ratio Control (F7h)
    PumpRatioControl = 0xF7,
}

/// Register writes issued between reset and sleep-out, in order.
pub(crate) const INIT_SEQUENCE: &[(Instruction, &[u8])] = &[
    (Instruction::VendorEf, &[0x03, 0x80, 0x02]),
    (Instruction::PowerControlA, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    (Instruction::PowerControlB, &[0x00, 0xC1, 0x30]),
    (Instruction::DriverTimingA, &[0x85, 0x00, 0x78]),
    (Instruction::DriverTimingB, &[0x00, 0x00]),
    (Instruction::PowerOnSequence, &[0x64, 0x03, 0x12, 0x81]),
    (Instruction::PumpRatioControl, &[0x20]),
    (Instruction::PowerControl1, &[0x23]), // VRH[5:0]
    (Instruction::PowerControl2, &[0x10]), // SAP[2:0];BT[3:0]
    (Instruction::VcomControl1, &[0x3E, 0x28]),
    (Instruction::VcomControl2, &[0x86]),
    (Instruction::MemoryAccessControl, &[MADCTL_MX | MADCTL_BGR]),
    (Instruction::PixelFormatSet, &[0x55]), // 16 bits per pixel
    (Instruction::FrameRateControl, &[0x00, 0x18]),
    (Instruction::DisplayFunctionControl, &[0x08, 0x82, 0x27]),
    (Instruction::Enable3Gamma, &[0x00]),
    (Instruction::GammaSet, &[0x01]),
    (
        Instruction::PositiveGamma,
        &[
            0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
            0x00,
        ],
    ),
    (
        Instruction::NegativeGamma,
        &[
            0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
            0x0F,
        ],
    ),
];
