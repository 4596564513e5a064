//! SSD1306 command bytes and control prefixes

/// Control byte: the rest of the transaction is a command stream
pub const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: the rest of the transaction is display RAM data
pub const CONTROL_DATA: u8 = 0x40;

pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;
pub const SET_CONTRAST: u8 = 0x81;
pub const RESUME_RAM: u8 = 0xA4;
pub const SET_NORMAL: u8 = 0xA6;
pub const SET_INVERSE: u8 = 0xA7;
pub const SET_MUX_RATIO: u8 = 0xA8;
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
pub const SET_START_LINE: u8 = 0x40;
pub const SET_SEG_REMAP: u8 = 0xA1;
pub const SET_COM_SCAN_DEC: u8 = 0xC8;
pub const SET_COM_PINS: u8 = 0xDA;
pub const SET_CLOCK_DIV: u8 = 0xD5;
pub const SET_CHARGE_PUMP: u8 = 0x8D;
pub const SET_MEMORY_MODE: u8 = 0x20;
pub const SET_PRECHARGE: u8 = 0xD9;
pub const SET_VCOM_DESELECT: u8 = 0xDB;
pub const SET_LOW_COLUMN: u8 = 0x00;
pub const SET_HIGH_COLUMN: u8 = 0x10;
pub const SET_PAGE_ADDR: u8 = 0xB0;

/// Multiplex ratio for 64 rows
pub const MUX_64: u8 = 0x3F;
/// Alternative COM pin configuration for 128x64 panels
pub const COM_PINS_ALT: u8 = 0x12;
/// Internal charge pump on
pub const CHARGE_PUMP_ON: u8 = 0x14;
/// Horizontal addressing mode
pub const MEMORY_MODE_HORIZONTAL: u8 = 0x00;
/// Contrast applied during initialization
pub const INIT_CONTRAST: u8 = 0xFF;
/// Lowest V_COMH deselect level (~0.65 × Vcc), dimmest output
pub const VCOM_DESELECT_MIN: u8 = 0x00;

/// Number of command bytes in the initialization sequence
pub const INIT_LEN: usize = 25;

/// Build the controller initialization command stream
///
/// The control byte is not included.
pub const fn init_sequence(
    refresh_frequency: u8,
    pre_charge_period: u8,
    vcom_deselect: u8,
) -> [u8; INIT_LEN] {
    [
        DISPLAY_OFF,
        SET_MUX_RATIO,
        MUX_64,
        SET_DISPLAY_OFFSET,
        0x00,
        SET_START_LINE,
        SET_SEG_REMAP,    // Flip horizontally
        SET_COM_SCAN_DEC, // Flip vertically
        SET_COM_PINS,
        COM_PINS_ALT,
        SET_CONTRAST,
        INIT_CONTRAST,
        RESUME_RAM,
        SET_NORMAL,
        SET_CLOCK_DIV,
        refresh_frequency,
        SET_CHARGE_PUMP,
        CHARGE_PUMP_ON,
        DISPLAY_ON,
        SET_MEMORY_MODE,
        MEMORY_MODE_HORIZONTAL,
        SET_PRECHARGE,
        pre_charge_period,
        SET_VCOM_DESELECT,
        vcom_deselect,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence_parameters_in_place() {
        let seq = init_sequence(0x80, 0xF1, VCOM_DESELECT_MIN);
        assert_eq!(
            seq,
            [
                0xAE, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0xA1, 0xC8, 0xDA, 0x12, 0x81, 0xFF, 0xA4,
                0xA6, 0xD5, 0x80, 0x8D, 0x14, 0xAF, 0x20, 0x00, 0xD9, 0xF1, 0xDB, 0x00,
            ]
        );
    }
}
