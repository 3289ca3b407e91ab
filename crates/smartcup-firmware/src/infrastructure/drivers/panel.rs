use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use smartcup_color::{FrameBuffer, FrameDisplay};

pub(crate) const PANEL_SIZE: usize = 240;

pub(crate) type PanelFrame = FrameBuffer<PANEL_SIZE, PANEL_SIZE>;

const SLEEP_OUT: u8 = 0x11;
const DISPLAY_ON: u8 = 0x29;
const COLUMN_ADDRESS: u8 = 0x2A;
const ROW_ADDRESS: u8 = 0x2B;
const MEMORY_WRITE: u8 = 0x2C;

/// Vendor power-up sequence for the GC9A01 round panel
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (0xEF, &[]),
    (0xEB, &[0x14]),
    (0xFE, &[]),
    (0xEF, &[]),
    (0xEB, &[0x14]),
    (0x84, &[0x40]),
    (0x85, &[0xFF]),
    (0x86, &[0xFF]),
    (0x87, &[0xFF]),
    (0x88, &[0x0A]),
    (0x89, &[0x21]),
    (0x8A, &[0x00]),
    (0x8B, &[0x80]),
    (0x8C, &[0x01]),
    (0x8D, &[0x01]),
    (0x8E, &[0xFF]),
    (0x8F, &[0xFF]),
    (0xB6, &[0x00, 0x20]),
    // memory access: BGR order
    (0x36, &[0x08]),
    // 16 bits per pixel
    (0x3A, &[0x05]),
    (0x90, &[0x08, 0x08, 0x08, 0x08]),
    (0xBD, &[0x06]),
    (0xBC, &[0x00]),
    (0xFF, &[0x60, 0x01, 0x04]),
    (0xC3, &[0x13]),
    (0xC4, &[0x13]),
    (0xC9, &[0x22]),
    (0xBE, &[0x11]),
    (0xE1, &[0x10, 0x0E]),
    (0xDF, &[0x21, 0x0C, 0x02]),
    (0xF0, &[0x45, 0x09, 0x08, 0x08, 0x26, 0x2A]),
    (0xF1, &[0x43, 0x70, 0x72, 0x36, 0x37, 0x6F]),
    (0xF2, &[0x45, 0x09, 0x08, 0x08, 0x26, 0x2A]),
    (0xF3, &[0x43, 0x70, 0x72, 0x36, 0x37, 0x6F]),
    (0xED, &[0x1B, 0x0B]),
    (0xAE, &[0x77]),
    (0xCD, &[0x63]),
    (0x70, &[0x07, 0x07, 0x04, 0x0E, 0x0F, 0x09, 0x07, 0x08, 0x03]),
    (0xE8, &[0x34]),
    (
        0x62,
        &[0x18, 0x0D, 0x71, 0xED, 0x70, 0x70, 0x18, 0x0F, 0x71, 0xEF, 0x70, 0x70],
    ),
    (
        0x63,
        &[0x18, 0x11, 0x71, 0xF1, 0x70, 0x70, 0x18, 0x13, 0x71, 0xF3, 0x70, 0x70],
    ),
    (0x64, &[0x28, 0x29, 0xF1, 0x01, 0xF1, 0x00, 0x07]),
    (0x66, &[0x3C, 0x00, 0xCD, 0x67, 0x45, 0x45, 0x10, 0x00, 0x00, 0x00]),
    (0x67, &[0x00, 0x3C, 0x00, 0x00, 0x00, 0x01, 0x54, 0x10, 0x32, 0x98]),
    (0x74, &[0x10, 0x85, 0x80, 0x00, 0x00, 0x4E, 0x00]),
    (0x98, &[0x3E, 0x07]),
    (0x35, &[]),
    // display inversion on
    (0x21, &[]),
];

/// GC9A01 240x240 panel drawn through an in-RAM frame
///
/// Drawing only touches the frame; `flush` streams the whole frame to the
/// panel in one memory write.
pub(crate) struct Gc9a01<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
    frame: &'static mut PanelFrame,
}

impl<SPI, DC, CS> Gc9a01<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    pub(crate) fn new(spi: SPI, dc: DC, cs: CS, frame: &'static mut PanelFrame) -> Self {
        Self { spi, dc, cs, frame }
    }

    /// Hardware reset followed by the power-up sequence
    pub(crate) fn init<RST, D>(&mut self, reset: &mut RST, delay: &mut D) -> Result<(), SPI::Error>
    where
        RST: OutputPin,
        D: DelayNs,
    {
        let _ = self.cs.set_high();
        let _ = reset.set_high();
        delay.delay_ms(10);
        let _ = reset.set_low();
        delay.delay_ms(10);
        let _ = reset.set_high();
        delay.delay_ms(120);

        for (command, data) in INIT_SEQUENCE {
            self.command(*command, data)?;
        }

        self.command(SLEEP_OUT, &[])?;
        delay.delay_ms(120);
        self.command(DISPLAY_ON, &[])?;
        delay.delay_ms(20);
        Ok(())
    }

    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), SPI::Error> {
        let _ = self.cs.set_low();
        let _ = self.dc.set_low();
        let result = self.spi.write(&[command]).and_then(|()| {
            if data.is_empty() {
                return Ok(());
            }
            let _ = self.dc.set_high();
            self.spi.write(data)
        });
        let _ = self.spi.flush();
        let _ = self.cs.set_high();
        result
    }

    fn set_window(&mut self) -> Result<(), SPI::Error> {
        let [end_hi, end_lo] = ((PANEL_SIZE - 1) as u16).to_be_bytes();
        self.command(COLUMN_ADDRESS, &[0, 0, end_hi, end_lo])?;
        self.command(ROW_ADDRESS, &[0, 0, end_hi, end_lo])
    }

    fn write_frame(&mut self) -> Result<(), SPI::Error> {
        let mut line = [0u8; PANEL_SIZE * 2];
        for row in self.frame.rows() {
            for (bytes, word) in line.chunks_exact_mut(2).zip(row) {
                bytes.copy_from_slice(&word.to_be_bytes());
            }
            self.spi.write(&line)?;
        }
        self.spi.flush()
    }
}

impl<SPI, DC, CS> OriginDimensions for Gc9a01<SPI, DC, CS> {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl<SPI, DC, CS> DrawTarget for Gc9a01<SPI, DC, CS>
where
    SPI: SpiBus,
{
    type Color = Rgb565;
    type Error = SPI::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels).map_err(|never| match never {})
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.clear(color).map_err(|never| match never {})
    }
}

impl<SPI, DC, CS> FrameDisplay for Gc9a01<SPI, DC, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
{
    fn flush(&mut self) -> Result<(), Self::Error> {
        self.set_window()?;

        let _ = self.cs.set_low();
        let _ = self.dc.set_low();
        let result = self.spi.write(&[MEMORY_WRITE]).and_then(|()| {
            let _ = self.dc.set_high();
            self.write_frame()
        });
        let _ = self.cs.set_high();
        result
    }
}
