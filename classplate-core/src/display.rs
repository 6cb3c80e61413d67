//! Display facade
//!
//! Owns the fixed-zone roles and the chip configuration. The scroll zone
//! is driven separately by [`crate::scroll::ScrollEngine`]; both write
//! through their own [`MatrixWriter`] handle to the same chain.

use crate::chain::{MatrixWriter, Register};
use crate::clock::{TemperatureSource, TimeSource, TEMPERATURE_SENTINEL};
use crate::compositor::{
    clear_module, compose_digit_pair, render_digit_pair, render_text_4x4, write_pattern,
};
use crate::glyph::GlyphDictionary;
use crate::layout::{
    Zone, HOURS_MODULE, MINUTES_MODULE, ROWS, STATUS_MODULES, TEMPERATURE_MODULE, UNIT_MODULE,
};
use crate::state::Brightness;

/// Scan limit register value that enables all eight rows
const SCAN_ALL_ROWS: u8 = 7;

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// The chain transport failed
    Chain(E),
    /// Brightness above the 0-15 range
    InvalidBrightness(u8),
}

/// Whether a render request changed the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOutcome {
    Rendered,
    /// Input was unavailable or out of range; previous content kept
    Skipped,
}

/// Result of one clock-path tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedZoneRefresh {
    pub clock: RenderOutcome,
    pub temperature: RenderOutcome,
}

/// Split a two-digit value into (tens, ones)
const fn split_digits(value: u8) -> (u8, u8) {
    (value / 10, value % 10)
}

/// Facade over the chain for fixed-zone content and global settings
pub struct Display<W, G> {
    writer: W,
    glyphs: G,
    brightness: Brightness,
}

impl<W, G> Display<W, G>
where
    W: MatrixWriter,
    G: GlyphDictionary,
{
    pub fn new(writer: W, glyphs: G, brightness: Brightness) -> Self {
        Self {
            writer,
            glyphs,
            brightness,
        }
    }

    /// Bring the chips out of shutdown in raw (no-decode) matrix mode
    /// and blank everything
    pub fn init(&mut self) -> Result<(), DisplayError<W::Error>> {
        self.write_all(Register::Shutdown, 1)?;
        self.write_all(Register::DecodeMode, 0)?;
        self.write_all(Register::Intensity, self.brightness.value())?;
        self.write_all(Register::ScanLimit, SCAN_ALL_ROWS)?;
        self.write_all(Register::DisplayTest, 0)?;
        self.clear_all()
    }

    fn write_all(&mut self, register: Register, data: u8) -> Result<(), DisplayError<W::Error>> {
        self.writer
            .write_all(register, data)
            .map_err(DisplayError::Chain)
    }

    /// Show `hours:minutes` as two digit pairs
    ///
    /// Both pairs are composed before anything is written, so a skipped
    /// render leaves both modules as they were.
    pub fn render_clock(
        &mut self,
        hours: u8,
        minutes: u8,
    ) -> Result<RenderOutcome, DisplayError<W::Error>> {
        if hours > 23 || minutes > 59 {
            return Ok(RenderOutcome::Skipped);
        }
        let (h_tens, h_ones) = split_digits(hours);
        let (m_tens, m_ones) = split_digits(minutes);

        let (Some(hour_rows), Some(minute_rows)) = (
            compose_digit_pair(&self.glyphs, h_tens, h_ones),
            compose_digit_pair(&self.glyphs, m_tens, m_ones),
        ) else {
            return Ok(RenderOutcome::Skipped);
        };

        write_pattern(&mut self.writer, HOURS_MODULE, &hour_rows).map_err(DisplayError::Chain)?;
        write_pattern(&mut self.writer, MINUTES_MODULE, &minute_rows)
            .map_err(DisplayError::Chain)?;
        Ok(RenderOutcome::Rendered)
    }

    /// Show a two-digit temperature followed by the unit glyph
    ///
    /// The sentinel and anything outside `0..=99` are skipped.
    pub fn render_temperature(&mut self, value: i16) -> Result<RenderOutcome, DisplayError<W::Error>> {
        if value == TEMPERATURE_SENTINEL || !(0..=99).contains(&value) {
            return Ok(RenderOutcome::Skipped);
        }
        let (tens, ones) = split_digits(value as u8);
        let drawn = render_digit_pair(&mut self.writer, &self.glyphs, TEMPERATURE_MODULE, tens, ones)
            .map_err(DisplayError::Chain)?;
        if !drawn {
            return Ok(RenderOutcome::Skipped);
        }
        let unit = self.glyphs.unit_glyph();
        write_pattern(&mut self.writer, UNIT_MODULE, &unit).map_err(DisplayError::Chain)?;
        Ok(RenderOutcome::Rendered)
    }

    /// Validate and broadcast an intensity level
    pub fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError<W::Error>> {
        let brightness = Brightness::new(level).ok_or(DisplayError::InvalidBrightness(level))?;
        self.apply_brightness(brightness)
    }

    /// Broadcast an already validated intensity level
    pub fn apply_brightness(&mut self, brightness: Brightness) -> Result<(), DisplayError<W::Error>> {
        self.write_all(Register::Intensity, brightness.value())?;
        self.brightness = brightness;
        Ok(())
    }

    /// Last brightness successfully applied
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Blank every module on the chain
    pub fn clear_all(&mut self) -> Result<(), DisplayError<W::Error>> {
        for row in 0..ROWS {
            self.write_all(Register::row(row), 0)?;
        }
        Ok(())
    }

    /// Blank the modules of one zone
    pub fn clear_zone(&mut self, zone: Zone) -> Result<(), DisplayError<W::Error>> {
        for module in zone.modules() {
            clear_module(&mut self.writer, module).map_err(DisplayError::Chain)?;
        }
        Ok(())
    }

    /// Leave or enter shutdown; register contents are kept in shutdown
    pub fn set_power(&mut self, on: bool) -> Result<(), DisplayError<W::Error>> {
        self.write_all(Register::Shutdown, on as u8)
    }

    /// Light every LED regardless of content
    pub fn set_test_mode(&mut self, on: bool) -> Result<(), DisplayError<W::Error>> {
        self.write_all(Register::DisplayTest, on as u8)
    }

    /// Show short 4x4 text (e.g. "SYNC") on the clock modules
    ///
    /// The first clock render replaces it. The temperature modules are
    /// not touched.
    pub fn show_status(&mut self, text: &str) -> Result<usize, DisplayError<W::Error>> {
        for module in STATUS_MODULES {
            clear_module(&mut self.writer, module).map_err(DisplayError::Chain)?;
        }
        render_text_4x4(&mut self.writer, &self.glyphs, STATUS_MODULES, text)
            .map_err(DisplayError::Chain)
    }

    /// One clock-path tick: pull time and temperature and redraw what is
    /// available
    pub fn refresh_fixed_zone<T, S>(
        &mut self,
        time: &T,
        temperature: &S,
    ) -> Result<FixedZoneRefresh, DisplayError<W::Error>>
    where
        T: TimeSource,
        S: TemperatureSource,
    {
        let clock = match time.now() {
            Some(now) => self.render_clock(now.hours, now.minutes)?,
            None => RenderOutcome::Skipped,
        };
        let temperature = self.render_temperature(temperature.temperature())?;
        Ok(FixedZoneRefresh { clock, temperature })
    }

    /// Access the underlying writer
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::FrameRecorder;
    use crate::clock::{ClockTime, TemperatureCache, WallClock};
    use crate::glyph::{BuiltinFont, GLYPH_COLUMNS, QUADRANT_ROWS};
    use crate::layout::{ModuleIndex, NUM_MODULES};

    fn display() -> Display<FrameRecorder, BuiltinFont> {
        Display::new(FrameRecorder::new(), BuiltinFont, Brightness::MAX)
    }

    #[test]
    fn test_init_sequence() {
        let mut display = display();
        display.init().unwrap();

        let m = ModuleIndex::new(0).unwrap();
        let chips = &display.writer().chips;
        assert!(chips.iter().all(|chip| chip == &chips[0]));

        let recorder = display.writer();
        assert_eq!(recorder.register(m, Register::Shutdown), 1);
        assert_eq!(recorder.register(m, Register::DecodeMode), 0);
        assert_eq!(recorder.register(m, Register::Intensity), 15);
        assert_eq!(recorder.register(m, Register::ScanLimit), 7);
        assert_eq!(recorder.register(m, Register::DisplayTest), 0);
    }

    #[test]
    fn test_clock_0945() {
        let mut display = display();
        let outcome = display.render_clock(9, 45).unwrap();
        assert_eq!(outcome, RenderOutcome::Rendered);

        let recorder = display.writer();
        assert_eq!(
            recorder.rows(HOURS_MODULE),
            compose_digit_pair(&BuiltinFont, 0, 9).unwrap()
        );
        assert_eq!(
            recorder.rows(MINUTES_MODULE),
            compose_digit_pair(&BuiltinFont, 4, 5).unwrap()
        );
    }

    #[test]
    fn test_clock_out_of_range_is_skipped() {
        let mut display = display();
        assert_eq!(display.render_clock(24, 0), Ok(RenderOutcome::Skipped));
        assert_eq!(display.render_clock(12, 60), Ok(RenderOutcome::Skipped));
        assert!(display.writer().frames.is_empty());
    }

    #[test]
    fn test_temperature_sentinel_keeps_previous_content() {
        let mut display = display();
        display.render_temperature(21).unwrap();
        let frames = display.writer().frames.len();
        let before = display.writer().rows(TEMPERATURE_MODULE);

        assert_eq!(
            display.render_temperature(TEMPERATURE_SENTINEL),
            Ok(RenderOutcome::Skipped)
        );
        assert_eq!(display.writer().frames.len(), frames);
        assert_eq!(display.writer().rows(TEMPERATURE_MODULE), before);
    }

    #[test]
    fn test_temperature_writes_unit_glyph() {
        let mut display = display();
        assert_eq!(display.render_temperature(7), Ok(RenderOutcome::Rendered));

        let recorder = display.writer();
        assert_eq!(
            recorder.rows(TEMPERATURE_MODULE),
            compose_digit_pair(&BuiltinFont, 0, 7).unwrap()
        );
        assert_eq!(recorder.rows(UNIT_MODULE), BuiltinFont.unit_glyph());
    }

    #[test]
    fn test_three_digit_temperature_is_skipped() {
        let mut display = display();
        assert_eq!(display.render_temperature(100), Ok(RenderOutcome::Skipped));
        assert_eq!(display.render_temperature(-5), Ok(RenderOutcome::Skipped));
    }

    #[test]
    fn test_brightness_validation() {
        let mut display = display();
        assert_eq!(
            display.set_brightness(16),
            Err(DisplayError::InvalidBrightness(16))
        );
        assert!(display.writer().frames.is_empty());

        display.set_brightness(3).unwrap();
        assert_eq!(display.brightness().value(), 3);
        let m = ModuleIndex::new(NUM_MODULES - 1).unwrap();
        assert_eq!(display.writer().register(m, Register::Intensity), 3);
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let mut display = display();
        display.render_clock(12, 34).unwrap();
        display.render_temperature(56).unwrap();

        display.clear_all().unwrap();
        let once = display.writer().chips;
        display.clear_all().unwrap();
        let twice = display.writer().chips;

        assert_eq!(once, twice);
        for module in ModuleIndex::all() {
            assert_eq!(display.writer().rows(module), [0; ROWS]);
        }
    }

    #[test]
    fn test_clear_zone_keeps_other_zone() {
        let mut display = display();
        display.render_clock(12, 34).unwrap();
        write_pattern(display.writer(), ModuleIndex::new(6).unwrap(), &[0x18; ROWS]).unwrap();

        display.clear_zone(Zone::Fixed).unwrap();
        for module in Zone::Fixed.modules() {
            assert_eq!(display.writer().rows(module), [0; ROWS]);
        }
        assert_eq!(display.writer().rows(ModuleIndex::new(6).unwrap()), [0x18; ROWS]);
    }

    #[test]
    fn test_chain_error_propagates() {
        let mut display = display();
        display.writer().fail_after = Some(0);
        assert_eq!(display.render_clock(1, 2), Err(DisplayError::Chain(())));
    }

    #[test]
    fn test_refresh_skips_unsynced_clock() {
        let mut display = display();
        let clock = WallClock::new();
        let mut weather = TemperatureCache::new(900);
        weather.report(18);

        let refresh = display.refresh_fixed_zone(&clock, &weather).unwrap();
        assert_eq!(refresh.clock, RenderOutcome::Skipped);
        assert_eq!(refresh.temperature, RenderOutcome::Rendered);
    }

    #[test]
    fn test_refresh_renders_synced_clock() {
        let mut display = display();
        let mut clock = WallClock::new();
        clock.set(ClockTime::new(9, 45, 0).unwrap());
        let weather = TemperatureCache::new(900);

        let refresh = display.refresh_fixed_zone(&clock, &weather).unwrap();
        assert_eq!(refresh.clock, RenderOutcome::Rendered);
        assert_eq!(refresh.temperature, RenderOutcome::Skipped);
    }

    #[test]
    fn test_show_status_uses_clock_modules_only() {
        let mut display = display();
        assert_eq!(display.show_status("SYNC"), Ok(4));
        assert_ne!(display.writer().rows(HOURS_MODULE), [0; ROWS]);
        for module in [TEMPERATURE_MODULE, UNIT_MODULE, MINUTES_MODULE] {
            assert_eq!(display.writer().rows(module), [0; ROWS]);
        }
        for module in Zone::Scroll.modules() {
            assert_eq!(display.writer().rows(module), [0; ROWS]);
        }
    }

    #[test]
    fn test_status_survives_temperature_until_clock_renders() {
        let mut display = display();
        display.show_status("SYNC").unwrap();
        let banner = display.writer().rows(HOURS_MODULE);

        let clock = WallClock::new();
        let mut weather = TemperatureCache::new(900);
        weather.report(21);
        let refresh = display.refresh_fixed_zone(&clock, &weather).unwrap();
        assert_eq!(refresh.temperature, RenderOutcome::Rendered);
        assert_eq!(display.writer().rows(HOURS_MODULE), banner);

        display.render_clock(9, 45).unwrap();
        assert_eq!(
            display.writer().rows(HOURS_MODULE),
            compose_digit_pair(&BuiltinFont, 0, 9).unwrap()
        );
        assert_eq!(
            display.writer().rows(TEMPERATURE_MODULE),
            compose_digit_pair(&BuiltinFont, 2, 1).unwrap()
        );
    }

    /// Built-in font with one digit missing
    struct NoNine;

    impl GlyphDictionary for NoNine {
        fn glyph_8x8(&self, c: char) -> Option<[u8; ROWS]> {
            BuiltinFont.glyph_8x8(c)
        }

        fn glyph_4x4(&self, c: char) -> Option<[u8; QUADRANT_ROWS]> {
            BuiltinFont.glyph_4x4(c)
        }

        fn scroll_glyph(&self, c: char) -> Option<[u8; GLYPH_COLUMNS]> {
            BuiltinFont.scroll_glyph(c)
        }

        fn digit(&self, value: u8) -> Option<[u8; 8]> {
            if value == 9 {
                None
            } else {
                BuiltinFont.digit(value)
            }
        }

        fn unit_glyph(&self) -> [u8; ROWS] {
            BuiltinFont.unit_glyph()
        }
    }

    #[test]
    fn test_clock_missing_minute_digit_writes_nothing() {
        let mut display = Display::new(FrameRecorder::new(), NoNine, Brightness::MAX);
        display.render_clock(12, 0).unwrap();
        let frames = display.writer().frames.len();
        let hours = display.writer().rows(HOURS_MODULE);

        assert_eq!(display.render_clock(11, 59), Ok(RenderOutcome::Skipped));
        assert_eq!(display.writer().frames.len(), frames);
        assert_eq!(display.writer().rows(HOURS_MODULE), hours);
    }

    #[test]
    fn test_power_and_test_mode_reach_every_chip() {
        let mut display = display();
        display.init().unwrap();

        display.set_power(false).unwrap();
        for module in ModuleIndex::all() {
            assert_eq!(display.writer().register(module, Register::Shutdown), 0);
        }
        display.set_power(true).unwrap();
        for module in ModuleIndex::all() {
            assert_eq!(display.writer().register(module, Register::Shutdown), 1);
        }

        display.set_test_mode(true).unwrap();
        for module in ModuleIndex::all() {
            assert_eq!(display.writer().register(module, Register::DisplayTest), 1);
        }
        display.set_test_mode(false).unwrap();
        for module in ModuleIndex::all() {
            assert_eq!(display.writer().register(module, Register::DisplayTest), 0);
        }
        // Neither setting touches the rows
        assert!(ModuleIndex::all().all(|m| display.writer().rows(m) == [0; ROWS]));
    }
}
