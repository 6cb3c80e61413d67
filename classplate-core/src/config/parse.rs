//! Minimal TOML parser for the device configuration
//!
//! Handles only the subset the configuration file uses. It does NOT
//! support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers
//! - Comments (# ...), including after a value
//!
//! NOT supported:
//! - Multi-line strings and escape sequences
//! - Arrays and inline tables
//! - Dotted keys

use super::DisplayConfig;
use crate::state::MessageText;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (line number)
    InvalidSection(usize),
    /// Key not known in its section (line number)
    UnknownKey(usize),
    /// Value of the wrong type or out of range for its field (line number)
    InvalidValue(usize),
    /// Line is neither a header nor `key = value` (line number)
    Syntax(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Scroll,
    Display,
    Clock,
    Link,
}

/// Parse TOML configuration into a [`DisplayConfig`]
///
/// Keys that are absent keep their default value. Ranges are checked
/// separately by [`DisplayConfig::validate`].
pub fn parse_config(input: &str) -> Result<DisplayConfig, ParseError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line).ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Syntax(line_no))?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    Ok(config)
}

fn parse_section_header(line: &str) -> Option<Section> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    match name {
        "scroll" => Some(Section::Scroll),
        "display" => Some(Section::Display),
        "clock" => Some(Section::Clock),
        "link" => Some(Section::Link),
        _ => None,
    }
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let mut in_string = false;
    let mut end = value.len();
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let value = value[..end].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Option<&str> {
    value.strip_prefix('"')?.strip_suffix('"')
}

/// Parse an integer, allowing `_` between digits
fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    let mut digits = heapless::String::<24>::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).ok()?;
    }
    digits.parse().ok()
}

fn apply_value(
    config: &mut DisplayConfig,
    section: Section,
    key: &str,
    value: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let invalid = || ParseError::InvalidValue(line_no);

    match (section, key) {
        (Section::Scroll, "cadence_ms") => {
            config.scroll.cadence_ms = parse_int(value).ok_or_else(invalid)?;
        }
        (Section::Scroll, "default_message") => {
            let text = parse_string(value).ok_or_else(invalid)?;
            config.scroll.default_message =
                MessageText::try_from(text).map_err(|_| invalid())?;
        }
        (Section::Scroll, "char_gap_columns") => {
            config.scroll.char_gap_columns = parse_int(value).ok_or_else(invalid)?;
        }
        (Section::Scroll, "end_gap_columns") => {
            config.scroll.end_gap_columns = parse_int(value).ok_or_else(invalid)?;
        }
        (Section::Display, "brightness") => {
            config.display.brightness = parse_int(value).ok_or_else(invalid)?;
        }
        (Section::Clock, "refresh_ms") => {
            config.clock.refresh_ms = parse_int(value).ok_or_else(invalid)?;
        }
        (Section::Clock, "temperature_max_age_s") => {
            config.clock.temperature_max_age_s = parse_int(value).ok_or_else(invalid)?;
        }
        (Section::Link, "heartbeat_interval_s") => {
            config.link.heartbeat_interval_s = parse_int(value).ok_or_else(invalid)?;
        }
        _ => return Err(ParseError::UnknownKey(line_no)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MESSAGE;

    const SAMPLE: &str = r#"
# Classplate configuration

[scroll]
cadence_ms = 60          # faster than default
default_message = "WELCOME # ROOM 4"
end_gap_columns = 32

[display]
brightness = 8

[clock]
temperature_max_age_s = 1_800

[link]
heartbeat_interval_s = 30
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.scroll.cadence_ms, 60);
        assert_eq!(config.scroll.default_message.as_str(), "WELCOME # ROOM 4");
        assert_eq!(config.scroll.end_gap_columns, 32);
        assert_eq!(config.scroll.char_gap_columns, 2);
        assert_eq!(config.display.brightness, 8);
        assert_eq!(config.clock.refresh_ms, 1000);
        assert_eq!(config.clock.temperature_max_age_s, 1800);
        assert_eq!(config.link.heartbeat_interval_s, 30);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_input_is_default() {
        let config = parse_config("# nothing here\n").unwrap();
        assert_eq!(config, DisplayConfig::default());
        assert_eq!(config.scroll.default_message.as_str(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[wifi]\nssid = \"x\"\n"),
            Err(ParseError::InvalidSection(1))
        );
    }

    #[test]
    fn test_unknown_key_reports_line() {
        assert_eq!(
            parse_config("[scroll]\ncadence_ms = 80\nspeed = 3\n"),
            Err(ParseError::UnknownKey(3))
        );
    }

    #[test]
    fn test_invalid_value() {
        assert_eq!(
            parse_config("[display]\nbrightness = bright\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[display]\nbrightness = 300\n"),
            Err(ParseError::InvalidValue(2))
        );
    }

    #[test]
    fn test_missing_equals_is_syntax_error() {
        assert_eq!(parse_config("[clock]\nrefresh_ms\n"), Err(ParseError::Syntax(2)));
    }

    #[test]
    fn test_out_of_range_parses_but_fails_validation() {
        let config = parse_config("[display]\nbrightness = 20\n").unwrap();
        assert!(config.validate().is_err());
    }
}
