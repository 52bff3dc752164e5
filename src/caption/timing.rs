/*!
 * Clock arithmetic shared by readers and writers.
 *
 * The model keeps microseconds. Output formats carry milliseconds at most,
 * so rendering truncates to the millisecond and never rounds up.
 */

pub const MICROS_PER_MILLI: u64 = 1_000;
const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Decimal separator before the millisecond field in SRT timestamps
pub const SRT_MILLIS_SEPARATOR: char = ',';

/// Decimal separator before the millisecond field in WebVTT and TTML clock times
pub const CLOCK_MILLIS_SEPARATOR: char = '.';

pub fn millis_to_micros(ms: u64) -> u64 {
    ms.saturating_mul(MICROS_PER_MILLI)
}

/// Truncating conversion to whole milliseconds
pub fn micros_to_millis(us: u64) -> u64 {
    us / MICROS_PER_MILLI
}

/// Render `HH:MM:SS{separator}mmm`; hours widen past two digits when needed
pub fn format_clock(us: u64, separator: char) -> String {
    let ms = micros_to_millis(us);
    let hours = ms / MILLIS_PER_HOUR;
    let minutes = (ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
    let seconds = (ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
    let millis = ms % MILLIS_PER_SECOND;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, separator, millis)
}

/// `HH:MM:SS,mmm`
pub fn format_srt_timestamp(us: u64) -> String {
    format_clock(us, SRT_MILLIS_SEPARATOR)
}

/// `HH:MM:SS.mmm`
pub fn format_vtt_timestamp(us: u64) -> String {
    format_clock(us, CLOCK_MILLIS_SEPARATOR)
}

/// TTML clock-time with fraction, `HH:MM:SS.mmm`
pub fn format_ttml_timestamp(us: u64) -> String {
    format_clock(us, CLOCK_MILLIS_SEPARATOR)
}

/// Parse `HH:MM:SS,mmm` (or with `.`) into microseconds.
///
/// The fraction may have one to three digits (`,5` is 500 ms); anything
/// finer than a millisecond is truncated.
pub fn parse_clock(timestamp: &str) -> Option<u64> {
    let timestamp = timestamp.trim();
    let (clock, fraction) = match timestamp.find([',', '.']) {
        Some(index) => (&timestamp[..index], &timestamp[index + 1..]),
        None => (timestamp, ""),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (parse_digits(h)?, parse_digits(m)?, parse_digits(s)?),
        [m, s] => (0, parse_digits(m)?, parse_digits(s)?),
        _ => return None,
    };

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let millis = if fraction.is_empty() {
        0
    } else {
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let padded: String = fraction.chars().chain("000".chars()).take(3).collect();
        padded.parse::<u64>().ok()?
    };

    // Out-of-range hours are rejected rather than wrapped
    let total_ms = hours
        .checked_mul(MILLIS_PER_HOUR)?
        .checked_add(minutes * MILLIS_PER_MINUTE + seconds * MILLIS_PER_SECOND + millis)?;
    total_ms.checked_mul(MICROS_PER_MILLI)
}

fn parse_digits(field: &str) -> Option<u64> {
    let field = field.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
