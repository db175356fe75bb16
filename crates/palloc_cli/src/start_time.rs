//! Parses the `--start-time` flag's `"HH:MM"` format into minutes since
//! midnight. A small, dedicated parser independent of the core algorithm —
//! its output is the only thing that matters downstream.

use palloc_core::error::PallocError;

pub fn parse_start_time(value: &str) -> Result<u32, PallocError> {
    let (hours, minutes) = value.split_once(':').ok_or_else(|| {
        PallocError::Input(format!("start-time {value:?} is not in \"HH:MM\" format"))
    })?;

    let hours: u32 = hours
        .parse()
        .map_err(|_| PallocError::Input(format!("start-time {value:?} has a non-numeric hour")))?;
    let minutes: u32 = minutes.parse().map_err(|_| {
        PallocError::Input(format!("start-time {value:?} has a non-numeric minute"))
    })?;

    if hours >= 24 || minutes >= 60 {
        return Err(PallocError::Input(format!(
            "start-time {value:?} is out of range (expected 00:00 through 23:59)"
        )));
    }

    Ok(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_midday() {
        assert_eq!(parse_start_time("12:30").unwrap(), 750);
    }

    #[test]
    fn parses_midnight() {
        assert_eq!(parse_start_time("00:00").unwrap(), 0);
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(parse_start_time("1230").is_err());
    }

    #[test]
    fn rejects_out_of_range_hour() {
        assert!(parse_start_time("24:00").is_err());
    }

    #[test]
    fn rejects_out_of_range_minute() {
        assert!(parse_start_time("10:60").is_err());
    }
}
