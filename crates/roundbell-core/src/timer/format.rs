/// Format whole seconds for display.
///
/// Below a minute the bare number is shown; otherwise `M:SS` with the
/// minutes unpadded.
pub fn format_time(secs: u32) -> String {
    if secs < 60 {
        return secs.to_string();
    }
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Duration as shown on a setup stepper: [`format_time`] with a unit
/// suffix for sub-minute values.
pub fn format_stepper(secs: u32) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format_time(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_cases() {
        assert_eq!(format_time(0), "0");
        assert_eq!(format_time(5), "5");
        assert_eq!(format_time(59), "59");
        assert_eq!(format_time(60), "1:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(3725), "62:05");
    }

    #[test]
    fn stepper_suffix() {
        assert_eq!(format_stepper(45), "45s");
        assert_eq!(format_stepper(180), "3:00");
    }
}
