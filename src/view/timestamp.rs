//! Relative timestamp prefix shown before every line.

use std::time::Duration;

/// Width of the numeric part of the prefix, so columns line up.
const VALUE_WIDTH: usize = 6;

/// Format the age of a line as a bracketed prefix with a trailing space.
///
/// Ages over an hour are shown in hours, over a minute in minutes,
/// otherwise in seconds, always with two decimals.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use watchlog::view::format_age;
///
/// assert_eq!(format_age(Duration::from_millis(1_250)), "[+  1.25s] ");
/// assert_eq!(format_age(Duration::from_secs(90)), "[+  1.50m] ");
/// assert_eq!(format_age(Duration::from_secs(5_400)), "[+  1.50h] ");
/// ```
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs_f64();

    let (value, unit) = if secs > 3_600.0 {
        (secs / 3_600.0, 'h')
    } else if secs > 60.0 {
        (secs / 60.0, 'm')
    } else {
        (secs, 's')
    };

    format!("[+{:>width$.2}{}] ", value, unit, width = VALUE_WIDTH)
}
