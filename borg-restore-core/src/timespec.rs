// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Age specifications like `5d` or `1.5h`.

use std::sync::LazyLock;

use regex::Regex;

static TIMESPEC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)([a-z]+)$").unwrap());

/// Parse an age specification into a number of seconds.
///
/// Recognized units: `s`/`second(s)`, `minute(s)`, `h`/`hour(s)`,
/// `d`/`day(s)`, `m`/`month(s)` (31 days), `y`/`year(s)` (365 days).
/// Note that `m` is month, not minute. Fractional values are allowed and
/// truncate to whole seconds. Returns `None` for anything that does not
/// match the grammar or uses an unknown unit.
pub fn parse_timespec(spec: &str) -> Option<u64> {
    let caps = TIMESPEC_RE.captures(spec)?;
    let value: f64 = caps[1].parse().ok()?;
    let factor: u64 = match &caps[2] {
        "s" | "second" | "seconds" => 1,
        "minute" | "minutes" => 60,
        "h" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "m" | "month" | "months" => 2_678_400,
        "y" | "year" | "years" => 31_536_000,
        _ => return None,
    };
    Some((value * factor as f64) as u64)
}
