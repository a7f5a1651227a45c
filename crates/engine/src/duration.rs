//! RouterOS duration parsing.
//!
//! RouterOS accepts and prints durations in several spellings: unit
//! suffixes (`1w2d3h4m5s`, `150ms`), clock notation (`00:03:00`, optionally
//! prefixed with days as in `1d02:00:00`), bare seconds (`180`) and the
//! keyword `infinity`. All of them parse to a [`RosDuration`].

use std::time::Duration;

/// A parsed RouterOS duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RosDuration {
    Finite(Duration),
    Infinite,
}

impl RosDuration {
    /// Canonical text used for equivalence comparisons.
    pub fn canonical(&self) -> String {
        match self {
            Self::Finite(d) => format!("{}ms", d.as_millis()),
            Self::Infinite => "infinity".to_string(),
        }
    }
}

/// Parse a RouterOS duration. Returns `None` when `text` is not one.
pub fn parse(text: &str) -> Option<RosDuration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.eq_ignore_ascii_case("infinity") {
        return Some(RosDuration::Infinite);
    }
    if let Ok(secs) = text.parse::<u64>() {
        return Some(RosDuration::Finite(Duration::from_secs(secs)));
    }

    let mut total_ms: u128 = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let (number, tail) = rest.split_at(digits);

        if tail.starts_with(':') {
            // Clock notation is always the final component.
            total_ms = total_ms.checked_add(parse_clock(rest)?)?;
            break;
        }

        let amount: u128 = number.parse().ok()?;
        let (unit_ms, unit_len) = unit(tail)?;
        total_ms = total_ms.checked_add(amount.checked_mul(unit_ms)?)?;
        rest = &tail[unit_len..];
    }

    let millis = u64::try_from(total_ms).ok()?;
    Some(RosDuration::Finite(Duration::from_millis(millis)))
}

fn unit(tail: &str) -> Option<(u128, usize)> {
    const SECOND: u128 = 1_000;
    if tail.starts_with("ms") {
        return Some((1, 2));
    }
    let ms = match tail.chars().next()? {
        'w' => 7 * 24 * 3_600 * SECOND,
        'd' => 24 * 3_600 * SECOND,
        'h' => 3_600 * SECOND,
        'm' => 60 * SECOND,
        's' => SECOND,
        _ => return None,
    };
    Some((ms, 1))
}

fn parse_clock(text: &str) -> Option<u128> {
    let mut parts = text.split(':');
    let hours: u128 = parts.next()?.parse().ok()?;
    let minutes: u128 = parts.next()?.parse().ok()?;
    let seconds = parts.next()?;
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }
    let (whole, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (seconds, None),
    };
    let whole: u128 = whole.parse().ok()?;
    if whole >= 60 {
        return None;
    }
    let millis = match fraction {
        Some(f) if !f.is_empty() && f.len() <= 3 && f.bytes().all(|b| b.is_ascii_digit()) => {
            let padded = format!("{f:0<3}");
            padded.parse::<u128>().ok()?
        }
        Some(_) => return None,
        None => 0,
    };
    Some(((hours * 60 + minutes) * 60 + whole) * 1_000 + millis)
}
