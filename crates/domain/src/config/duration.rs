//! Go-style duration strings: `300ms`, `1m`, `1h30m`, `1.5h`.

use std::time::Duration;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(1_000_000_000),
        "m" => Some(60 * 1_000_000_000),
        "h" => Some(3_600 * 1_000_000_000),
        _ => None,
    }
}

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s.starts_with('-') {
        return Err(format!("negative duration '{}'", input));
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let mut total: u128 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(format!("invalid duration '{}'", input));
        }
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        if unit.is_empty() {
            return Err(format!("missing unit in duration '{}'", input));
        }
        let nanos_per_unit = unit_nanos(unit)
            .ok_or_else(|| format!("unknown unit '{}' in duration '{}'", unit, input))?;

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| format!("invalid duration '{}'", input))?
        };
        total = total
            .checked_add(whole.saturating_mul(nanos_per_unit))
            .ok_or_else(|| format!("duration '{}' overflows", input))?;

        if !fraction.is_empty() {
            let digits: u32 = fraction.len().min(18) as u32;
            let frac_value: u128 = fraction[..digits as usize]
                .parse()
                .map_err(|_| format!("invalid duration '{}'", input))?;
            total += frac_value * nanos_per_unit / 10u128.pow(digits);
        }
    }

    let secs = u64::try_from(total / 1_000_000_000).map_err(|_| format!("duration '{}' overflows", input))?;
    Ok(Duration::new(secs, (total % 1_000_000_000) as u32))
}
