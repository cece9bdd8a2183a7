/// 2^53: the largest range in which every whole `f64` is exact.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// Normalise a link speed to `<number>G` or `<number>M`.
///
/// Accepts a leading decimal number followed by an optional unit, any case,
/// with optional whitespace in between: `25G`, `25Gbps`, `25 Gbps`, `100GbE`,
/// `2.5 Gbit/s`, `100Mbps`. A bare number below 1000 is read as gigabits.
/// Anything else, including larger bare numbers such as `25000`, is returned
/// verbatim: the unit is ambiguous and no value is guessed.
pub fn normalize_speed(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_string();
    }

    let number_len = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .count();
    if number_len == 0 {
        return raw.to_string();
    }

    let (number, unit) = trimmed.split_at(number_len);
    let value: f64 = match number.parse() {
        Ok(v) => v,
        Err(_) => return raw.to_string(),
    };
    // Past this, whole numbers no longer print back as written.
    if value >= MAX_EXACT {
        return raw.to_string();
    }
    let unit = unit.trim().to_ascii_uppercase();

    let suffix = match unit.as_str() {
        "G" | "GB" | "GBPS" | "GBE" | "GBIT" | "GB/S" | "GBIT/S" => 'G',
        "M" | "MB" | "MBPS" | "MBE" | "MBIT" | "MB/S" | "MBIT/S" => 'M',
        "" if value < 1000.0 => 'G',
        _ => return raw.to_string(),
    };

    format!("{}{}", format_number(value), suffix)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{}", value)
    }
}

/// Normalise an optional speed, keeping `None` as `None`.
pub fn normalize_speed_opt(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_is_unchanged() {
        assert_eq!(normalize_speed("25G"), "25G");
        assert_eq!(normalize_speed("100M"), "100M");
    }

    #[test]
    fn unit_spellings_collapse() {
        assert_eq!(normalize_speed("25Gbps"), "25G");
        assert_eq!(normalize_speed("25 Gbps"), "25G");
        assert_eq!(normalize_speed("25gbps"), "25G");
        assert_eq!(normalize_speed("100GbE"), "100G");
        assert_eq!(normalize_speed("10 Gbit/s"), "10G");
        assert_eq!(normalize_speed("100 Mbps"), "100M");
    }

    #[test]
    fn bare_small_number_is_gigabit() {
        assert_eq!(normalize_speed("25"), "25G");
        assert_eq!(normalize_speed(" 400 "), "400G");
    }

    #[test]
    fn oversized_number_passes_through() {
        assert_eq!(normalize_speed("99999999999999999999999G"), "99999999999999999999999G");
        assert_eq!(normalize_speed("1e400G"), "1e400G");
        assert_eq!(normalize_speed("400000G"), "400000G");
    }

    #[test]
    fn bare_large_number_passes_through() {
        assert_eq!(normalize_speed("25000"), "25000");
    }

    #[test]
    fn fractional_speed_keeps_fraction() {
        assert_eq!(normalize_speed("2.5Gbps"), "2.5G");
        assert_eq!(normalize_speed("10.0G"), "10G");
    }

    #[test]
    fn unrecognized_passes_through_verbatim() {
        assert_eq!(normalize_speed("auto"), "auto");
        assert_eq!(normalize_speed("25 furlongs"), "25 furlongs");
        assert_eq!(normalize_speed("1.2.3G"), "1.2.3G");
        assert_eq!(normalize_speed(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["25G", "25 Gbps", "25", "25000", "2.5Gbps", "auto"] {
            let once = normalize_speed(raw);
            assert_eq!(normalize_speed(&once), once, "raw: {raw}");
        }
    }
}
