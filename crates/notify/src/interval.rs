//! Human interval strings (`30s`, `5m`, `1h30m`) as used in monitoring configs.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ChannelError;

static INTERVAL_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<value>[0-9]+)(?P<unit>[smhdw])").unwrap());

fn unit_seconds(unit: &str) -> u64 {
    match unit {
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        _ => 1,
    }
}

/// Convert a human interval into seconds.
///
/// Parts are summed, so `1h30m` is 5400. Every part is digits followed by
/// one of the units `s m h d w`; zero-valued parts are allowed.
pub fn human_to_seconds(interval: &str) -> Result<u64, ChannelError> {
    let bad = || ChannelError::InvalidInterval(interval.to_string());

    if interval.is_empty() {
        return Err(bad());
    }

    let mut rest = interval;
    let mut seconds: u64 = 0;

    while !rest.is_empty() {
        let caps = INTERVAL_PART.captures(rest).ok_or_else(bad)?;
        let value: u64 = caps["value"].parse().map_err(|_| bad())?;
        let part = value.checked_mul(unit_seconds(&caps["unit"])).ok_or_else(bad)?;
        seconds = seconds.checked_add(part).ok_or_else(bad)?;
        rest = &rest[caps[0].len()..];
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(human_to_seconds("30s").unwrap(), 30);
        assert_eq!(human_to_seconds("42m").unwrap(), 2_520);
        assert_eq!(human_to_seconds("2h").unwrap(), 7_200);
        assert_eq!(human_to_seconds("1d").unwrap(), 86_400);
        assert_eq!(human_to_seconds("1w").unwrap(), 604_800);
    }

    #[test]
    fn test_compound_interval() {
        assert_eq!(human_to_seconds("1h30m").unwrap(), 5_400);
        assert_eq!(human_to_seconds("1m5s").unwrap(), 65);
    }

    #[test]
    fn test_zero_valued_parts() {
        assert_eq!(human_to_seconds("0s").unwrap(), 0);
        assert_eq!(human_to_seconds("0m").unwrap(), 0);
        assert_eq!(human_to_seconds("1h0m").unwrap(), 3_600);
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(matches!(
            human_to_seconds("99999999999999999999w"),
            Err(ChannelError::InvalidInterval(_))
        ));
        assert!(matches!(
            human_to_seconds("40000000000000w"),
            Err(ChannelError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "5", "m", "5x", "5m ", " 5m", "-5m", "1h 0m"] {
            assert!(
                matches!(human_to_seconds(bad), Err(ChannelError::InvalidInterval(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
