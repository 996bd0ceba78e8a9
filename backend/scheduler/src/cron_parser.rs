/// Standard cron expression validation and normalization.
///
/// Accepts the five-field dialect (min hour dom mon dow), the `@hourly`
/// family of descriptors and an optional `CRON_TZ=`/`TZ=` prefix, and
/// rewrites it into the six-field syntax understood by the `cron` crate.
use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;

const VALID_RANGES: &[(u32, u32)] = &[
    (0, 59), // minute
    (0, 23), // hour
    (1, 31), // day of month
    (1, 12), // month
    (0, 7),  // day of week (0 and 7 both = Sunday)
];

const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

const DOM: usize = 2;
const MONTH: usize = 3;
const DOW: usize = 4;

/// A standard expression rewritten for the `cron` crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCron {
    /// Zone named by a `CRON_TZ=`/`TZ=` prefix, if any.
    pub time_zone: Option<Tz>,
    /// Six-field expressions; a time matches if any of them matches.
    pub expressions: Vec<String>,
}

/// Normalize a standard cron expression.
pub fn normalize_standard(expr: &str) -> Result<NormalizedCron> {
    let (time_zone, body) = split_time_zone(expr.trim())?;

    if body.starts_with('@') {
        return Ok(NormalizedCron {
            time_zone,
            expressions: vec![expand_descriptor(body)?.to_string()],
        });
    }

    let fields = validate_cron(body)?;
    let minute = &fields[0];
    let hour = &fields[1];
    let month = &fields[MONTH];
    let dom = wildcard_question(&fields[DOM]);
    let dow = day_names(&fields[DOW])?;

    // Standard cron ORs the two day fields when both are restricted; the
    // `cron` crate always ANDs them, so split into one schedule per field.
    let expressions = if is_star(&fields[DOM]) || is_star(&fields[DOW]) {
        vec![format!("0 {minute} {hour} {dom} {month} {dow}")]
    } else {
        vec![
            format!("0 {minute} {hour} {dom} {month} *"),
            format!("0 {minute} {hour} * {month} {dow}"),
        ]
    };

    Ok(NormalizedCron {
        time_zone,
        expressions,
    })
}

/// Validate a 5-field cron expression and return its fields.
pub fn validate_cron(expr: &str) -> Result<Vec<String>> {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    if parts.len() != 5 {
        bail!(
            "cron expression must have exactly 5 fields, got {}: '{}'",
            parts.len(),
            expr
        );
    }
    for (i, part) in parts.iter().enumerate() {
        validate_field(part, i)
            .map_err(|e| anyhow!("field {} ('{}') invalid: {}", i + 1, part, e))?;
    }
    Ok(parts.into_iter().map(str::to_string).collect())
}

fn split_time_zone(expr: &str) -> Result<(Option<Tz>, &str)> {
    let Some(rest) = expr
        .strip_prefix("CRON_TZ=")
        .or_else(|| expr.strip_prefix("TZ="))
    else {
        return Ok((None, expr));
    };
    let (zone, body) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| anyhow!("missing schedule after time zone prefix"))?;
    let tz = zone
        .parse::<Tz>()
        .map_err(|_| anyhow!("unknown time zone '{}'", zone))?;
    Ok((Some(tz), body.trim_start()))
}

fn expand_descriptor(descriptor: &str) -> Result<&'static str> {
    Ok(match descriptor {
        "@yearly" | "@annually" => "0 0 0 1 1 *",
        "@monthly" => "0 0 0 1 * *",
        "@weekly" => "0 0 0 * * SUN",
        "@daily" | "@midnight" => "0 0 0 * * *",
        "@hourly" => "0 0 * * * *",
        other => bail!("unrecognized descriptor '{}'", other),
    })
}

/// Check whether a cron field is syntactically valid for its position.
fn validate_field(field: &str, index: usize) -> Result<()> {
    let (min, max) = VALID_RANGES[index];
    let allows_question = index == DOM || index == DOW;
    let allows_names = index == MONTH || index == DOW;

    for part in field.split(',') {
        let range_part = match part.split_once('/') {
            Some((r, s)) => {
                let step: u32 = s
                    .parse()
                    .map_err(|_| anyhow!("step '{}' not numeric", s))?;
                if step == 0 {
                    bail!("step must be > 0");
                }
                r
            }
            None => part,
        };

        if range_part == "*" || (allows_question && range_part == "?") {
            continue;
        }
        if allows_names && range_part.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            continue;
        }
        if let Some((lo, hi)) = range_part.split_once('-') {
            let lo: u32 = lo.parse().map_err(|_| anyhow!("'{}' not numeric", lo))?;
            let hi: u32 = hi.parse().map_err(|_| anyhow!("'{}' not numeric", hi))?;
            if lo > hi || lo < min || hi > max {
                bail!("range {}-{} out of [{}, {}]", lo, hi, min, max);
            }
        } else {
            let v: u32 = range_part
                .parse()
                .map_err(|_| anyhow!("'{}' not numeric", range_part))?;
            if v < min || v > max {
                bail!("value {} out of [{}, {}]", v, min, max);
            }
        }
    }
    Ok(())
}

/// `*`, `?` or `*/1`: the field does not restrict anything.
fn is_star(field: &str) -> bool {
    let (base, step) = match field.split_once('/') {
        Some((b, s)) => (b, Some(s)),
        None => (field, None),
    };
    (base == "*" || base == "?") && matches!(step, None | Some("1"))
}

fn wildcard_question(field: &str) -> String {
    field.replace('?', "*")
}

/// Rewrite numeric day-of-week values (0-7, Sunday = 0 or 7) to day names.
fn day_names(field: &str) -> Result<String> {
    if is_star(field) {
        return Ok("*".to_string());
    }

    let mut days = [false; 7];
    let mut passthrough = Vec::new();
    for part in field.split(',') {
        let (base, step) = match part.split_once('/') {
            Some((b, s)) => (b, s.parse::<usize>()?),
            None => (part, 1),
        };
        let (lo, hi) = if base == "*" || base == "?" {
            (0, 6)
        } else if let Some((lo, hi)) = base.split_once('-') {
            match (lo.parse::<usize>(), hi.parse::<usize>()) {
                (Ok(lo), Ok(hi)) => (lo, hi),
                _ => {
                    passthrough.push(part.to_string());
                    continue;
                }
            }
        } else if let Ok(v) = base.parse::<usize>() {
            if part.contains('/') {
                (v, 6)
            } else {
                (v, v)
            }
        } else {
            passthrough.push(part.to_string());
            continue;
        };
        for day in (lo..=hi).step_by(step) {
            days[day % 7] = true;
        }
    }

    let mut names: Vec<String> = days
        .iter()
        .zip(DAY_NAMES)
        .filter(|(set, _)| **set)
        .map(|(_, name)| name.to_string())
        .collect();
    names.extend(passthrough);
    Ok(names.join(","))
}
