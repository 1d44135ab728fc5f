//! Currency helpers. Every amount in the system is INR.

pub const CURRENCY_CODE: &str = "INR";
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format `amount` with the rupee symbol and Indian digit grouping
/// (`1234567.5` -> `₹12,34,567.5`). At most three fraction digits are kept.
pub fn format_inr(amount: f64) -> String {
    let grouped = group_indian(amount);
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-{CURRENCY_SYMBOL}{rest}"),
        None => format!("{CURRENCY_SYMBOL}{grouped}"),
    }
}

fn group_indian(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rounded = (amount.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{rounded:.3}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + 8);
    if amount < 0.0 && rounded != 0.0 {
        out.push('-');
    }

    if int_part.len() <= 3 {
        out.push_str(int_part);
    } else {
        let (head, last3) = int_part.split_at(int_part.len() - 3);
        let lead = head.len() % 2;
        if lead == 1 {
            out.push_str(&head[..1]);
        }
        for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
            if i > 0 || lead == 1 {
                out.push(',');
            }
            // Digits are ASCII.
            out.push_str(std::str::from_utf8(pair).unwrap_or_default());
        }
        out.push(',');
        out.push_str(last3);
    }

    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Parse the leading decimal number of `input`, ignoring trailing garbage
/// (`"300abc"` -> 300). Returns `None` when no digits lead the string or the
/// result is not finite.
pub fn parse_amount_lenient(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
