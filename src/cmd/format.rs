//! Currency and percentage formatting for terminal output

use rust_decimal::Decimal;

/// Insert thousands separators into the integer part of a plain number
fn group_thousands(s: &str) -> String {
    if let Some(unsigned) = s.strip_prefix('-') {
        return format!("-{}", group_thousands(unsigned));
    }
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(s.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// £1,234.56
pub fn format_gbp(amount: Decimal) -> String {
    let abs = group_thousands(&format!("{:.2}", amount.abs().round_dp(2)));
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-£{}", abs)
    } else {
        format!("£{}", abs)
    }
}

/// +£10.00 / -£10.00
pub fn format_gbp_signed(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        format!("+{}", format_gbp(amount))
    } else {
        format_gbp(amount)
    }
}

/// Budget figures are in £000s: shown as £1.2bn, £350.5m or £900k
pub fn format_thousands(amount: Decimal) -> String {
    let thousand = Decimal::ONE_THOUSAND;
    let million = thousand * thousand;
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    let abs = amount.abs();
    if abs >= million {
        format!("{}£{:.1}bn", sign, (abs / million).round_dp(1))
    } else if abs >= thousand {
        format!("{}£{:.1}m", sign, (abs / thousand).round_dp(1))
    } else {
        format!("{}£{}k", sign, group_thousands(&format!("{:.0}", abs.round_dp(0))))
    }
}

pub fn format_percent(percent: Decimal) -> String {
    format!("{:.2}%", percent.round_dp(2))
}

pub fn format_percent_signed(percent: Decimal) -> String {
    let percent = percent.round_dp(2);
    if percent > Decimal::ZERO {
        format!("+{:.2}%", percent)
    } else {
        format!("{:.2}%", percent)
    }
}

pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Formatted value or "n/a" when the figure is unavailable
pub fn or_na<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| "n/a".to_string())
}
