//! Currency amount parsing and formatting
//!
//! Amounts are held as whole cents so that totals add up exactly and a
//! formatted amount parses back to the same value.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Currency markers stripped before parsing (lower-cased; "rs." before "rs")
const CURRENCY_MARKERS: [&str; 5] = ["pkr", "rs.", "rs", "$", ","];

/// Cell texts that mean "nothing" and parse to zero
const ZERO_SENTINELS: [&str; 6] = ["", "-", "n/a", "0", "0.0", "0.00"];

/// A non-negative money amount in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Create from cents; negative values clamp to zero
    pub fn from_cents(cents: i64) -> Self {
        Self(cents.max(0))
    }

    /// Create from an already numeric value
    ///
    /// Rounds to the nearest cent. NaN, infinities and negative values
    /// become zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self::ZERO;
        }
        let cents = (value * 100.0).round();
        if cents >= i64::MAX as f64 {
            Self(i64::MAX)
        } else {
            Self(cents as i64)
        }
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(*self))
    }
}

/// Parse a currency-like cell into an amount
///
/// Strips currency markers and thousands separators, treats dashes, "N/A"
/// and literal zeros as zero, and never fails: anything unparseable is zero.
/// Negative numbers clamp to zero.
pub fn parse_amount(value: &str) -> Amount {
    let mut clean = value.to_lowercase();
    for marker in CURRENCY_MARKERS {
        clean = clean.replace(marker, "");
    }
    let clean = clean.trim();

    if ZERO_SENTINELS.contains(&clean) {
        return Amount::ZERO;
    }

    parse_decimal(clean)
        .or_else(|| clean.parse::<f64>().ok().map(Amount::from_f64))
        .unwrap_or(Amount::ZERO)
}

/// Exact parse of `[+-]digits[.digits]`, rounding half up to cents
fn parse_decimal(text: &str) -> Option<Amount> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let digit = |i: usize| {
        frac_part
            .as_bytes()
            .get(i)
            .map(|b| (b - b'0') as i64)
            .unwrap_or(0)
    };
    let mut cents = digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }

    let total = whole.checked_mul(100)?.checked_add(cents)?;
    Some(if negative {
        Amount::ZERO
    } else {
        Amount::from_cents(total)
    })
}

/// Format an amount for display
///
/// Zero renders as a single dash; anything else with thousands separators
/// and exactly two fraction digits, e.g. `58,000.00`.
pub fn format_amount(amount: Amount) -> String {
    if amount.is_zero() {
        return "-".to_string();
    }

    let whole = amount.0 / 100;
    let cents = amount.0 % 100;
    format!("{}.{cents:02}", format_with_thousands(whole))
}

/// Format integer with comma thousand separators
fn format_with_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}
