//! Marketplace validation rules
//!
//! CPF/CNPJ check digits, Brazilian phone and CEP formats, e-mail, price and
//! manufacturing-year bounds, and reservation date ranges.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MAX_RESERVATION_DAYS, MIN_MANUFACTURING_YEAR, MIN_RESERVATION_DAYS};
use crate::errors::{FieldMachineError, Result};

// Pattern is static; construction cannot fail at runtime.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static email regex")
});

/// Keep only ASCII digits.
fn strip_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn all_same_digit(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

fn digit_at(digits: &str, index: usize) -> u32 {
    digits.as_bytes().get(index).map_or(0, |b| u32::from(b - b'0'))
}

/// Validate a CPF using both check digits.
pub fn validate_cpf(cpf: &str) -> bool {
    let numbers = strip_digits(cpf);
    if numbers.len() != 11 || all_same_digit(&numbers) {
        return false;
    }

    let mut sum = 0;
    for i in 0..9 {
        sum += digit_at(&numbers, i) * (10 - i as u32);
    }
    let mut digit1 = 11 - (sum % 11);
    if digit1 >= 10 {
        digit1 = 0;
    }

    let mut sum = 0;
    for i in 0..10 {
        sum += digit_at(&numbers, i) * (11 - i as u32);
    }
    let mut digit2 = 11 - (sum % 11);
    if digit2 >= 10 {
        digit2 = 0;
    }

    digit_at(&numbers, 9) == digit1 && digit_at(&numbers, 10) == digit2
}

/// Validate a CNPJ using both check digits.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let numbers = strip_digits(cnpj);
    if numbers.len() != 14 || all_same_digit(&numbers) {
        return false;
    }

    let mut sum = 0;
    let mut weight = 5;
    for i in 0..12 {
        sum += digit_at(&numbers, i) * weight;
        weight = if weight == 2 { 9 } else { weight - 1 };
    }
    let mut digit1 = 11 - (sum % 11);
    if digit1 >= 10 {
        digit1 = 0;
    }

    let mut sum = 0;
    let mut weight = 6;
    for i in 0..13 {
        sum += digit_at(&numbers, i) * weight;
        weight = if weight == 2 { 9 } else { weight - 1 };
    }
    let mut digit2 = 11 - (sum % 11);
    if digit2 >= 10 {
        digit2 = 0;
    }

    digit_at(&numbers, 12) == digit1 && digit_at(&numbers, 13) == digit2
}

/// Validate a tax identifier as either CPF (11 digits) or CNPJ (14 digits).
pub fn validate_cpf_cnpj(doc: &str) -> bool {
    match strip_digits(doc).len() {
        11 => validate_cpf(doc),
        14 => validate_cnpj(doc),
        _ => false,
    }
}

/// Brazilian landline (10 digits) or mobile (11 digits) numbers.
pub fn validate_phone_br(phone: &str) -> bool {
    matches!(strip_digits(phone).len(), 10 | 11)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// CEP is always 8 digits.
pub fn validate_cep(cep: &str) -> bool {
    strip_digits(cep).len() == 8
}

pub fn validate_price(price: f64) -> bool {
    price > 0.0 && price.is_finite()
}

pub fn validate_manufacturing_year(year: i32, current_year: i32) -> bool {
    (MIN_MANUFACTURING_YEAR..=current_year).contains(&year)
}

/// Validate a reservation date range against `today`.
///
/// The range is inclusive; its length must be between 1 and 90 days and may
/// not start in the past.
pub fn validate_reservation_dates(
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    if start_date < today {
        return Err(FieldMachineError::InvalidInput(
            "start date cannot be in the past".into(),
        ));
    }
    if end_date < start_date {
        return Err(FieldMachineError::InvalidInput(
            "end date must be after start date".into(),
        ));
    }

    let days = (end_date - start_date).num_days();
    if days < MIN_RESERVATION_DAYS {
        return Err(FieldMachineError::InvalidInput(format!(
            "minimum rental of {MIN_RESERVATION_DAYS} day"
        )));
    }
    if days > MAX_RESERVATION_DAYS {
        return Err(FieldMachineError::InvalidInput(format!(
            "maximum rental of {MAX_RESERVATION_DAYS} days"
        )));
    }

    Ok(())
}

/// Format digits as `XXX.XXX.XXX-XX`. Non-digits are discarded first.
pub fn format_cpf(cpf: &str) -> String {
    let numbers = strip_digits(cpf);
    if numbers.len() != 11 {
        return numbers;
    }
    format!("{}.{}.{}-{}", &numbers[0..3], &numbers[3..6], &numbers[6..9], &numbers[9..11])
}

/// Format digits as `XX.XXX.XXX/XXXX-XX`. Non-digits are discarded first.
pub fn format_cnpj(cnpj: &str) -> String {
    let numbers = strip_digits(cnpj);
    if numbers.len() != 14 {
        return numbers;
    }
    format!(
        "{}.{}.{}/{}-{}",
        &numbers[0..2],
        &numbers[2..5],
        &numbers[5..8],
        &numbers[8..12],
        &numbers[12..14]
    )
}

/// Format digits as `XXXXX-XXX`.
pub fn format_cep(cep: &str) -> String {
    let numbers = strip_digits(cep);
    if numbers.len() != 8 {
        return numbers;
    }
    format!("{}-{}", &numbers[0..5], &numbers[5..8])
}
