use crate::prelude::*;

/// Lowercase, drop everything except word characters, whitespace and `-`,
/// then collapse whitespace runs into a single `-`.
pub fn slugify(text: &str) -> String {
  let cleaned: String = text
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
    .collect();

  cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// `round(100 * completed / total)`, half rounding up. An empty course is 0%.
pub fn percentage(completed: u64, total: u64) -> u8 {
  if total == 0 {
    return 0;
  }
  let completed = completed.min(total);
  ((200 * completed + total) / (2 * total)) as u8
}

/// Upper bound for a course price in whole currency units.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

pub fn check_price(price: i64) -> Result<i64> {
  match price {
    ..=-1 => Err(Error::validation("Price cannot be negative")),
    0..=MAX_PRICE => Ok(price),
    _ => Err(Error::validation("Price is too large")),
  }
}

/// `round(price * (1 - percent / 100))` in whole currency units.
pub fn discount_price(price: i64, percent: i32) -> i64 {
  let percent = i128::from(percent.clamp(0, 100));
  let discounted = (i128::from(price) * (100 - percent) + 50).div_euclid(100);
  discounted as i64
}

pub fn trimmed(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn require(value: Option<String>, message: &str) -> Result<String> {
  trimmed(value).ok_or_else(|| Error::validation(message))
}

pub fn normalize_email(email: &str) -> Result<String> {
  let email = email.trim().to_lowercase();
  match email.split_once('@') {
    Some((local, domain))
      if !local.is_empty() && domain.contains('.') && !domain.ends_with('.') =>
    {
      Ok(email)
    }
    _ => Err(Error::validation("Enter a valid email address")),
  }
}

/// RFC 3339, `YYYY-MM-DDTHH:MM[:SS]`, or a bare date meaning the end of that
/// day. Values without an offset are taken as UTC.
pub fn parse_datetime(text: &str) -> Result<DateTime> {
  let text = text.trim();
  if let Ok(at) = chrono::DateTime::parse_from_rfc3339(text) {
    return Ok(at.naive_utc());
  }
  for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
    if let Ok(at) = DateTime::parse_from_str(text, format) {
      return Ok(at);
    }
  }
  chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
    .ok()
    .and_then(|date| date.and_hms_opt(23, 59, 59))
    .ok_or_else(|| Error::validation("Invalid date, expected YYYY-MM-DD or an ISO 8601 timestamp"))
}

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn check_password(password: &str) -> Result<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(Error::validation(format!(
      "Password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}
