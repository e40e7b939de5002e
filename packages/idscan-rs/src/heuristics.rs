//! Shared predicates deciding whether a string plausibly is a name, a date of
//! birth or an ID token.
use chrono::{Local, NaiveDate};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Card header lines that OCR tends to return as the "longest name-like line".
static NATIONAL_ID_HEADER: OnceLock<Regex> = OnceLock::new();

/// Government and institutional words that never belong in a person's name.
static NAME_GARBAGE: OnceLock<Regex> = OnceLock::new();

/// Words from card labels and issuer boilerplate that still look like names.
static INSTITUTIONAL_DENYLIST: OnceLock<Regex> = OnceLock::new();

fn case_insensitive(pattern: &str) -> Regex {
  RegexBuilder::new(pattern)
    .case_insensitive(true)
    .build()
    .expect("heuristic pattern")
}

pub(crate) fn national_id_header() -> &'static Regex {
  NATIONAL_ID_HEADER.get_or_init(|| {
    case_insensitive(
      r"(REPUBLIKA\s+NG\s+PILIPINAS|PAMBANSANG\s+PAGKAKAKILANLAN|Philippine\s+Identification\s+Card)",
    )
  })
}

fn name_garbage() -> &'static Regex {
  NAME_GARBAGE.get_or_init(|| {
    case_insensitive(
      r"\b(?:REPUBLIKA|REPUBLIC|PILIPINAS|PHILIPPINES|PAMBANS\w*|PAGKAKA\w*|PHILSYS|NATIONAL\s*ID|IDENTIFICATION|LAND\s*TRANSPORTATION|LTO|SOCIAL\s*SECURITY|SYSTEM|SSS|PHILHEALTH|PASSPORT|DFA|PROFESSIONAL\s*REGULATION|PRC|DRIVER'?S?\s*LICEN[CS]E|LICENSE\s*(?:NO|NUMBER)|LICENSE\s*REGISTRATION|DEPARTMENT|COMMISSION|GOVERNMENT|PAMBANSANG|PAGKAKAKILANLAN)\b",
    )
  })
}

fn institutional_denylist() -> &'static Regex {
  INSTITUTIONAL_DENYLIST.get_or_init(|| {
    case_insensitive(
      r"\b(non-?professional|professional|drivers?|license|lto|republic|philippines|department|transportation|office|signature)\b",
    )
  })
}

/// Collapses every whitespace run into a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn letter_count(token: &str) -> usize {
  token.chars().filter(|c| c.is_alphabetic()).count()
}

fn has_digit(text: &str) -> bool {
  text.chars().any(|c| c.is_ascii_digit())
}

/// Share of tokens with at most two letters once punctuation is ignored.
fn short_token_ratio(tokens: &[&str]) -> f32 {
  if tokens.is_empty() {
    return 1.0;
  }
  let short = tokens.iter().filter(|t| letter_count(t) <= 2).count();
  short as f32 / tokens.len() as f32
}

/// Letters and spaces over total length.
fn alphabetic_density(text: &str) -> f32 {
  let total = text.chars().count().max(1);
  let letters = text
    .chars()
    .filter(|c| c.is_alphabetic() || c.is_whitespace())
    .count();
  letters as f32 / total as f32
}

/// Coarse name check used for the "did ROI find anything" diagnostic.
pub fn looks_like_name(raw: &str) -> bool {
  let trimmed = raw.trim();
  if trimmed.chars().count() < 5 || !trimmed.contains(char::is_whitespace) {
    return false;
  }

  let tokens: Vec<&str> = trimmed.split_whitespace().collect();
  if tokens.len() > 6 {
    return false;
  }
  // Short tokens must be fewer than half.
  if short_token_ratio(&tokens) >= 0.5 {
    return false;
  }

  !has_digit(trimmed)
}

pub fn looks_like_dob(raw: &str) -> bool {
  let trimmed = raw.trim().as_bytes();
  trimmed.len() == 10
    && trimmed.iter().enumerate().all(|(i, b)| match i {
      4 | 7 => *b == b'-',
      _ => b.is_ascii_digit(),
    })
}

/// At least six digits somewhere in the string.
pub fn looks_like_id_token(raw: &str) -> bool {
  raw.chars().filter(|c| c.is_ascii_digit()).count() >= 6
}

/// The strict name check applied to final, merged values.
pub fn is_reasonable_full_name(name: &str) -> bool {
  let trimmed = name.trim();
  if national_id_header().is_match(trimmed) {
    return false;
  }
  if !looks_like_name(trimmed) {
    return false;
  }
  if alphabetic_density(trimmed) < 0.6 {
    return false;
  }

  !institutional_denylist().is_match(trimmed)
}

/// Accepts an ISO-ish `Y-M-D` date that exists on the calendar and implies an
/// age between 10 and 110 years on `today`.
pub fn is_reasonable_dob_at(iso_date: &str, today: NaiveDate) -> bool {
  let parts: Vec<&str> = iso_date.trim().split('-').collect();
  let [y, m, d] = parts.as_slice() else {
    return false;
  };
  let (Ok(year), Ok(month), Ok(day)) = (y.parse::<i32>(), m.parse::<u32>(), d.parse::<u32>()) else {
    return false;
  };
  let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
    return false;
  };

  let age_years = (today - date).num_days() as f64 / 365.25;
  (10.0..=110.0).contains(&age_years)
}

pub fn is_reasonable_dob(iso_date: &str) -> bool {
  is_reasonable_dob_at(iso_date, Local::now().date_naive())
}

/// Drops institutional header words from a name; returns `""` when fewer than
/// two tokens survive.
pub fn clean_name_candidate(name: &str) -> String {
  if name.is_empty() {
    return String::new();
  }
  let cleaned = collapse_whitespace(&name_garbage().replace_all(name, " "));
  if cleaned.split_whitespace().count() < 2 {
    return String::new();
  }
  cleaned
}

pub fn is_garbage_name_candidate(name: &str) -> bool {
  !name.is_empty() && name_garbage().is_match(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_looks_like_name() {
    assert!(looks_like_name("JUAN DELA CRUZ"));
    assert!(!looks_like_name("JUAN"));
    assert!(!looks_like_name("xk2 99"));
    assert!(!looks_like_name("A B CD EFGH"));
    assert!(!looks_like_name("ONE TWO THREE FOUR FIVE SIX SEVEN"));
    assert!(!looks_like_name("JUAN DE"));
    assert!(!looks_like_name("MA DE LOS SANTOS"));
    assert!(looks_like_name("JUAN DE CRUZ"));
  }

  #[test]
  fn test_looks_like_dob_and_id() {
    assert!(looks_like_dob("1990-01-02"));
    assert!(!looks_like_dob("1990/01/02"));
    assert!(!looks_like_dob("90-01-02"));
    assert!(looks_like_id_token("CRN-0111-2345678-9"));
    assert!(!looks_like_id_token("12345"));
  }

  #[test]
  fn test_reasonable_full_name() {
    assert!(is_reasonable_full_name("JUAN DELA CRUZ"));
    assert!(is_reasonable_full_name("José Peña Santos"));
    assert!(!is_reasonable_full_name("A"));
    assert!(!is_reasonable_full_name("REPUBLIKA NG PILIPINAS"));
    assert!(!is_reasonable_full_name("LAND TRANSPORTATION OFFICE"));
    assert!(!is_reasonable_full_name("Signature of Holder"));
    assert!(!is_reasonable_full_name("JUAN 1234 CRUZ"));
    assert!(!is_reasonable_full_name("J.-/ ,.;' :;"));
    assert!(is_reasonable_full_name("MARIA BOLTON REYES"));
  }

  #[test]
  fn test_reasonable_dob() {
    let today = day(2024, 6, 1);
    assert!(is_reasonable_dob_at("1990-05-17", today));
    assert!(is_reasonable_dob_at("1990-5-7", today));
    assert!(!is_reasonable_dob_at("2099-01-01", today));
    assert!(!is_reasonable_dob_at("2020-01-01", today));
    assert!(!is_reasonable_dob_at("1900-01-01", today));
    assert!(!is_reasonable_dob_at("1990-02-30", today));
    assert!(!is_reasonable_dob_at("", today));
    assert!(!is_reasonable_dob_at("January 1 1990", today));
  }

  #[test]
  fn test_clean_name_candidate() {
    assert_eq!(clean_name_candidate("REPUBLIC OF THE PHILIPPINES JUAN CRUZ"), "OF THE JUAN CRUZ");
    assert_eq!(clean_name_candidate("PHILHEALTH CRUZ"), "");
    assert!(is_garbage_name_candidate("Land Transportation Office"));
    assert!(!is_garbage_name_candidate("JUAN DELA CRUZ"));
  }
}
