//! Shape checks shared by the draft and patch types.

use crate::{Error, Result};

pub(crate) fn text(field: &str, value: &str, max: usize) -> Result<()> {
  let len = value.trim().chars().count();
  if len == 0 {
    return Err(Error::validation(format!("{field} must not be empty")));
  }
  if len > max {
    return Err(Error::validation(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(())
}

/// Phone numbers are accepted in any punctuation as long as they carry at
/// least ten digits, e.g. `(242) 555-0100`.
pub(crate) fn phone(field: &str, value: &str) -> Result<()> {
  let digits = value.chars().filter(char::is_ascii_digit).count();
  if digits < 10 {
    return Err(Error::validation(format!(
      "{field} must have at least 10 digits"
    )));
  }
  Ok(())
}

pub(crate) fn email(field: &str, value: &str) -> Result<()> {
  match value.split_once('@') {
    Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
      Ok(())
    }
    _ => Err(Error::validation(format!("{field} is not an email address"))),
  }
}

/// Append a tagged line to a free-text notes column.
pub(crate) fn append_note(notes: &mut Option<String>, line: String) {
  *notes = Some(match notes.take() {
    Some(existing) if !existing.trim().is_empty() => {
      format!("{}\n{line}", existing.trim_end())
    }
    _ => line,
  });
}
