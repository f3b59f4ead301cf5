//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Names of every `{ident}` placeholder in a template, in order of appearance.
/// Braces around anything that is not a plain identifier are ignored.
pub fn placeholders(tpl: &str) -> Vec<&str> {
  let mut found = Vec::new();
  let mut rest = tpl;
  while let Some(open) = rest.find('{') {
    let after = &rest[open + 1..];
    match after.find('}') {
      Some(close) => {
        let name = &after[..close];
        if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
          found.push(name);
        }
        rest = &after[close + 1..];
      }
      None => break,
    }
  }
  found
}

/// Title-case a word: a letter following a non-letter is upper-cased, all
/// other letters lower-cased. `word_puzzle` becomes `Word_Puzzle`.
pub fn title_case(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut prev_is_letter = false;
  for ch in s.chars() {
    if prev_is_letter {
      out.extend(ch.to_lowercase());
    } else {
      out.extend(ch.to_uppercase());
    }
    prev_is_letter = ch.is_alphabetic();
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
