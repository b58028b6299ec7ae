//! YAML emitter that always quotes string values.
//!
//! `serde_yaml` only quotes strings when it has to, which lets symbols such as
//! `"true"` or `"1e3"` change type on the next read. This emitter writes block
//! style with every string value double-quoted, keeps mapping key order, and
//! leaves plain keys unquoted when they cannot be misread.

use serde_yaml::Value;
use serde_yaml::value::TaggedValue;

const INDENT: usize = 2;

/// Render a YAML document.
pub fn to_string(value: &Value) -> String {
  let mut out = String::new();
  match value {
    Value::Mapping(map) if !map.is_empty() => emit_mapping(&mut out, map, 0),
    Value::Sequence(seq) if !seq.is_empty() => emit_sequence(&mut out, seq, 0),
    other => {
      out.push_str(&flow(other));
      out.push('\n');
    }
  }
  out
}

fn is_block(value: &Value) -> bool {
  match value {
    Value::Mapping(map) => !map.is_empty(),
    Value::Sequence(seq) => !seq.is_empty(),
    _ => false,
  }
}

fn emit_block(out: &mut String, value: &Value, indent: usize) {
  match value {
    Value::Mapping(map) => emit_mapping(out, map, indent),
    Value::Sequence(seq) => emit_sequence(out, seq, indent),
    _ => {}
  }
}

fn emit_mapping(out: &mut String, map: &serde_yaml::Mapping, indent: usize) {
  let pad = " ".repeat(indent);
  for (key, value) in map {
    out.push_str(&pad);
    out.push_str(&key_repr(key));
    out.push(':');
    if is_block(value) {
      out.push('\n');
      emit_block(out, value, indent + INDENT);
    } else {
      out.push(' ');
      out.push_str(&flow(value));
      out.push('\n');
    }
  }
}

fn emit_sequence(out: &mut String, seq: &[Value], indent: usize) {
  let pad = " ".repeat(indent);
  for item in seq {
    if is_block(item) {
      // Render the nested block one level deeper, then fold its first line
      // onto the dash: both prefixes are `indent + INDENT` wide.
      let mut nested = String::new();
      emit_block(&mut nested, item, indent + INDENT);
      out.push_str(&pad);
      out.push_str("- ");
      out.push_str(&nested[indent + INDENT..]);
    } else {
      out.push_str(&pad);
      out.push_str("- ");
      out.push_str(&flow(item));
      out.push('\n');
    }
  }
}

/// Single-line rendering of any value.
fn flow(value: &Value) -> String {
  match value {
    Value::Null => "null".to_string(),
    Value::Bool(b) => b.to_string(),
    Value::Number(n) => n.to_string(),
    Value::String(s) => quote(s),
    Value::Sequence(seq) => {
      let items: Vec<String> = seq.iter().map(flow).collect();
      format!("[{}]", items.join(", "))
    }
    Value::Mapping(map) => {
      let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{}: {}", key_repr(k), flow(v)))
        .collect();
      format!("{{{}}}", entries.join(", "))
    }
    Value::Tagged(tagged) => tagged_repr(tagged),
  }
}

fn tagged_repr(tagged: &TaggedValue) -> String {
  let tag = tagged.tag.to_string();
  let tag = if tag.starts_with('!') { tag } else { format!("!{}", tag) };
  format!("{} {}", tag, flow(&tagged.value))
}

fn key_repr(key: &Value) -> String {
  match key {
    Value::String(s) if is_plain_key(s) => s.clone(),
    other => flow(other),
  }
}

/// Whether `s` reads back as the same string when written unquoted as a key.
fn is_plain_key(s: &str) -> bool {
  const RESERVED: &[&str] = &["true", "false", "yes", "no", "on", "off", "null", "y", "n"];

  let mut chars = s.chars();
  let Some(first) = chars.next() else {
    return false;
  };
  (first.is_ascii_alphabetic() || first == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
    && !RESERVED.contains(&s.to_ascii_lowercase().as_str())
}

/// Double-quoted YAML scalar.
fn quote(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('"');
  for c in s.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\0' => out.push_str("\\0"),
      c if c.is_control() || c == '\u{feff}' => {
        out.push_str(&format!("\\u{:04x}", c as u32));
      }
      c => out.push(c),
    }
  }
  out.push('"');
  out
}
