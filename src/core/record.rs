//! Tagged parameter values and the ordered properties record they render into.
//!
//! The wire format defines no escaping: `{`, `}` and `;` are structural
//! everywhere, `,` inside pair and list encodings. Values carrying those
//! characters are rejected at render time rather than written ambiguously.
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::TreatmentKind;

/// A parameter value in one of the shapes the properties format knows how to
/// encode. The renderer is total over this set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Real(f64),
    Flag(bool),
    Path(PathBuf),
    /// Scalar or pair elements, rendered `{v1;v2;...}`.
    List(Vec<Value>),
    /// Rendered `(a,b)`.
    Pair(Box<Value>, Box<Value>),
    /// Inclusive numeric range, rendered `(lo-hi)`.
    Range(f64, f64),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn path(p: impl Into<PathBuf>) -> Self {
        Value::Path(p.into())
    }

    pub fn int_list<I: IntoIterator<Item = i64>>(items: I) -> Self {
        Value::List(items.into_iter().map(Value::Int).collect())
    }

    pub fn real_list<I: IntoIterator<Item = f64>>(items: I) -> Self {
        Value::List(items.into_iter().map(Value::Real).collect())
    }

    pub fn text_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(|s| Value::Text(s.into())).collect())
    }

    pub fn int_pairs<I: IntoIterator<Item = (i64, i64)>>(items: I) -> Self {
        Value::List(
            items
                .into_iter()
                .map(|(a, b)| Value::Pair(Box::new(Value::Int(a)), Box::new(Value::Int(b))))
                .collect(),
        )
    }

    /// Render this value standalone (scalar position in a `key=value` line).
    fn render(&self) -> std::result::Result<String, String> {
        match self {
            Value::Text(s) => {
                check_scalar(s)?;
                Ok(s.clone())
            }
            Value::Int(i) => Ok(i.to_string()),
            Value::Real(r) => Ok(r.to_string()),
            Value::Flag(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            Value::Path(p) => {
                let s = p.display().to_string();
                check_scalar(&s)?;
                Ok(s)
            }
            Value::List(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(item.render_element()?);
                }
                Ok(format!("{{{}}}", parts.join(";")))
            }
            Value::Pair(a, b) => Ok(format!("({},{})", a.render_element()?, b.render_element()?)),
            Value::Range(lo, hi) => Ok(format!("({}-{})", lo, hi)),
        }
    }

    /// Render this value as a list or pair element, where `,` is structural too.
    fn render_element(&self) -> std::result::Result<String, String> {
        match self {
            Value::Text(s) => {
                check_element(s)?;
                Ok(s.clone())
            }
            Value::Path(p) => {
                let s = p.display().to_string();
                check_element(&s)?;
                Ok(s)
            }
            Value::Pair(a, b) => Ok(format!("({},{})", a.render_element()?, b.render_element()?)),
            Value::Range(lo, hi) => Ok(format!("({}-{})", lo, hi)),
            other => other.render(),
        }
    }
}

fn check_scalar(s: &str) -> std::result::Result<(), String> {
    if s.contains(['{', '}', ';']) {
        return Err(s.to_string());
    }
    Ok(())
}

fn check_element(s: &str) -> std::result::Result<(), String> {
    if s.contains(['{', '}', ';', ',']) {
        return Err(s.to_string());
    }
    Ok(())
}

/// An ordered sequence of unique `key=value` lines describing one treatment.
/// Builders emit lines in a fixed, schema-defined order; identical inputs
/// always produce byte-identical text.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertiesRecord {
    kind: TreatmentKind,
    lines: Vec<(String, String)>,
}

impl PropertiesRecord {
    pub fn new(kind: TreatmentKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    pub fn kind(&self) -> TreatmentKind {
        self.kind
    }

    /// Append a line. Repeated keys are an error, never a layered override.
    pub fn push(&mut self, key: &str, value: Value) -> Result<()> {
        if self.lines.iter().any(|(k, _)| k == key) {
            return Err(Error::DuplicateKey {
                key: key.to_string(),
            });
        }
        let rendered = value.render().map_err(|value| Error::ReservedCharacter {
            key: key.to_string(),
            value,
        })?;
        self.lines.push((key.to_string(), rendered));
        Ok(())
    }

    /// Append a line only when the value is present.
    pub fn push_opt(&mut self, key: &str, value: Option<Value>) -> Result<()> {
        match value {
            Some(v) => self.push(key, v),
            None => Ok(()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|(k, _)| k.as_str())
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|(k, v)| format!("{}={}", k, v))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The full record body, one `key=value` per line, trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Read `key=value` lines back out of serialized text, skipping comments
    /// and blanks. The inverse of `to_text` modulo the comment header.
    pub fn parse(text: &str) -> Vec<(String, String)> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| {
                l.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_plainly() {
        let mut rec = PropertiesRecord::new(TreatmentKind::Map);
        rec.push("treatment", Value::text("map")).unwrap();
        rec.push("count", Value::Int(42)).unwrap();
        rec.push("cellsize", Value::Real(2.5)).unwrap();
        rec.push("interpolate_values", Value::Flag(false)).unwrap();
        assert_eq!(
            rec.to_text(),
            "treatment=map\ncount=42\ncellsize=2.5\ninterpolate_values=false\n"
        );
    }

    #[test]
    fn lists_and_pairs_use_braced_encoding() {
        let mut rec = PropertiesRecord::new(TreatmentKind::Sliding);
        rec.push("metrics", Value::text_list(["SHDI", "HET"])).unwrap();
        rec.push("sizes", Value::int_list([51, 101])).unwrap();
        rec.push("changes", Value::int_pairs([(1, 10), (2, 20)])).unwrap();
        assert_eq!(rec.get("metrics"), Some("{SHDI;HET}"));
        assert_eq!(rec.get("sizes"), Some("{51;101}"));
        assert_eq!(rec.get("changes"), Some("{(1,10);(2,20)}"));
    }

    #[test]
    fn ranges_render_inclusive() {
        let mut rec = PropertiesRecord::new(TreatmentKind::Classification);
        rec.push(
            "domains",
            Value::List(vec![
                Value::Pair(Box::new(Value::text("0-50")), Box::new(Value::Int(1))),
                Value::Range(50.0, 100.0),
            ]),
        )
        .unwrap();
        assert_eq!(rec.get("domains"), Some("{(0-50,1);(50-100)}"));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut rec = PropertiesRecord::new(TreatmentKind::Map);
        rec.push("treatment", Value::text("map")).unwrap();
        let err = rec.push("treatment", Value::text("sliding")).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { key } if key == "treatment"));
    }

    #[test]
    fn reserved_characters_are_rejected() {
        let mut rec = PropertiesRecord::new(TreatmentKind::Map);
        let err = rec
            .push("metrics", Value::text_list(["SH;DI"]))
            .unwrap_err();
        assert!(matches!(err, Error::ReservedCharacter { .. }));

        // A comma is fine in scalar position (expression strings), structural
        // inside a list element.
        rec.push("combination", Value::text("min(a,b)")).unwrap();
        let err = rec.push("names", Value::text_list(["a,b"])).unwrap_err();
        assert!(matches!(err, Error::ReservedCharacter { .. }));
    }

    #[test]
    fn parse_round_trips_keys_and_values() {
        let mut rec = PropertiesRecord::new(TreatmentKind::Sliding);
        rec.push("treatment", Value::text("sliding")).unwrap();
        rec.push("sizes", Value::int_list([3, 5])).unwrap();
        let text = format!("# generated sometime\n{}", rec.to_text());
        let parsed = PropertiesRecord::parse(&text);
        assert_eq!(
            parsed,
            vec![
                ("treatment".to_string(), "sliding".to_string()),
                ("sizes".to_string(), "{3;5}".to_string()),
            ]
        );
    }
}
