//! Cell value coercion to the strings records carry.

/// Cell type from the `t` attribute of `<c>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CellKind {
    Number,
    Shared,
    Bool,
    Error,
    Str,
    Inline,
    IsoDate,
}

impl CellKind {
    pub(super) fn from_attr(value: &[u8]) -> Self {
        match value {
            b"s" => CellKind::Shared,
            b"b" => CellKind::Bool,
            b"e" => CellKind::Error,
            b"str" => CellKind::Str,
            b"inlineStr" => CellKind::Inline,
            b"d" => CellKind::IsoDate,
            _ => CellKind::Number,
        }
    }
}

/// Resolves raw cell text to its record value.
pub(super) fn coerce(kind: CellKind, raw: &str, shared: &[String]) -> String {
    match kind {
        CellKind::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared.get(i))
            .cloned()
            .unwrap_or_default(),
        CellKind::Bool => match raw.trim() {
            "1" | "true" | "TRUE" => "true".to_string(),
            _ => "false".to_string(),
        },
        CellKind::Number => format_number(raw),
        CellKind::Error | CellKind::Str | CellKind::Inline | CellKind::IsoDate => raw.to_string(),
    }
}

/// Renders a numeric cell the way a spreadsheet shows it in "General" format:
/// whole numbers without a fractional part, everything else as the shortest
/// decimal that round-trips. Unparseable text is returned as-is.
fn format_number(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(v) = trimmed.parse::<f64>() else {
        return raw.to_string();
    };
    if !v.is_finite() {
        return trimmed.to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
