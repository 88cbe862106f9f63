//! Minimal RFC 4180 CSV writer for exports.

/// Quote a field when it contains a comma, quote, or line break.
///
/// Values starting with `=`, `+`, `-` or `@` are prefixed with `'` so
/// spreadsheet applications do not evaluate visitor-supplied text as a formula.
pub fn escape_field(value: &str) -> String {
    let guarded;
    let value = if value.starts_with(['=', '+', '-', '@']) {
        guarded = format!("'{value}");
        guarded.as_str()
    } else {
        value
    };
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a header row plus data rows, CRLF line endings.
pub fn to_csv<R, F>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<str>,
{
    let mut out = String::new();
    push_row(&mut out, headers.iter().copied());
    for row in rows {
        push_row(&mut out, row.iter().map(AsRef::as_ref));
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(escape_field).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_unquoted() {
        assert_eq!(escape_field("Jane"), "Jane");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn special_characters_are_quoted() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn formulas_are_neutralized() {
        assert_eq!(escape_field("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(escape_field("+1,2"), "\"'+1,2\"");
    }

    #[test]
    fn renders_rows() {
        let rows = vec![vec!["1".to_string(), "Ann, B".to_string()]];
        assert_eq!(to_csv(&["id", "name"], rows), "id,name\r\n1,\"Ann, B\"\r\n");
    }
}
