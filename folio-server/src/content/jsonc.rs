//! JSON-with-comments support for the static fallback document.
//!
//! Line comments, block comments and trailing commas are removed outside of
//! string literals; everything else is passed through byte for byte so that
//! parse errors still point at the right line.

/// Strip comments and trailing commas, producing plain JSON text.
pub fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    // Position in `out` of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            '"' => {
                pending_comma = None;
                in_string = true;
                out.push(c);
            }
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            '}' | ']' => {
                if let Some(pos) = pending_comma.take() {
                    out.replace_range(pos..pos + 1, " ");
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending_comma = None;
                out.push(c);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> serde_json::Value {
        serde_json::from_str(&strip_jsonc(input)).expect("stripped JSONC should parse")
    }

    #[test]
    fn test_strips_line_and_block_comments() {
        let value = parse(
            r#"{
                // personal details
                "name": "Vaibhav", /* inline */
                "tags": [1, 2 /* two */]
            }"#,
        );
        assert_eq!(value["name"], "Vaibhav");
        assert_eq!(value["tags"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_keeps_comment_markers_inside_strings() {
        let value = parse(r#"{"url": "https://vaibhav.bio/*x*/", "quote": "say \"//hi\""}"#);
        assert_eq!(value["url"], "https://vaibhav.bio/*x*/");
        assert_eq!(value["quote"], "say \"//hi\"");
    }

    #[test]
    fn test_removes_trailing_commas() {
        let value = parse("{\"a\": [1, 2,], \"b\": {\"c\": true,},}");
        assert_eq!(value["a"], serde_json::json!([1, 2]));
        assert_eq!(value["b"]["c"], true);
    }

    #[test]
    fn test_comma_before_comment_then_bracket_is_trailing() {
        let value = parse("[\n  \"x\", // last\n]");
        assert_eq!(value, serde_json::json!(["x"]));
    }

    #[test]
    fn test_preserves_line_numbers() {
        let stripped = strip_jsonc("{\n/* one\ntwo */\n\"a\": 1\n}");
        assert_eq!(stripped.lines().count(), 5);
    }

    #[test]
    fn test_plain_json_is_unchanged() {
        let input = r#"{"a":[1,2],"b":"c"}"#;
        assert_eq!(strip_jsonc(input), input);
    }
}
