//! Field accessors for heterogeneous provider JSON.
//!
//! Each adapter lists, per target field, the provider keys to try in
//! priority order. A key starting with `/` is a JSON pointer into nested
//! objects (`/volumeInfo/title`); anything else is a top-level key.

use serde_json::Value;

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    if key.starts_with('/') {
        value.pointer(key)
    } else {
        value.get(key)
    }
}

/// A string field, skipping blank values.
pub fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    lookup(value, key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// First non-blank string among `keys`.
pub fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| text(value, key))
        .map(str::to_string)
}

/// Provider IDs arrive as strings or numbers; both become strings.
pub fn id(value: &Value, key: &str) -> Option<String> {
    match lookup(value, key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn first_id(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| id(value, key))
}

/// Loose year parsing: integers as is, strings by their first four characters.
///
/// Handles `2010`, `"2010"`, `"2010-07-16"` and OMDb ranges like `"2008–2013"`.
pub fn year_from(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => {
            let head: String = s.trim().chars().take(4).collect();
            head.parse().ok()
        }
        _ => None,
    }
}

/// First parseable year among `keys`.
pub fn first_year(value: &Value, keys: &[&str]) -> Option<i32> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(year_from)
}

/// Array of strings joined with ` / `, or `None` if there are none.
pub fn joined(value: &Value, key: &str, inner: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = lookup(value, key)?
        .as_array()?
        .iter()
        .filter_map(|entry| match inner {
            Some(k) => entry.get(k).and_then(Value::as_str),
            None => entry.as_str(),
        })
        .filter(|s| !s.trim().is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" / "))
    }
}

/// Upgrade plain-HTTP image links to HTTPS.
pub fn https_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_text_respects_priority_and_skips_blanks() {
        let v = json!({ "title": "  ", "display_title": "三体", "name": "Three Body" });
        assert_eq!(
            first_text(&v, &["title", "display_title", "name"]).as_deref(),
            Some("三体")
        );
        assert_eq!(first_text(&v, &["missing"]), None);
    }

    #[test]
    fn pointer_keys_reach_nested_fields() {
        let v = json!({ "volumeInfo": { "imageLinks": { "thumbnail": "http://x/y.jpg" } } });
        assert_eq!(
            text(&v, "/volumeInfo/imageLinks/thumbnail"),
            Some("http://x/y.jpg")
        );
    }

    #[test]
    fn years_parse_from_varied_shapes() {
        assert_eq!(year_from(&json!(1999)), Some(1999));
        assert_eq!(year_from(&json!("2010-07-16")), Some(2010));
        assert_eq!(year_from(&json!("2008–2013")), Some(2008));
        assert_eq!(year_from(&json!("n/a")), None);
        assert_eq!(year_from(&json!(null)), None);

        let v = json!({ "year": null, "pub_year": 1965 });
        assert_eq!(first_year(&v, &["year", "pub_year"]), Some(1965));
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let v = json!({ "id": 42, "uuid": "", "key": "/works/OL1W" });
        assert_eq!(id(&v, "id").as_deref(), Some("42"));
        assert_eq!(first_id(&v, &["uuid", "key"]).as_deref(), Some("/works/OL1W"));
    }

    #[test]
    fn joined_collects_nested_names() {
        let v = json!({ "genres": [{ "name": "RPG" }, { "name": "Action" }], "empty": [] });
        assert_eq!(joined(&v, "genres", Some("name")).as_deref(), Some("RPG / Action"));
        assert_eq!(joined(&v, "empty", None), None);
    }

    #[test]
    fn https_upgrade_only_touches_plain_http() {
        assert_eq!(https_url("http://books.google.com/a"), "https://books.google.com/a");
        assert_eq!(https_url("https://x/a"), "https://x/a");
    }
}
