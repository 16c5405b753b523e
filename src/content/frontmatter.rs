use serde_json::{Map, Value};

/// Frontmatter keys that always hold a list of labels.
pub const LIST_FIELDS: [&str; 3] = ["categories", "meta_keywords", "tags"];

const DELIMITER: &str = "---";

/// A content file split into its metadata block and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub metadata: Map<String, Value>,
    pub body: String,
}

impl Frontmatter {
    /// Metadata-free content: list fields are present but empty.
    pub fn empty(raw: &str) -> Frontmatter {
        let mut metadata = Map::new();
        normalize_list_fields(&mut metadata);
        Frontmatter {
            metadata,
            body: raw.to_string(),
        }
    }

    /// Parses `raw`, falling back to empty metadata and the raw text as body
    /// when the YAML block is malformed.
    pub fn parse(raw: &str) -> Frontmatter {
        Self::try_parse(raw).unwrap_or_else(|_| Self::empty(raw))
    }

    /// Like [`Frontmatter::parse`], but reports malformed YAML so the caller can log it.
    pub fn try_parse(raw: &str) -> Result<Frontmatter, String> {
        let Some((yaml, body)) = split(raw) else {
            return Ok(Self::empty(raw));
        };

        let mut metadata = if yaml.trim().is_empty() {
            Map::new()
        } else {
            match serde_yaml::from_str::<Value>(yaml) {
                Ok(Value::Object(map)) => map,
                Ok(Value::Null) => Map::new(),
                Ok(_) => return Err("frontmatter is not a mapping".to_string()),
                Err(e) => return Err(format!("invalid frontmatter: {}", e)),
            }
        };
        normalize_list_fields(&mut metadata);

        Ok(Frontmatter {
            metadata,
            body: body.to_string(),
        })
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Splits `(yaml, body)` when the text opens with a `---` line and a second
/// `---` line closes the block. The body is the verbatim remainder.
fn split(raw: &str) -> Option<(&str, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let (first, mut rest) = text.split_once('\n')?;
    if !is_delimiter(first) {
        return None;
    }

    let yaml_start = rest;
    let mut yaml_len = 0;
    loop {
        let (line, remainder) = match rest.split_once('\n') {
            Some((line, remainder)) => (line, Some(remainder)),
            None => (rest, None),
        };
        if is_delimiter(line) {
            let body = remainder.unwrap_or("");
            return Some((&yaml_start[..yaml_len], body));
        }
        rest = remainder?;
        yaml_len += line.len() + 1;
    }
}

pub fn normalize_list_fields(metadata: &mut Map<String, Value>) {
    for key in LIST_FIELDS {
        let list = normalize_list(metadata.get(key));
        metadata.insert(key.to_string(), Value::from(list));
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalizes a list-valued field to trimmed, non-empty labels.
///
/// Lists pass through element-wise, strings are split on commas, any other
/// scalar becomes a one-element list. Absent, null and mapping values give an
/// empty list.
pub fn normalize_list(value: Option<&Value>) -> Vec<String> {
    let labels = match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => vec![],
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) => s.split(',').map(|item| item.trim().to_string()).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
    };
    labels.into_iter().filter(|label| !label.is_empty()).collect()
}
