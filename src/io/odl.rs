//! Parser for the ODL-style `KEY = VALUE` text used by `_MTL.txt` and `_ANG.txt`.
//!
//! ```text
//! GROUP = PROJECTION
//!   UTM_ZONE = 17
//!   UL_CORNER = (  262185.000, 3925515.000 )
//! END_GROUP = PROJECTION
//! END
//! ```
//!
//! Quoted values are unquoted, parenthesised lists may span several lines and
//! are kept verbatim (see [`MetadataFields::f64_list`]).
use super::fields::{MetadataError, MetadataFields};

const ROOT_GROUP: &str = "ROOT";

pub fn parse_odl(text: &str) -> Result<MetadataFields, MetadataError> {
    let mut fields = MetadataFields::new();
    let mut groups: Vec<String> = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line == "END" {
            break;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| MetadataError::Parse {
            line: idx + 1,
            message: format!("expected `KEY = VALUE`, got `{}`", line),
        })?;
        let key = key.trim();
        let mut value = value.trim().to_string();

        match key {
            "GROUP" => {
                groups.push(value);
                continue;
            }
            "END_GROUP" => {
                match groups.pop() {
                    Some(open) if open == value => {}
                    Some(open) => {
                        return Err(MetadataError::Parse {
                            line: idx + 1,
                            message: format!("END_GROUP `{}` closes group `{}`", value, open),
                        });
                    }
                    None => {
                        return Err(MetadataError::Parse {
                            line: idx + 1,
                            message: format!("END_GROUP `{}` without open group", value),
                        });
                    }
                }
                continue;
            }
            _ => {}
        }

        // multi-line list
        if value.starts_with('(') {
            while !value.ends_with(')') {
                let (_, next) = lines.next().ok_or_else(|| MetadataError::Parse {
                    line: idx + 1,
                    message: format!("unterminated list for `{}`", key),
                })?;
                value.push(' ');
                value.push_str(next.trim());
            }
        }

        let group = groups.last().map(String::as_str).unwrap_or(ROOT_GROUP);
        fields.insert(group, key, unquote(&value));
    }

    if let Some(open) = groups.last() {
        return Err(MetadataError::Parse {
            line: text.lines().count(),
            message: format!("group `{}` is never closed", open),
        });
    }

    Ok(fields)
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
