//! The argument record threaded through every lifecycle hook.

use serde_json::Value;

use crate::error::{FilemodError, Result};

/// String-keyed JSON scalars supplied by the invoking surface.
pub type ArgumentRecord = serde_json::Map<String, Value>;

/// Parses one "key=value" argument. Values parse as booleans or numbers
/// where possible, strings otherwise.
pub fn parse_argument(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(FilemodError::configuration(format!(
            "argument '{}' is not of the form key=value",
            raw
        )));
    };
    if key.is_empty() {
        return Err(FilemodError::configuration(format!(
            "argument '{}' has an empty key",
            raw
        )));
    }

    let value = match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => match other.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => match other.parse::<f64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::String(other.to_string()),
            },
        },
    };

    Ok((key.to_string(), value))
}

/// Folds "key=value" arguments into an [`ArgumentRecord`].
pub fn parse_argument_record<S: AsRef<str>>(raw: &[S]) -> Result<ArgumentRecord> {
    let mut record = ArgumentRecord::new();
    for arg in raw {
        let (key, value) = parse_argument(arg.as_ref())?;
        record.insert(key, value);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_argument_scalars() {
        assert_eq!(
            parse_argument("name=alpha").unwrap(),
            ("name".to_string(), Value::String("alpha".to_string()))
        );
        assert_eq!(
            parse_argument("count=3").unwrap(),
            ("count".to_string(), Value::from(3))
        );
        assert_eq!(
            parse_argument("dry=true").unwrap(),
            ("dry".to_string(), Value::Bool(true))
        );
    }

    #[test]
    fn test_parse_argument_rejects_malformed() {
        assert!(parse_argument("no-equals-sign").is_err());
        assert!(parse_argument("=value").is_err());
    }

    #[test]
    fn test_parse_record_last_wins() {
        let record = parse_argument_record(&["a=1", "b=two", "a=3"]).unwrap();
        assert_eq!(record.get("a"), Some(&Value::from(3)));
        assert_eq!(record.get("b"), Some(&Value::String("two".to_string())));
    }
}
