use serde_json::{Map, Value};

use super::ReasoningError;

/// Parses the text between the first `{` and the last `}` as a JSON object.
///
/// Explanatory prose or code fences around the object are ignored.
pub fn extract_json_object(reply: &str) -> Result<Map<String, Value>, ReasoningError> {
    if reply.trim().is_empty() {
        return Err(ReasoningError::EmptyResponse);
    }

    let start = reply.find('{').ok_or(ReasoningError::NoJsonObject)?;
    let end = reply.rfind('}').ok_or(ReasoningError::NoJsonObject)?;
    if end < start {
        return Err(ReasoningError::NoJsonObject);
    }

    match serde_json::from_str::<Value>(&reply[start..=end])? {
        Value::Object(map) => Ok(map),
        _ => Err(ReasoningError::NoJsonObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_surrounded_by_prose() {
        let reply = "Sure! Here is the analysis:\n```json\n{\"1\": true, \"2\": false}\n```\nDone.";
        let map = extract_json_object(reply).unwrap();

        assert_eq!(map.get("1"), Some(&Value::Bool(true)));
        assert_eq!(map.get("2"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_nested_objects_use_outermost_braces() {
        let map = extract_json_object("{\"a\": {\"b\": 1}}").unwrap();
        assert!(map.get("a").unwrap().is_object());
    }

    #[test]
    fn test_empty_reply() {
        assert!(matches!(
            extract_json_object("   "),
            Err(ReasoningError::EmptyResponse)
        ));
    }

    #[test]
    fn test_missing_braces() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(ReasoningError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("} backwards {"),
            Err(ReasoningError::NoJsonObject)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            extract_json_object("{\"1\": tru}"),
            Err(ReasoningError::InvalidJson(_))
        ));
    }
}
