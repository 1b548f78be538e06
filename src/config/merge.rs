//! Settings layer merge
//!
//! Objects merge by key (recursively); arrays and scalars from the
//! higher layer replace the lower one. A null in a higher layer leaves
//! the lower value in place, so an unset override never erases a default.

use serde_json::Value;

/// Apply `layer` on top of `base` in place.
pub fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None if !value.is_null() => {
                        base_map.insert(key, value);
                    }
                    None => {}
                }
            }
        }
        (_, Value::Null) => {}
        (base, layer) => *base = layer,
    }
}

/// Merge layers in order (first is base, last has highest precedence)
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = Value::Object(serde_json::Map::new());
    for layer in layers {
        overlay(&mut merged, layer);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let mut base = json!({"output": "swagger.json", "beautify": false});
        overlay(&mut base, json!({"output": "api.yaml"}));
        assert_eq!(base, json!({"output": "api.yaml", "beautify": false}));
    }

    #[test]
    fn test_list_replaced_not_appended() {
        let mut base = json!({"suffix": [".swagger.json", ".swagger.yaml"]});
        overlay(&mut base, json!({"suffix": [".openapi.yml"]}));
        assert_eq!(base["suffix"], json!([".openapi.yml"]));
    }

    #[test]
    fn test_null_does_not_erase() {
        let mut base = json!({"output": "swagger.json", "strict": true});
        overlay(&mut base, json!({"output": null, "strict": null, "extra": null}));
        assert_eq!(base, json!({"output": "swagger.json", "strict": true}));
    }

    #[test]
    fn test_nested_tables_merge() {
        let mut base = json!({"log": {"level": "warn", "format": "text"}});
        overlay(&mut base, json!({"log": {"level": "debug"}}));
        assert_eq!(base["log"], json!({"level": "debug", "format": "text"}));
    }

    #[test]
    fn test_merge_layers_precedence() {
        let merged = merge_layers(vec![
            json!({"output": "swagger.json", "beautify": false, "exclude": []}),
            json!({"beautify": true}),
            json!({"exclude": ["internal"]}),
            json!({"output": "merged.yaml"}),
        ]);

        assert_eq!(merged["output"], "merged.yaml");
        assert_eq!(merged["beautify"], true);
        assert_eq!(merged["exclude"], json!(["internal"]));
    }

    #[test]
    fn test_merge_no_layers() {
        assert_eq!(merge_layers(Vec::new()), json!({}));
    }
}
