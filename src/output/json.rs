use crate::object::GenericObject;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format(object: &GenericObject) -> String {
        serde_json::to_string_pretty(&object.0).unwrap_or_else(|_| "{}".to_string())
    }
}
