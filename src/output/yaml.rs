use crate::object::GenericObject;

pub struct YamlFormatter;

impl YamlFormatter {
    pub fn format(object: &GenericObject) -> String {
        serde_yaml::to_string(&object.0).unwrap_or_else(|_| "{}".to_string())
    }
}
