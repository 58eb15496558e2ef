mod json;
mod table;
mod yaml;

pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use crate::cli::OutputFormat;
use crate::object::GenericObject;

/// Render a normalized API object (or list) for the terminal.
pub fn format(object: &GenericObject, format: &OutputFormat, no_headers: bool) -> String {
    match format {
        OutputFormat::Table => TableFormatter::format(object, no_headers),
        OutputFormat::Json => JsonFormatter::format(object),
        OutputFormat::Yaml => YamlFormatter::format(object),
    }
}
