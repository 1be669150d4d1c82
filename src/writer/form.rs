//! Emit the `Screen1.scm` form file: the component tree as JSON wrapped
//! in the `#|` / `$JSON` / `|#` envelope the IDE expects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ids::IdSource;
use crate::catalog::Catalog;
use crate::error::GenerateResult;
use crate::model::ParsedCode;

pub const YA_VERSION: &str = "82";

/// Schema version for kinds missing from the table.
const FALLBACK_VERSION: &str = "2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFile {
    #[serde(rename = "YaVersion")]
    pub ya_version: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Properties")]
    pub properties: ScreenProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenProperties {
    #[serde(rename = "$Name")]
    pub name: String,
    #[serde(rename = "$Type")]
    pub type_name: String,
    #[serde(rename = "$Version")]
    pub version: String,
    #[serde(rename = "Uuid")]
    pub uuid: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "$Components")]
    pub components: Vec<FormComponent>,
    #[serde(
        rename = "$Extensions",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub extensions: Vec<FormExtension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormComponent {
    #[serde(rename = "$Name")]
    pub name: String,
    #[serde(rename = "$Type")]
    pub type_name: String,
    #[serde(rename = "$Version")]
    pub version: String,
    #[serde(rename = "Uuid")]
    pub uuid: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormExtension {
    #[serde(rename = "$Name")]
    pub name: String,
    #[serde(rename = "$Version")]
    pub version: String,
    #[serde(rename = "$UUID")]
    pub uuid: String,
}

pub fn build_form(ir: &ParsedCode, catalog: &Catalog<'_>, ids: &mut dyn IdSource) -> FormFile {
    let config = catalog.config();
    let mut components = Vec::new();
    let mut used_extensions: Vec<&str> = Vec::new();

    for name in &ir.components {
        if catalog.is_screen(name) {
            continue;
        }
        let kind = catalog.classify(name);

        let mut properties = BTreeMap::new();
        let version = if kind.is_extension() {
            if !used_extensions.contains(&kind.type_name) {
                used_extensions.push(kind.type_name);
            }
            catalog
                .extension(kind.type_name)
                .map(|ext| ext.version.clone())
                .unwrap_or_else(|| FALLBACK_VERSION.to_string())
        } else if let Some(kind_spec) = config.kind(kind.type_name) {
            if kind_spec.text_from_name {
                properties.insert("Text".to_string(), name.clone());
            }
            properties.extend(kind_spec.defaults.clone());
            kind_spec.version.clone()
        } else {
            FALLBACK_VERSION.to_string()
        };

        debug!(component = %name, kind = kind.type_name, "form component");
        components.push(FormComponent {
            name: name.clone(),
            type_name: kind.type_name.to_string(),
            version,
            uuid: ids.next_id(),
            properties,
        });
    }

    let extensions = used_extensions
        .into_iter()
        .filter_map(|name| catalog.extension(name))
        .map(|ext| FormExtension {
            name: ext.name.clone(),
            version: ext.version.clone(),
            uuid: ext.uuid.clone(),
        })
        .collect();

    let screen = &config.project.screen;
    FormFile {
        ya_version: YA_VERSION.to_string(),
        source: "Form".to_string(),
        properties: ScreenProperties {
            name: screen.clone(),
            type_name: "Form".to_string(),
            version: config
                .kind("Form")
                .map(|kind| kind.version.clone())
                .unwrap_or_else(|| "11".to_string()),
            uuid: "0".to_string(),
            title: screen.clone(),
            components,
            extensions,
        },
    }
}

/// Serialises the form inside its envelope.
pub fn render_form(form: &FormFile) -> GenerateResult<String> {
    let json = serde_json::to_string(form)?;
    Ok(format!("#|\n$JSON\n{json}\n|#"))
}

/// Inverse of `render_form`; used to inspect generated archives.
pub fn parse_form(text: &str) -> GenerateResult<FormFile> {
    let json = text
        .trim()
        .strip_prefix("#|")
        .and_then(|rest| rest.trim_start().strip_prefix("$JSON"))
        .and_then(|rest| rest.trim_end().strip_suffix("|#"))
        .ok_or_else(|| {
            crate::error::GenerateError::InvalidInput("form file envelope missing".into())
        })?;
    Ok(serde_json::from_str(json.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConverterConfig;
    use crate::model::ExtensionDescriptor;
    use crate::writer::ids::SequentialIds;

    fn ir(components: &[&str]) -> ParsedCode {
        ParsedCode {
            components: components.iter().map(|c| c.to_string()).collect(),
            ..ParsedCode::default()
        }
    }

    #[test]
    fn test_screen_is_excluded_and_defaults_applied() {
        let config = ConverterConfig::default();
        let catalog = Catalog::new(&config, &[]);
        let form = build_form(
            &ir(&["Button1", "Label2", "Screen1"]),
            &catalog,
            &mut SequentialIds::default(),
        );

        let comps = &form.properties.components;
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].name, "Button1");
        assert_eq!(comps[0].version, "5");
        assert_eq!(comps[0].uuid, "1");
        assert_eq!(comps[0].properties.get("Text").map(String::as_str), Some("Button1"));
        assert_eq!(comps[1].type_name, "Label");
        assert_eq!(comps[1].properties.get("FontSize").map(String::as_str), Some("14"));
        assert!(form.properties.extensions.is_empty());
    }

    #[test]
    fn test_unknown_prefix_uses_default_kind() {
        let config = ConverterConfig::default();
        let catalog = Catalog::new(&config, &[]);
        let form = build_form(&ir(&["Frobnicator1"]), &catalog, &mut SequentialIds::default());
        assert_eq!(form.properties.components[0].type_name, "Button");
    }

    #[test]
    fn test_used_extensions_are_listed_once() {
        let config = ConverterConfig::default();
        let user = [ExtensionDescriptor::new("Sensors", "4", "com.example.sensors")];
        let catalog = Catalog::new(&config, &user);
        let form = build_form(
            &ir(&["GestureDetector1", "GestureDetector2", "Label1"]),
            &catalog,
            &mut SequentialIds::default(),
        );
        assert_eq!(
            form.properties.extensions,
            vec![FormExtension {
                name: "GestureDetector".into(),
                version: "1".into(),
                uuid: "com.extension.aryan.gupta.gesturesdetector".into(),
            }]
        );
    }

    #[test]
    fn test_envelope_round_trip() {
        let config = ConverterConfig::default();
        let catalog = Catalog::new(&config, &[]);
        let form = build_form(&ir(&["Label1"]), &catalog, &mut SequentialIds::default());
        let text = render_form(&form).unwrap();
        assert!(text.starts_with("#|\n$JSON\n{\"YaVersion\":\"82\""));
        assert!(text.ends_with("}\n|#"));
        assert!(!text.contains("$Extensions"));
        assert_eq!(parse_form(&text).unwrap(), form);
    }
}
