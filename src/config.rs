//! Lookup tables and project naming handed to the generator.
//!
//! `ConverterConfig::default()` carries the built-in tables. A JSON file
//! with the same shape can override any part of it (missing sections keep
//! their defaults).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub project: ProjectConfig,
    /// Component kinds, matched by longest name prefix.
    pub component_kinds: Vec<ComponentKind>,
    /// Kind used when no prefix matches.
    pub default_kind: String,
    pub colors: Vec<NamedColor>,
    /// Extensions known without an upload.
    pub extensions: Vec<ExtensionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    /// Dotted package the screen sources live under.
    pub namespace: String,
    pub screen: String,
}

impl ProjectConfig {
    /// `src/appinventor/ai_anonymous/ConvertedApp`
    pub fn source_dir(&self) -> String {
        format!("src/{}/{}", self.namespace.replace('.', "/"), self.name)
    }

    /// `appinventor.ai_anonymous.ConvertedApp.Screen1`
    pub fn main_class(&self) -> String {
        format!("{}.{}.{}", self.namespace, self.name, self.screen)
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "ConvertedApp".into(),
            namespace: "appinventor.ai_anonymous".into(),
            screen: "Screen1".into(),
        }
    }
}

/// One entry of the prefix table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentKind {
    pub prefix: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub version: String,
    /// Default the `Text` property to the component's own name.
    #[serde(default)]
    pub text_from_name: bool,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

impl ComponentKind {
    fn new(prefix: &str, type_name: &str, version: &str) -> Self {
        Self {
            prefix: prefix.into(),
            type_name: type_name.into(),
            version: version.into(),
            text_from_name: false,
            defaults: BTreeMap::new(),
        }
    }

    fn with_text(mut self) -> Self {
        self.text_from_name = true;
        self
    }

    fn with_default(mut self, key: &str, value: &str) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColor {
    pub name: String,
    /// `&HAARRGGBB`
    pub argb: String,
    /// Palette block carrying the value.
    pub block: String,
}

impl NamedColor {
    fn new(name: &str, argb: &str, block: &str) -> Self {
        Self {
            name: name.into(),
            argb: argb.into(),
            block: block.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionInfo {
    pub name: String,
    pub version: String,
    pub uuid: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            component_kinds: vec![
                ComponentKind::new("Screen", "Form", "11"),
                ComponentKind::new("Button", "Button", "5").with_text(),
                ComponentKind::new("Label", "Label", "2")
                    .with_text()
                    .with_default("FontSize", "14"),
                ComponentKind::new("TextBox", "TextBox", "2"),
                ComponentKind::new("Image", "Image", "2"),
                ComponentKind::new("Player", "Player", "2"),
                ComponentKind::new("Clock", "Clock", "2"),
                ComponentKind::new("TinyDB", "TinyDB", "2"),
                ComponentKind::new("Notifier", "Notifier", "2"),
            ],
            default_kind: "Button".into(),
            colors: vec![
                NamedColor::new("Red", "&HFFFF0000", "color_red"),
                NamedColor::new("Green", "&HFF00FF00", "color_green"),
                NamedColor::new("Blue", "&HFF0000FF", "color_blue"),
                NamedColor::new("Yellow", "&HFFFFFF00", "color_yellow"),
                NamedColor::new("White", "&HFFFFFFFF", "color_white"),
                NamedColor::new("Black", "&HFF000000", "color_black"),
                NamedColor::new("Gray", "&HFF808080", "color_gray"),
                NamedColor::new("Orange", "&HFFFFA500", "color_orange"),
                NamedColor::new("Purple", "&HFF800080", "color_magenta"),
                NamedColor::new("Pink", "&HFFFFC0CB", "color_pink"),
            ],
            extensions: vec![ExtensionInfo {
                name: "GestureDetector".into(),
                version: "1".into(),
                uuid: "com.extension.aryan.gupta.gesturesdetector".into(),
            }],
        }
    }
}

impl ConverterConfig {
    pub fn kind(&self, type_name: &str) -> Option<&ComponentKind> {
        self.component_kinds
            .iter()
            .find(|kind| kind.type_name == type_name)
    }

    pub fn color(&self, name: &str) -> Option<&NamedColor> {
        self.colors.iter().find(|color| color.name == name)
    }
}
