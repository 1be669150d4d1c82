//! Maps component names onto component kinds.
//!
//! A `Catalog` is built per generation from the configuration tables and
//! the caller's extension list. It is never shared between calls.

use std::collections::BTreeMap;

use crate::config::{ConverterConfig, ExtensionInfo};
use crate::model::ExtensionDescriptor;

/// Which table a name resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSource {
    Extension,
    Builtin,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<'a> {
    pub type_name: &'a str,
    pub source: KindSource,
}

impl Classified<'_> {
    pub fn is_extension(&self) -> bool {
        self.source == KindSource::Extension
    }
}

pub struct Catalog<'a> {
    config: &'a ConverterConfig,
    extensions: BTreeMap<String, ExtensionInfo>,
}

impl<'a> Catalog<'a> {
    /// Built-in extensions first, then the caller's; same name replaces.
    pub fn new(config: &'a ConverterConfig, user: &[ExtensionDescriptor]) -> Self {
        let mut extensions: BTreeMap<String, ExtensionInfo> = config
            .extensions
            .iter()
            .map(|ext| (ext.name.clone(), ext.clone()))
            .collect();
        for ext in user {
            extensions.insert(
                ext.name.clone(),
                ExtensionInfo {
                    name: ext.name.clone(),
                    version: ext.version.clone(),
                    uuid: ext.uuid.clone(),
                },
            );
        }
        Self { config, extensions }
    }

    pub fn config(&self) -> &'a ConverterConfig {
        self.config
    }

    pub fn extension(&self, name: &str) -> Option<&ExtensionInfo> {
        self.extensions.get(name)
    }

    /// Longest matching extension name, else longest matching built-in
    /// prefix, else the default kind.
    pub fn classify(&self, component: &str) -> Classified<'_> {
        let extension = self
            .extensions
            .keys()
            .filter(|name| component.starts_with(name.as_str()))
            .max_by_key(|name| name.len());
        if let Some(name) = extension {
            return Classified {
                type_name: name,
                source: KindSource::Extension,
            };
        }

        let builtin = self
            .config
            .component_kinds
            .iter()
            .filter(|kind| component.starts_with(kind.prefix.as_str()))
            .max_by_key(|kind| kind.prefix.len());
        match builtin {
            Some(kind) => Classified {
                type_name: &kind.type_name,
                source: KindSource::Builtin,
            },
            None => Classified {
                type_name: &self.config.default_kind,
                source: KindSource::Default,
            },
        }
    }

    /// Screen names describe the root container, not a placed component.
    pub fn is_screen(&self, component: &str) -> bool {
        component.starts_with("Screen")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_prefixes_and_default() {
        let config = ConverterConfig::default();
        let catalog = Catalog::new(&config, &[]);
        assert_eq!(catalog.classify("Label2").type_name, "Label");
        assert_eq!(catalog.classify("Screen1").type_name, "Form");
        let unknown = catalog.classify("Frobnicator1");
        assert_eq!(unknown.type_name, "Button");
        assert_eq!(unknown.source, KindSource::Default);
    }

    #[test]
    fn clock_is_a_core_component() {
        let config = ConverterConfig::default();
        let catalog = Catalog::new(&config, &[]);
        let clock = catalog.classify("Clock1");
        assert_eq!(clock.type_name, "Clock");
        assert_eq!(clock.source, KindSource::Builtin);
        assert!(catalog.extension("Clock").is_none());
    }

    #[test]
    fn extensions_win_over_builtins() {
        let config = ConverterConfig::default();
        let user = [ExtensionDescriptor::new("ButtonPlus", "3", "com.example.buttonplus")];
        let catalog = Catalog::new(&config, &user);
        let kind = catalog.classify("ButtonPlus1");
        assert_eq!(kind.type_name, "ButtonPlus");
        assert!(kind.is_extension());
        assert_eq!(catalog.classify("Button1").type_name, "Button");
        assert_eq!(catalog.classify("GestureDetector1").type_name, "GestureDetector");
    }

    #[test]
    fn longest_extension_prefix_wins() {
        let config = ConverterConfig::default();
        let user = [
            ExtensionDescriptor::new("Gesture", "1", "com.example.gesture"),
            ExtensionDescriptor::new("GestureDetectorPro", "1", "com.example.pro"),
        ];
        let catalog = Catalog::new(&config, &user);
        assert_eq!(catalog.classify("GestureDetector1").type_name, "GestureDetector");
        assert_eq!(
            catalog.classify("GestureDetectorPro1").type_name,
            "GestureDetectorPro"
        );
        assert_eq!(catalog.classify("GestureX").type_name, "Gesture");
    }

    #[test]
    fn user_extension_replaces_builtin_of_same_name() {
        let config = ConverterConfig::default();
        let user = [ExtensionDescriptor::new("GestureDetector", "7", "com.mine.gestures")];
        let catalog = Catalog::new(&config, &user);
        let ext = catalog.extension("GestureDetector").expect("merged");
        assert_eq!(ext.version, "7");
        assert_eq!(ext.uuid, "com.mine.gestures");
    }
}
