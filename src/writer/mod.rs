//! Turns a `ParsedCode` into `.aia` archive bytes.

pub mod archive;
pub mod blocks;
pub mod form;
pub mod ids;
pub mod properties;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::ConverterConfig;
use crate::error::{GenerateError, GenerateResult};
use crate::model::{ExtensionDescriptor, ParsedCode};

use archive::{ArchiveSink, ZipSink};
use ids::{IdSource, RandomIds};

pub struct Generator {
    config: ConverterConfig,
    ids: Box<dyn IdSource>,
}

impl Generator {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config,
            ids: Box::new(RandomIds),
        }
    }

    /// Replaces the source of form component identifiers.
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn generate(
        &mut self,
        ir: &ParsedCode,
        extensions: &[ExtensionDescriptor],
    ) -> GenerateResult<Vec<u8>> {
        let mut sink = ZipSink::new();
        self.write_project(ir, extensions, &mut sink)?;
        let bytes = sink.finish()?;
        info!(
            bytes = bytes.len(),
            components = ir.components.len(),
            events = ir.events.len(),
            "archive generated"
        );
        Ok(bytes)
    }

    /// Writes every project entry into `sink`.
    ///
    /// Input is validated and payloads are read before the first entry is
    /// written.
    pub fn write_project(
        &mut self,
        ir: &ParsedCode,
        extensions: &[ExtensionDescriptor],
        sink: &mut dyn ArchiveSink,
    ) -> GenerateResult<()> {
        validate(ir)?;
        let payloads = read_payloads(extensions)?;

        let catalog = Catalog::new(&self.config, extensions);
        let project = &self.config.project;
        let source_dir = project.source_dir();

        let form = form::build_form(ir, &catalog, self.ids.as_mut());
        let scm = form::render_form(&form)?;
        let bky = blocks::render_blocks(&blocks::build_blocks(ir, &catalog))?;

        sink.add_text(properties::PROPERTIES_PATH, &properties::project_properties(project))?;
        sink.add_text(&format!("{source_dir}/{}.scm", project.screen), &scm)?;
        sink.add_text(&format!("{source_dir}/{}.bky", project.screen), &bky)?;
        sink.add_text(properties::ASSETS_README_PATH, properties::ASSETS_README)?;
        sink.add_text(properties::BUILD_README_PATH, properties::BUILD_README)?;

        for (file_name, bytes) in &payloads {
            debug!(file = %file_name, bytes = bytes.len(), "adding extension payload");
            sink.add_binary(&format!("assets/{file_name}"), bytes)?;
        }
        Ok(())
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

/// Generates with the built-in tables and random identifiers.
pub fn generate(ir: &ParsedCode, extensions: &[ExtensionDescriptor]) -> GenerateResult<Vec<u8>> {
    Generator::default().generate(ir, extensions)
}

fn validate(ir: &ParsedCode) -> GenerateResult<()> {
    for (i, event) in ir.events.iter().enumerate() {
        if event.component.is_empty() || event.event.is_empty() {
            return Err(GenerateError::InvalidInput(format!(
                "event {i} has no component or event name"
            )));
        }
        if !ir.components.contains(&event.component) {
            return Err(GenerateError::InvalidInput(format!(
                "event {i} refers to `{}` which is not listed in components",
                event.component
            )));
        }
    }
    Ok(())
}

fn read_payloads(extensions: &[ExtensionDescriptor]) -> GenerateResult<Vec<(String, Vec<u8>)>> {
    extensions
        .iter()
        .filter_map(|ext| ext.payload.as_ref())
        .map(|payload| {
            let bytes = payload
                .read()
                .map_err(|source| GenerateError::ExtensionPayload {
                    file: payload.file_name.clone(),
                    source,
                })?;
            Ok((payload.file_name.clone(), bytes))
        })
        .collect()
}
