use crate::config::InspectConfig;
use crate::data::{DataFormat, DataTarget};
use crate::error::{InspectError, Result};
use crate::inspector::{DataInspector, Inspector, PythonInspector};
use peek_render::{CodeTextRenderer, DataTextRenderer, RenderLimits, Renderer};
use peek_source_meta::{MetadataProvider, PythonProvider};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Alias accepted for the code text renderer
pub const PYTHON_TEXT_FORMAT: &str = "python-text";

/// Format used when a kind has no entry in the default table
const FALLBACK_FORMAT: &str = CodeTextRenderer::NAME;

/// Inspectors by kind, renderers by format, and the kind → default format table.
///
/// Built once at start-up and passed by reference; lookups never mutate it.
pub struct Registry {
    provider: Arc<dyn MetadataProvider>,
    inspectors: BTreeMap<&'static str, Box<dyn Inspector>>,
    renderers: BTreeMap<String, Arc<dyn Renderer>>,
    default_formats: BTreeMap<String, String>,
    page_size: usize,
}

impl Registry {
    /// Registry with the built-in inspectors (`python`, `json`, `toml`) and renderers
    /// (`text`, `python-text`, `json-text`)
    pub fn new(provider: Arc<dyn MetadataProvider>, limits: RenderLimits) -> Self {
        let mut registry = Self {
            provider: Arc::clone(&provider),
            inspectors: BTreeMap::new(),
            renderers: BTreeMap::new(),
            default_formats: BTreeMap::new(),
            page_size: crate::config::DEFAULT_PAGE_SIZE,
        };

        registry.register_inspector(Box::new(PythonInspector::new(provider)));
        for format in DataFormat::ALL {
            registry.register_inspector(Box::new(DataInspector::new(format)));
            registry.set_default_format(format.as_str(), DataTextRenderer::NAME);
        }
        registry.set_default_format(PythonInspector::KIND, CodeTextRenderer::NAME);

        let code: Arc<dyn Renderer> = Arc::new(CodeTextRenderer::new(limits));
        registry.register_renderer(CodeTextRenderer::NAME, Arc::clone(&code));
        registry.register_renderer(PYTHON_TEXT_FORMAT, code);
        registry.register_renderer(DataTextRenderer::NAME, Arc::new(DataTextRenderer::new(limits)));

        registry
    }

    /// Registry over a [`PythonProvider`] built from the configuration
    pub fn from_config(config: &InspectConfig) -> Result<Self> {
        config.validate().map_err(InspectError::invalid_config)?;
        let provider = PythonProvider::new(config.provider.clone())?;
        log::debug!(
            "Registry search paths: {:?}",
            config.provider.search_paths
        );
        Ok(Self::new(Arc::new(provider), config.limits).with_page_size(config.page_size))
    }

    /// Builder: default docstring page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn register_inspector(&mut self, inspector: Box<dyn Inspector>) {
        self.inspectors.insert(inspector.kind(), inspector);
    }

    pub fn register_renderer(&mut self, format: impl Into<String>, renderer: Arc<dyn Renderer>) {
        self.renderers.insert(format.into(), renderer);
    }

    pub fn set_default_format(&mut self, kind: impl Into<String>, format: impl Into<String>) {
        self.default_formats.insert(kind.into(), format.into());
    }

    pub fn inspector(&self, kind: &str) -> Result<&dyn Inspector> {
        self.inspectors
            .get(kind)
            .map(|inspector| inspector.as_ref())
            .ok_or_else(|| InspectError::UnknownKind(kind.to_string()))
    }

    pub fn renderer(&self, format: &str) -> Result<&dyn Renderer> {
        self.renderers
            .get(format)
            .map(|renderer| renderer.as_ref())
            .ok_or_else(|| InspectError::UnknownFormat(format.to_string()))
    }

    /// Default output format for a kind
    pub fn default_format(&self, kind: &str) -> &str {
        self.default_formats
            .get(kind)
            .map_or(FALLBACK_FORMAT, String::as_str)
    }

    /// `json` / `toml` for existing data files, otherwise `python`
    pub fn detect_kind(&self, target: &str) -> &'static str {
        DataTarget::detect(target).map_or(PythonInspector::KIND, |data| data.format.as_str())
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.inspectors.keys().copied().collect()
    }

    pub fn formats(&self) -> Vec<&str> {
        self.renderers.keys().map(String::as_str).collect()
    }

    pub fn provider(&self) -> &dyn MetadataProvider {
        self.provider.as_ref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}
