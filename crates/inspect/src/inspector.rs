use crate::code::CodeTreeBuilder;
use crate::data::{self, DataFormat, DataTarget};
use crate::error::{InspectError, Result};
use crate::resolver::Resolver;
use peek_protocol::InspectionResult;
use peek_source_meta::{is_dotted_name, MetadataProvider};
use std::sync::Arc;

/// Builds element trees for one kind of target
pub trait Inspector: Send + Sync {
    /// Registry key (`python`, `json`, ...)
    fn kind(&self) -> &'static str;

    /// Cheap check whether the descriptor is meant for this inspector
    fn supports(&self, target: &str) -> bool;

    fn inspect(&self, target: &str) -> Result<InspectionResult>;
}

/// Code entities located through a [`MetadataProvider`]
pub struct PythonInspector {
    provider: Arc<dyn MetadataProvider>,
}

impl PythonInspector {
    pub const KIND: &'static str = "python";

    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }
}

impl Inspector for PythonInspector {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    /// A dotted name some prefix of which loads as a module
    fn supports(&self, target: &str) -> bool {
        if !is_dotted_name(target) {
            return false;
        }
        let parts: Vec<&str> = target.split('.').collect();
        (1..=parts.len())
            .rev()
            .any(|len| self.provider.load_module(&parts[..len].join(".")).is_ok())
    }

    fn inspect(&self, target: &str) -> Result<InspectionResult> {
        let provider = self.provider.as_ref();
        let resolved = Resolver::new(provider).resolve_code(target)?;
        CodeTreeBuilder::new(provider).build(&resolved)
    }
}

/// Structured documents of one [`DataFormat`]
pub struct DataInspector {
    format: DataFormat,
}

impl DataInspector {
    pub fn new(format: DataFormat) -> Self {
        Self { format }
    }

    fn target(&self, target: &str) -> Option<DataTarget> {
        DataTarget::detect(target).filter(|detected| detected.format == self.format)
    }
}

impl Inspector for DataInspector {
    fn kind(&self) -> &'static str {
        self.format.as_str()
    }

    fn supports(&self, target: &str) -> bool {
        self.target(target).is_some()
    }

    fn inspect(&self, target: &str) -> Result<InspectionResult> {
        let detected = self
            .target(target)
            .ok_or_else(|| InspectError::unsupported(target, self.kind()))?;
        data::build(&detected)
    }
}
