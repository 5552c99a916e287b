//! Работа с исходным текстом выгрузки.

use crate::error::ReportError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Исходный текст выгрузки без разбора.
#[derive(Debug, Clone)]
pub struct RawReport {
    /// Полный текст выгрузки.
    pub text: String,
    /// Имя исходного файла.
    pub source: Option<String>,
}

impl RawReport {
    /// Читает выгрузку из произвольного `Read`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ReportError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self { text, source: None })
    }

    /// Читает файл и запоминает его имя как источник.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let raw = Self::from_reader(File::open(path)?)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(raw.with_source(name))
    }

    /// Создаёт выгрузку из готовой строки.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self {
            text: s.to_string(),
            source: None,
        }
    }

    /// Задаёт имя источника.
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
