// src/error.rs
//! Ошибки генерации мира
//!
//! Три вида ошибок, все фатальны для прогона, кроме ошибок файла сида
//! (там генератор молча откатывается к сиду по умолчанию, см. [`crate::rng`]):
//! - [`GenError::Config`] — не задан или некорректен обязательный путь/параметр
//! - [`GenError::Io`] — файл не читается или не пишется
//! - [`GenError::Data`] — содержимое файла некорректно

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Ошибка конфигурации: генерация не начинается
    #[error("configuration error: {detail}")]
    Config { detail: String },

    /// Ошибка ввода-вывода на конкретном файле
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Некорректные данные во входном файле
    #[error("data error in {}: {detail}", path.display())]
    Data { path: PathBuf, detail: String },
}

impl GenError {
    pub fn config(detail: impl Into<String>) -> Self {
        GenError::Config {
            detail: detail.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn data(path: &Path, detail: impl Into<String>) -> Self {
        GenError::Data {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

/// Читает файл целиком, оборачивая ошибку в [`GenError::Io`] с путём
pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))
}

/// Пишет файл целиком, оборачивая ошибку в [`GenError::Io`] с путём
pub(crate) fn write_string(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| GenError::io(path, e))
}
