use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid package: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("unsupported package format version {found}, expected {expected}")]
  UnsupportedFormat { found: u32, expected: u32 },
}
