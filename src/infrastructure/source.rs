//! Reading and writing record files in their on-disk encoding.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::infrastructure::error::{InfraError, InfraResult, IoResultExt};

/// Character encoding of record files. SPED files are latin-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Latin1,
    Utf8,
}

impl FromStr for Encoding {
    type Err = InfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "latin1" | "iso88591" => Ok(Encoding::Latin1),
            "utf8" => Ok(Encoding::Utf8),
            other => Err(InfraError::Config {
                message: format!("unsupported encoding: {}", other),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Latin1 => write!(f, "latin1"),
            Encoding::Utf8 => write!(f, "utf8"),
        }
    }
}

/// Decode raw file bytes. Latin-1 maps every byte to the code point of the same value.
pub fn decode(bytes: Vec<u8>, encoding: Encoding, path: &Path) -> InfraResult<String> {
    match encoding {
        Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|e| InfraError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Encode text for writing. Latin-1 rejects characters above U+00FF.
pub fn encode(text: &str, encoding: Encoding) -> InfraResult<Vec<u8>> {
    match encoding {
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Latin1 => {
            let mut line = 1;
            let mut out = Vec::with_capacity(text.len());
            for ch in text.chars() {
                let byte = u8::try_from(ch).map_err(|_| InfraError::Encoding { line, ch })?;
                if ch == '\n' {
                    line += 1;
                }
                out.push(byte);
            }
            Ok(out)
        }
    }
}

#[instrument(level = "debug")]
pub fn read_text(path: &Path, encoding: Encoding) -> InfraResult<String> {
    let bytes = fs::read(path).with_path_context("read records", path)?;
    debug!(bytes = bytes.len(), "read file");
    decode(bytes, encoding, path)
}

#[instrument(level = "debug", skip(text))]
pub fn write_text(path: &Path, text: &str, encoding: Encoding) -> InfraResult<()> {
    let bytes = encode(text, encoding)?;
    fs::write(path, bytes).with_path_context("write records", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_latin1_round_trip() {
        let bytes = b"|0150|S\xc3O PAULO|\n".to_vec();
        let text = decode(bytes.clone(), Encoding::Latin1, Path::new("x")).unwrap();

        assert_eq!(text, "|0150|SÃO PAULO|\n");
        assert_eq!(encode(&text, Encoding::Latin1).unwrap(), bytes);
    }

    #[test]
    fn test_latin1_rejects_wide_characters() {
        let err = encode("|0000|\n|0150|€|\n", Encoding::Latin1).unwrap_err();
        assert!(matches!(err, InfraError::Encoding { line: 2, ch: '€' }));
    }

    #[test]
    fn test_utf8_decode_error_names_file() {
        let err = decode(vec![0xff, 0xfe], Encoding::Utf8, Path::new("bad.txt")).unwrap_err();
        assert!(err.to_string().contains("bad.txt"));
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("ISO-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert!("cp1252".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_write_then_read_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.txt");

        write_text(&path, "|0000|Ç|\n", Encoding::Latin1).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"|0000|\xc7|\n");
        assert_eq!(read_text(&path, Encoding::Latin1).unwrap(), "|0000|Ç|\n");
    }

    #[test]
    fn test_read_missing_file_has_context() {
        let err = read_text(Path::new("/nonexistent/sped.txt"), Encoding::Latin1).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sped.txt"));
    }
}
