use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::{L10nError, Result};

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: String,
}

/// Decodes a localization file. JSON should be UTF-8, but a byte order mark
/// is accepted and stripped (RFC 8259 §8.1); anything else goes through
/// charset detection.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return Err(L10nError::Encoding {
                message: format!("invalid {} data after byte order mark", encoding.name()),
            });
        }
        return Ok(Decoded {
            text: text.into_owned(),
            encoding: bom_name(encoding),
        });
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(Decoded {
            text: text.to_string(),
            encoding: "utf-8".into(),
        });
    }

    let encoding = guess(bytes);
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(L10nError::Encoding {
            message: format!("could not decode input as {}", encoding.name()),
        });
    }
    tracing::debug!(encoding = encoding.name(), "decoded non-UTF-8 input");
    Ok(Decoded {
        text: text.into_owned(),
        encoding: encoding.name().to_lowercase(),
    })
}

/// Encodes serialized output back into the encoding the store was read with.
pub fn encode(text: &str, encoding: &str) -> Result<Vec<u8>> {
    match encoding {
        "" | "utf-8" => Ok(text.as_bytes().to_vec()),
        "utf-8-sig" => {
            let mut out = vec![0xEF, 0xBB, 0xBF];
            out.extend_from_slice(text.as_bytes());
            Ok(out)
        }
        "utf-16le" | "utf-16be" => {
            let little = encoding == "utf-16le";
            let mut out = if little { vec![0xFF, 0xFE] } else { vec![0xFE, 0xFF] };
            for unit in text.encode_utf16() {
                let bytes = if little { unit.to_le_bytes() } else { unit.to_be_bytes() };
                out.extend_from_slice(&bytes);
            }
            Ok(out)
        }
        label => {
            let target = Encoding::for_label(label.as_bytes()).ok_or_else(|| L10nError::Encoding {
                message: format!("unknown encoding '{label}'"),
            })?;
            let (bytes, _, had_errors) = target.encode(text);
            if had_errors {
                return Err(L10nError::Encoding {
                    message: format!("text cannot be represented in {label}"),
                });
            }
            Ok(bytes.into_owned())
        }
    }
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path)?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        let best = bom_name(encoding);
        let mut candidates = vec![EncodingCandidate {
            name: best.clone(),
            confidence: 0.99,
        }];
        if encoding == UTF_8 {
            candidates.push(EncodingCandidate {
                name: "utf-8".into(),
                confidence: 0.90,
            });
        }
        return EncodingDetectionResult {
            best,
            confidence: 0.99,
            candidates,
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];
    for (alias, penalty) in aliases(&best) {
        candidates.push(EncodingCandidate {
            name: (*alias).into(),
            confidence: (confidence - penalty).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn bom_name(encoding: &'static Encoding) -> String {
    if encoding == UTF_8 {
        "utf-8-sig".into()
    } else {
        encoding.name().to_lowercase()
    }
}

/// Names commonly used for the same code page.
fn aliases(best: &str) -> &'static [(&'static str, f32)] {
    match best {
        "shift_jis" => &[("windows-31j", 0.03), ("cp932", 0.05)],
        "windows-1252" => &[("iso-8859-1", 0.05)],
        "utf-8" => &[("utf-8-sig", 0.20)],
        _ => &[],
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
