//! Reading SAML entity metadata documents.
//!
//! The sync pipeline identifies entities by the `entityID` attribute on the
//! root element and addresses them at the MDQ service by the hex SHA-1 of
//! that attribute.

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::error::{MdqpError, Result};

/// Extracts the `entityID` attribute from the root element of a metadata
/// document.
///
/// # Returns
/// * `Ok(String)` - The entityID value
/// * `Err` - The document is not well-formed XML or has no entityID
pub fn entity_id(xml: &str) -> Result<String> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| MdqpError::metadata(format!("invalid XML: {e}")))?;
    doc.root_element()
        .attribute("entityID")
        .map(str::to_string)
        .ok_or_else(|| MdqpError::metadata("no entityID attribute on root element"))
}

/// Reads a metadata file and extracts its entityID.
pub fn entity_id_from_file(path: &Path) -> Result<String> {
    let xml = fs::read_to_string(path)
        .map_err(|e| MdqpError::metadata(format!("cannot read {}: {e}", path.display())))?;
    entity_id(&xml)
}

/// Hex SHA-1 of a string. Applied to an entityID this yields the identifier
/// the MDQ protocol uses to address the entity.
pub fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hex SHA-1 of a file's contents, read in chunks.
///
/// Used to detect modified metadata by comparing an incoming file against
/// the copy recorded when it was last queued.
pub fn file_sha1(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; 128 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
