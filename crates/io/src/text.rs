// Configuration text (.pm) loading

use std::path::Path;

use sensorcheck_recon::ReconError;

/// Read a configuration file as text.
///
/// UTF-8 first; bytes that are not valid UTF-8 are decoded as Windows-1252,
/// which is what the bench configurator writes on older machines.
pub fn read_configuration(path: &Path) -> Result<String, ReconError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
