//! Plain pincode list files

use crate::model::Pincode;
use crate::{Error, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Read a list of pincodes separated by newlines, commas or whitespace
///
/// Blank tokens are skipped. A token that is not a pincode fails the whole
/// read with the line number it was found on.
pub fn read_code_list(reader: impl Read) -> Result<Vec<Pincode>> {
    let mut codes = Vec::new();
    for (lineno, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            let code = Pincode::parse(token).map_err(|_| {
                Error::MalformedInput(format!(
                    "line {}: {:?} is not a pincode",
                    lineno + 1,
                    token
                ))
            })?;
            codes.push(code);
        }
    }
    Ok(codes)
}

/// Read a pincode list from a file
pub fn read_code_file(path: impl AsRef<Path>) -> Result<Vec<Pincode>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_code_list(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_mixed_separators() {
        let input = "110001\n110002, 110003\n\n  560034\t400001,\n";
        let codes = read_code_list(input.as_bytes()).unwrap();
        let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["110001", "110002", "110003", "560034", "400001"]);
    }

    #[test]
    fn test_bad_token_reports_line() {
        let err = read_code_list("110001\nabc\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_file_is_io() {
        let dir = tempdir().unwrap();
        let err = read_code_file(dir.path().join("nope.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
