//! Response input from a file or stdin

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use loopscore_core::bail_usage;
use loopscore_core::error::{LoopscoreError, Result};

/// Read a response from `path`, or from stdin when absent or `-`
pub fn read_response(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| LoopscoreError::io_operation("read response", path.display(), e)),
        _ => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                bail_usage!("no response given: pass a FILE or pipe text on stdin");
            }
            let mut content = String::new();
            stdin.lock().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Render a flag as yes/no
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
