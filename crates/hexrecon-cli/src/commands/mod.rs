//! One module per subcommand. Each handler writes its data to `out` (or the
//! `--output` file) and leaves diagnostics to tracing.

pub mod assemble;
pub mod diff;
pub mod disagreements;
pub mod resolve;
pub mod stats;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use hexrecon_core::ReconError;
use tracing::info;

/// Run `write` against the `--output` file if one is given, else `stdout`.
pub(crate) fn write_output<F>(path: Option<&Path>, stdout: &mut dyn Write, write: F) -> Result<(), ReconError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| ReconError::io(path, e))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)
                .and_then(|()| writer.flush())
                .map_err(|e| ReconError::io(path, e))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            write(stdout)
                .and_then(|()| stdout.flush())
                .map_err(|e| ReconError::io("<stdout>", e))?;
        }
    }
    Ok(())
}
