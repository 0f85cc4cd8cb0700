//! Raw binary dump export

use std::io::Write;
use std::path::Path;

use super::write_atomically;
use crate::capture::FrameBuffer;
use crate::Result;

/// Write the frame buffer verbatim to `writer`
///
/// No header and no framing: the output is exactly `frame_count * 25` bytes.
pub fn write_binary<W: Write>(buffer: &FrameBuffer, writer: &mut W) -> Result<()> {
    writer.write_all(buffer.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Export the frame buffer to a raw dump file
///
/// The destination is only created once every byte has been written; on
/// failure no file is left behind.
pub fn export_binary<P: AsRef<Path>>(buffer: &FrameBuffer, output_path: P) -> Result<()> {
    write_atomically(output_path.as_ref(), |file| write_binary(buffer, file))?;
    tracing::debug!(bytes = buffer.byte_len(), "binary dump written");
    Ok(())
}
