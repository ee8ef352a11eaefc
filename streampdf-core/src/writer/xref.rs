//! Cross-reference section and trailer (ISO 32000-1 Sections 7.5.4 and 7.5.5)

use crate::error::{PdfError, Result};
use crate::objects::{encode, Dictionary, Object, ObjectId};
use crate::writer::emitter::ByteEmitter;
use crate::writer::sink::Sink;
use crate::writer::table::ReferenceTable;

/// Width of every entry line, terminator included.
pub const XREF_ENTRY_LEN: usize = 20;

const FREE_HEAD_ENTRY: &str = "0000000000 65535 f \n";

/// Renders the classic `xref` section for a fully resolved table.
pub fn xref_section(table: &ReferenceTable) -> Result<String> {
    let mut out = String::with_capacity(16 + (table.len() + 1) * XREF_ENTRY_LEN);
    out.push_str("xref\n");
    out.push_str(&format!("0 {}\n", table.len() + 1));
    out.push_str(FREE_HEAD_ENTRY);

    for (i, offset) in table.offsets().iter().enumerate() {
        let offset = offset.ok_or_else(|| {
            PdfError::InvalidStructure(format!("object {} has no recorded offset", i + 1))
        })?;
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    Ok(out)
}

/// Builds the trailer dictionary.
pub fn trailer_dictionary(size: usize, root: ObjectId, info: Option<ObjectId>) -> Dictionary {
    let mut trailer = Dictionary::new();
    trailer.set("Size", size);
    trailer.set("Root", root);
    if let Some(info) = info {
        trailer.set("Info", info);
    }
    trailer
}

/// Writes the xref section, trailer, `startxref` and `%%EOF`.
///
/// Returns the offset at which the `xref` keyword starts.
pub fn write_xref_and_trailer<S: Sink>(
    emitter: &mut ByteEmitter<S>,
    table: &ReferenceTable,
    root: ObjectId,
    info: Option<ObjectId>,
) -> Result<u64> {
    let section = xref_section(table)?;
    let xref_offset = emitter.offset();
    emitter.write(section.as_bytes())?;

    let trailer = trailer_dictionary(table.len() + 1, root, info);
    emitter.write_line("trailer")?;
    let mut encoded = encode(&Object::Dictionary(trailer));
    encoded.push(b'\n');
    emitter.write(&encoded)?;
    emitter.write_line("startxref")?;
    emitter.write_line(&xref_offset.to_string())?;
    emitter.write_line("%%EOF")?;
    Ok(xref_offset)
}
