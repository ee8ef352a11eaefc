use super::{Completion, Resource};
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::Font;
use crate::writer::{ObjectWriter, Reference};

/// Font dictionary for one of the standard 14 fonts.
#[derive(Debug)]
pub struct StandardFont {
    font: Font,
    id: ObjectId,
    reference: Option<Reference>,
}

impl StandardFont {
    pub fn new(writer: &mut dyn ObjectWriter, font: Font) -> Self {
        let mut dict = Dictionary::typed("Font");
        dict.set("Subtype", Object::name("Type1"));
        dict.set("BaseFont", Object::name(font.pdf_name()));
        if let Some(encoding) = font.encoding() {
            dict.set("Encoding", Object::name(encoding));
        }
        let reference = writer.create(dict);
        Self {
            font,
            id: reference.id(),
            reference: Some(reference),
        }
    }

    pub fn font(&self) -> Font {
        self.font
    }
}

impl Resource for StandardFont {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn finalize(&mut self, writer: &mut dyn ObjectWriter) -> Result<Completion> {
        if let Some(reference) = self.reference.take() {
            writer.write(reference)?;
        }
        Ok(Completion::Complete)
    }
}
