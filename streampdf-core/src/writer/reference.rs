use crate::error::Result;
use crate::objects::{encode_into, Dictionary, Object, ObjectId, Stream};

/// An indirect object that has been numbered but not yet written.
///
/// The payload may be changed freely until the reference is handed to
/// [`ObjectWriter::write`](crate::writer::ObjectWriter::write), which consumes
/// it; after that only its [`ObjectId`] remains.
#[derive(Debug)]
pub struct Reference {
    id: ObjectId,
    dictionary: Dictionary,
    data: Option<Vec<u8>>,
}

impl Reference {
    pub(crate) fn new(id: ObjectId, dictionary: Dictionary) -> Self {
        Self {
            id,
            dictionary,
            data: None,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    /// Appends bytes to the stream body, turning this object into a stream.
    pub fn append_data(&mut self, bytes: &[u8]) {
        self.data.get_or_insert_with(Vec::new).extend_from_slice(bytes);
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Length of the stream body, if any, before compression.
    pub fn declared_length(&self) -> Option<usize> {
        self.data.as_ref().map(Vec::len)
    }

    /// Serializes the object as `<n> 0 obj\n<payload>\nendobj\n`.
    ///
    /// Stream bodies are flate-compressed when `compress` is set, the body is
    /// not empty and no filter has been applied yet.
    pub(crate) fn serialize(self, compress: bool) -> Result<Vec<u8>> {
        let payload = match self.data {
            Some(data) => {
                let mut stream = Stream::with_dictionary(self.dictionary, data);
                if compress && !stream.data().is_empty() && !stream.is_filtered() {
                    compress_stream(&mut stream)?;
                }
                stream.into_object()
            }
            None => Object::Dictionary(self.dictionary),
        };

        let mut buf = format!("{} {} obj\n", self.id.number(), self.id.generation()).into_bytes();
        encode_into(&mut buf, &payload);
        buf.extend_from_slice(b"\nendobj\n");
        Ok(buf)
    }
}

#[cfg(feature = "compression")]
fn compress_stream(stream: &mut Stream) -> Result<()> {
    stream.compress_flate()
}

#[cfg(not(feature = "compression"))]
fn compress_stream(_stream: &mut Stream) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_dictionary_object() {
        let mut reference = Reference::new(ObjectId::new(1, 0), Dictionary::typed("Catalog"));
        reference
            .dictionary_mut()
            .set("Pages", Object::Reference(ObjectId::new(2, 0)));

        let bytes = reference.serialize(false).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "1 0 obj\n<<\n/Type /Catalog\n/Pages 2 0 R\n>>\nendobj\n"
        );
    }

    #[test]
    fn test_serialize_stream_object_sets_length() {
        let mut reference = Reference::new(ObjectId::new(4, 0), Dictionary::new());
        reference.append_data(b"BT ");
        reference.append_data(b"ET");
        assert_eq!(reference.declared_length(), Some(5));

        let bytes = reference.serialize(false).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "4 0 obj\n<<\n/Length 5\n>>\nstream\nBT ET\nendstream\nendobj\n"
        );
    }

    #[test]
    #[cfg(feature = "compression")]
    fn test_serialize_compresses_stream() {
        let mut reference = Reference::new(ObjectId::new(4, 0), Dictionary::new());
        reference.append_data("0 0 m 10 10 l S\n".repeat(30).as_bytes());

        let bytes = reference.serialize(true).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Filter /FlateDecode"));
        assert!(!text.contains("0 0 m 10 10 l S"));
    }

    #[test]
    fn test_empty_stream_is_not_compressed() {
        let mut reference = Reference::new(ObjectId::new(4, 0), Dictionary::new());
        reference.append_data(b"");

        let bytes = reference.serialize(true).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("Filter"));
        assert!(text.contains("/Length 0"));
    }
}
