use crate::error::{PdfError, Result};
use crate::objects::ObjectId;

/// Object number allocator and byte-offset ledger.
///
/// Slot `i` belongs to object number `i + 1`. It stays `None` until that
/// object has been written, and `pending` always equals the number of `None`
/// slots.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    offsets: Vec<Option<u64>>,
    pending: usize,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next object number.
    pub fn allocate(&mut self) -> ObjectId {
        self.offsets.push(None);
        self.pending += 1;
        ObjectId::new(self.offsets.len() as u32, 0)
    }

    /// Fails unless `id` was allocated here and has not been written yet.
    pub fn check_pending(&self, id: ObjectId) -> Result<()> {
        match self.slot(id)? {
            None => Ok(()),
            Some(_) => Err(PdfError::ReferenceAlreadyResolved(id.number())),
        }
    }

    /// Records the byte offset at which `id` was written.
    pub fn resolve(&mut self, id: ObjectId, offset: u64) -> Result<()> {
        self.check_pending(id)?;
        self.offsets[id.number() as usize - 1] = Some(offset);
        self.pending -= 1;
        Ok(())
    }

    /// Objects allocated but not written yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Objects allocated so far.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offset(&self, id: ObjectId) -> Option<u64> {
        self.slot(id).ok().flatten()
    }

    /// Offsets in object-number order; `None` marks an unwritten object.
    pub fn offsets(&self) -> &[Option<u64>] {
        &self.offsets
    }

    /// Ids that are still waiting to be written.
    pub fn unresolved(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter(|(_, offset)| offset.is_none())
            .map(|(i, _)| ObjectId::new(i as u32 + 1, 0))
    }

    fn slot(&self, id: ObjectId) -> Result<Option<u64>> {
        let number = id.number() as usize;
        if number == 0 || number > self.offsets.len() || id.generation() != 0 {
            return Err(PdfError::UnknownReference(id.number()));
        }
        Ok(self.offsets[number - 1])
    }
}
