mod dictionary;
mod encode;
mod primitive;
mod stream;

pub use dictionary::Dictionary;
pub use encode::{encode, encode_into, escape_literal, format_real};
pub use primitive::{Object, ObjectId};
pub use stream::Stream;
