pub mod batch;
pub mod sequence;

pub use batch::Batch;
pub use sequence::{EncodedSequence, SequenceCodec};
