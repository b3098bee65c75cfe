//! Batch request assembly and JSONL output.

pub mod assembler;
pub mod envelope;
pub mod writer;

pub use assembler::BatchAssembler;
pub use envelope::{BatchEnvelope, Message, RequestBody, BATCH_METHOD, CHAT_COMPLETIONS_URL};
pub use writer::{read_first_envelope, write_batch_file, write_envelopes};
