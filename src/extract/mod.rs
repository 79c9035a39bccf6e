//! Remote extraction pipeline: service client, result writing, and the
//! batch orchestrator.

pub mod batch;
pub mod client;
pub mod writer;

pub use batch::{BatchExtractor, BatchReport};
pub use client::{ExtractResponse, ExtractionBackend, IdpClient, SUCCESS_CODE};
pub use writer::{render_payload, reserve_output_path, write_result};
