pub mod transcode;

pub use transcode::{FfmpegTranscoder, TranscodeError, Transcoder};
