//! MP3 transcoding through an external `ffmpeg` process.
//!
//! The input stream is fed to ffmpeg's stdin on a separate task while stdout
//! is handed back as the output stream, so bytes flow with the client's
//! back-pressure and nothing is buffered whole. When ffmpeg exits non-zero
//! the output stream ends with an error item, which aborts the HTTP body.

use std::{io, process::ExitStatus, process::Stdio, time::Duration};

use async_trait::async_trait;
use futures::{StreamExt, future, stream};
use thiserror::Error;
use tokio::{io::AsyncReadExt, process::Command, task::JoinError};
use tokio_util::io::{ReaderStream, StreamReader};

use crate::common::types::ByteStream;

/// How long a cleanly exited encoder waits for its feeder to wind down.
const FEED_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("transcoder {0} pipe was not captured")]
    MissingPipe(&'static str),

    #[error("transcoder exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("transcoder wait failed: {0}")]
    Wait(#[source] io::Error),

    #[error("feeding transcoder input failed: {0}")]
    Feed(String),
}

/// Converts a media byte stream into MP3.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn to_mp3(&self, input: ByteStream, bitrate_kbps: u32) -> Result<ByteStream, TranscodeError>;
}

pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn mp3_args(bitrate_kbps: u32) -> Vec<String> {
        [
            "-hide_banner",
            "-loglevel",
            "error",
            "-i",
            "pipe:0",
            "-vn",
            "-f",
            "mp3",
            "-b:a",
        ]
        .into_iter()
        .map(str::to_string)
        .chain([format!("{}k", bitrate_kbps), "pipe:1".to_string()])
        .collect()
    }
}

/// Maps ffmpeg's exit status to a result, keeping stderr for diagnostics.
fn check_status(status: io::Result<ExitStatus>, stderr: String) -> Result<(), TranscodeError> {
    let status = status.map_err(TranscodeError::Wait)?;
    if status.success() {
        Ok(())
    } else {
        Err(TranscodeError::Exit {
            status,
            stderr: stderr.trim().to_string(),
        })
    }
}

/// Checks the feeder outcome after a clean exit.
fn check_feed(fed: Result<io::Result<u64>, JoinError>) -> Result<(), TranscodeError> {
    match fed {
        Ok(Ok(_)) => Ok(()),
        // ffmpeg may close stdin once it has everything it needs
        Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Ok(Err(e)) => Err(TranscodeError::Feed(e.to_string())),
        Err(e) => Err(TranscodeError::Feed(e.to_string())),
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn to_mp3(&self, input: ByteStream, bitrate_kbps: u32) -> Result<ByteStream, TranscodeError> {
        let mut child = Command::new(&self.ffmpeg_path)
            .args(Self::mp3_args(bitrate_kbps))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TranscodeError::Spawn {
                program: self.ffmpeg_path.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or(TranscodeError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(TranscodeError::MissingPipe("stdout"))?;
        let mut stderr = child.stderr.take().ok_or(TranscodeError::MissingPipe("stderr"))?;

        tracing::debug!(
            "Spawned {} for MP3 at {} kbps (pid {:?})",
            self.ffmpeg_path,
            bitrate_kbps,
            child.id()
        );

        let mut feeder = tokio::spawn(async move {
            let mut reader = StreamReader::new(input);
            let copied = tokio::io::copy(&mut reader, &mut stdin).await;
            // EOF on stdin lets ffmpeg flush its last frames
            drop(stdin);
            copied
        });

        let diagnostics = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let finish = stream::once(async move {
            let status = child.wait().await;
            let stderr = diagnostics.await.unwrap_or_default();

            // a failed encoder must not wait on an upstream that may never yield again
            let outcome = match check_status(status, stderr) {
                Ok(()) => match tokio::time::timeout(FEED_GRACE, &mut feeder).await {
                    Ok(fed) => check_feed(fed),
                    // ffmpeg finished without draining stdin; the upstream tail is unused
                    Err(_) => {
                        feeder.abort();
                        Ok(())
                    }
                },
                Err(e) => {
                    feeder.abort();
                    Err(e)
                }
            };

            match outcome {
                Ok(()) => {
                    tracing::debug!("ffmpeg finished cleanly");
                    None
                }
                Err(e) => {
                    tracing::error!("MP3 transcode failed: {}", e);
                    Some(Err(io::Error::other(e)))
                }
            }
        })
        .filter_map(future::ready);

        Ok(ReaderStream::new(stdout).chain(finish).boxed())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn test_mp3_args() {
        let args = FfmpegTranscoder::mp3_args(160);
        assert_eq!(args.first().map(String::as_str), Some("-hide_banner"));
        assert!(args.windows(2).any(|w| w[0] == "-b:a" && w[1] == "160k"));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    }

    #[test]
    fn test_broken_pipe_feed_is_ok() {
        let fed = Ok(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(check_feed(fed).is_ok());

        let fed = Ok(Err(io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(matches!(check_feed(fed), Err(TranscodeError::Feed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_keeps_stderr() {
        let status = std::process::Command::new("false").status();
        let result = check_status(status, "  bad input\n".to_string());
        assert!(matches!(result, Err(TranscodeError::Exit { ref stderr, .. }) if stderr == "bad input"));
    }

    #[tokio::test]
    async fn test_missing_binary_fails_to_spawn() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/tubefetch-ffmpeg");
        let input = stream::iter(vec![Ok(Bytes::from_static(b"abc"))]).boxed();
        let result = transcoder.to_mp3(input, 128).await;
        assert!(matches!(result, Err(TranscodeError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_encoder_ends_stream_with_error() {
        // `false` ignores its arguments and exits 1 without output
        let transcoder = FfmpegTranscoder::new("false");
        let input = stream::iter(vec![Ok(Bytes::from_static(b"not really audio"))]).boxed();
        let output = transcoder.to_mp3(input, 128).await.unwrap();

        let items: Vec<io::Result<Bytes>> = output.collect().await;
        assert!(items.last().is_some_and(|item| item.is_err()));
    }

    /// Writes an executable stand-in encoder that sleeps and then fails.
    #[cfg(unix)]
    fn slow_failing_encoder() -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = std::env::temp_dir().join(format!("tubefetch-slowfail-{}.sh", std::process::id()));
        std::fs::write(&path, "#!/bin/sh\nsleep 1\nexit 1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_encoder_with_stalled_input_still_ends() {
        let path = slow_failing_encoder();
        let transcoder = FfmpegTranscoder::new(path.to_string_lossy());

        let mut attempts = 0;
        let output = loop {
            let input = stream::iter(vec![Ok::<_, io::Error>(Bytes::from_static(b"abc"))])
                .chain(stream::pending())
                .boxed();
            match transcoder.to_mp3(input, 128).await {
                Ok(output) => break output,
                // a freshly written script can briefly report ETXTBSY
                Err(TranscodeError::Spawn { source, .. })
                    if source.raw_os_error() == Some(26) && attempts < 5 =>
                {
                    attempts += 1;
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                Err(e) => panic!("spawn failed: {}", e),
            }
        };

        let items: Vec<io::Result<Bytes>> =
            tokio::time::timeout(Duration::from_secs(10), output.collect())
                .await
                .expect("output should end once the encoder exits");
        let _ = std::fs::remove_file(&path);

        assert!(items.last().is_some_and(|item| item.is_err()));
    }
}
