use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

/// A generic boxed error type.
pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// A convenient Result alias returning `AnyError`.
pub type AnyResult<T> = std::result::Result<T, AnyError>;

/// Media bytes flowing from a provider, optionally through a transcoder, to the client.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;
