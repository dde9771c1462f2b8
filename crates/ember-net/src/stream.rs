use std::io::{Read, Write};

/// A bidirectional byte stream: a plain socket or a TLS session on top
/// of one.
pub trait NetworkStream: Read + Write + Send {}

impl<T: Read + Write + Send> NetworkStream for T {}
