//! Outgoing document transfer
//!
//! Documents are larger than a comfortable WebSocket frame on the device, so
//! they are sent as a run of text chunks followed by [`DOCUMENT_SENT`].

use crate::messages::DOCUMENT_SENT;

/// Maximum bytes per document chunk
pub const CHUNK_SIZE: usize = 2000;

/// Iterator over the messages that transfer one document
///
/// Yields the document in chunks of at most [`CHUNK_SIZE`] bytes, then the
/// terminator. Chunks end on character boundaries so every chunk is valid
/// text on its own; a chunk is only shorter than the limit when a multi-byte
/// character straddles it or at the end of the document.
#[derive(Debug, Clone)]
pub struct DocumentChunks<'a> {
    remaining: &'a str,
    chunk_size: usize,
    state: ChunkState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    Body,
    Terminator,
    Done,
}

impl<'a> DocumentChunks<'a> {
    /// Chunk a document with [`CHUNK_SIZE`]
    pub fn new(document: &'a str) -> Self {
        Self::with_chunk_size(document, CHUNK_SIZE)
    }

    /// Chunk a document with a custom limit (at least 4 bytes)
    pub fn with_chunk_size(document: &'a str, chunk_size: usize) -> Self {
        Self {
            remaining: document,
            // Room for any single UTF-8 character
            chunk_size: chunk_size.max(4),
            state: ChunkState::Body,
        }
    }
}

impl<'a> Iterator for DocumentChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ChunkState::Body => {
                if self.remaining.is_empty() {
                    self.state = ChunkState::Done;
                    return Some(DOCUMENT_SENT);
                }

                let mut end = self.chunk_size.min(self.remaining.len());
                while !self.remaining.is_char_boundary(end) {
                    end -= 1;
                }
                let (chunk, rest) = self.remaining.split_at(end);
                self.remaining = rest;
                if rest.is_empty() {
                    self.state = ChunkState::Terminator;
                }
                Some(chunk)
            }
            ChunkState::Terminator => {
                self.state = ChunkState::Done;
                Some(DOCUMENT_SENT)
            }
            ChunkState::Done => None,
        }
    }
}
