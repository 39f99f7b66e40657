//! compression/fallback.rs
//! Streaming decompression behind the buffer API.
//!
//! Used when a frame's decompressed size is undeclared, too large to
//! pre-allocate, or when the input holds more frames than the first header
//! accounts for. A pooled streaming decoder is driven over a forward-only
//! source cursor, and every chunk it flushes is appended to the destination.
use zstd_safe::{DCtx, InBuffer, OutBuffer};

use crate::compression::dict::DecompressionDictionary;
use crate::compression::engine::{self, create_dctx};
use crate::compression::pool::{stream_decoder_pool, PooledContext};
use crate::telemetry::{record, Event};
use crate::types::{DecompressError, EngineError};

/// Forward-only reader over the compressed input.
pub(crate) struct SourceCursor<'a> {
    src: &'a [u8],
    offset: usize,
}

impl<'a> SourceCursor<'a> {
    pub(crate) fn new(src: &'a [u8]) -> Self {
        Self { src, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.src[self.offset..]
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.src.len());
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.offset >= self.src.len()
    }

    pub(crate) fn consumed(&self) -> usize {
        self.offset
    }
}

/// Append-only writer onto the caller's destination buffer.
pub(crate) struct Sink<'a> {
    dst: &'a mut Vec<u8>,
    base: usize,
}

impl<'a> Sink<'a> {
    pub(crate) fn new(dst: &'a mut Vec<u8>) -> Self {
        let base = dst.len();
        Self { dst, base }
    }

    pub(crate) fn append(&mut self, chunk: &[u8]) {
        self.dst.extend_from_slice(chunk);
    }

    /// Undo every append, restoring the caller's original length.
    pub(crate) fn rollback(self) {
        self.dst.truncate(self.base);
    }
}

/// Outcome of one decoder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pump {
    /// Output was produced and the frame is still in progress.
    Produced,
    /// The decoder wants more input but the source is exhausted.
    NeedMoreInput,
    /// A frame has been fully decoded and flushed.
    FrameDone,
}

/// Pooled streaming decoder plus its output chunk.
pub(crate) struct StreamDecompressor {
    dctx: DCtx<'static>,
    chunk: Vec<u8>,
}

impl PooledContext for StreamDecompressor {
    fn create() -> Self {
        Self {
            dctx: create_dctx(),
            chunk: Vec::with_capacity(DCtx::out_size()),
        }
    }
}

impl StreamDecompressor {
    /// Forget any previous session and reference `dict` (or no dictionary).
    pub(crate) fn reset(&mut self, dict: Option<&DecompressionDictionary>) -> Result<(), EngineError> {
        self.chunk.clear();
        engine::bind_ddict(&mut self.dctx, dict.map(|d| d.ddict()))
    }

    /// Drop the dictionary reference before going back to the pool.
    pub(crate) fn unbind(&mut self) {
        engine::unbind_dctx(&mut self.dctx);
    }

    /// Feed the cursor's remaining bytes and decode one output chunk.
    pub(crate) fn pump(&mut self, source: &mut SourceCursor<'_>) -> Result<Pump, EngineError> {
        self.chunk.clear();
        let mut input = InBuffer::around(source.remaining());
        let mut output = OutBuffer::around(&mut self.chunk);
        let hint = self
            .dctx
            .decompress_stream(&mut output, &mut input)
            .map_err(|code| own_buffer_overrun(EngineError::from_raw(code)))?;
        drop(output);

        let consumed = input.pos();
        source.advance(consumed);

        if hint == 0 {
            return Ok(Pump::FrameDone);
        }
        let output_full = self.chunk.len() == self.chunk.capacity();
        if output_full {
            return Ok(Pump::Produced);
        }
        if source.is_exhausted() || (consumed == 0 && self.chunk.is_empty()) {
            return Ok(Pump::NeedMoreInput);
        }
        Ok(Pump::Produced)
    }

    /// Bytes flushed by the last `pump`.
    pub(crate) fn produced(&self) -> &[u8] {
        &self.chunk
    }
}

/// Decode every frame in `src` and append the plaintext to `dst`.
///
/// On error `dst` is restored to its original length.
pub(crate) fn stream_decompress(
    dst: &mut Vec<u8>,
    src: &[u8],
    dict: Option<&DecompressionDictionary>,
) -> Result<(), DecompressError> {
    record(Event::StreamingFallback);
    let mut decoder = stream_decoder_pool().acquire();
    decoder.reset(dict)?;

    let mut source = SourceCursor::new(src);
    let mut sink = Sink::new(dst);
    let result = drive(&mut decoder, &mut source, &mut sink);
    decoder.unbind();
    if let Err(e) = &result {
        log::debug!("streaming decompression failed after {} bytes: {}", source.consumed(), e);
        sink.rollback();
    }
    result
}

// The decoder flushes into its own chunk and never runs out of room there.
// "Destination too small" from it means a block decoded past the size the
// frame declared, i.e. corrupt input.
fn own_buffer_overrun(e: EngineError) -> EngineError {
    if e.is_dst_too_small() {
        EngineError::corruption()
    } else {
        e
    }
}

fn drive(
    decoder: &mut StreamDecompressor,
    source: &mut SourceCursor<'_>,
    sink: &mut Sink<'_>,
) -> Result<(), DecompressError> {
    loop {
        let status = decoder.pump(source)?;
        sink.append(decoder.produced());
        match status {
            Pump::Produced => {}
            Pump::FrameDone if source.is_exhausted() => return Ok(()),
            Pump::FrameDone => {}
            Pump::NeedMoreInput => {
                return Err(DecompressError::Truncated {
                    consumed: source.consumed(),
                })
            }
        }
    }
}
