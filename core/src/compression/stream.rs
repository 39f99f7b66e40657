//! compression/stream.rs
//! Streaming helpers over `Read`/`Write`.
//!
//! Output frames leave the content size undeclared, so the buffer API decodes
//! them through the streaming fallback; anything the buffer API produces can
//! be fed through `stream_decompress` as well.
//!
//! Both directions borrow a context from the same pools as the buffer API and
//! reference prepared dictionaries from it.
use std::io::{self, BufReader, Read, Write};

use zstd::stream::read::Decoder;
use zstd::stream::write::Encoder;
use zstd_safe::{CCtx, DCtx};

use crate::compression::compress::Params;
use crate::compression::dict::{CompressionDictionary, DecompressionDictionary};
use crate::compression::engine::{self, clamp_level};
use crate::compression::pool::{compression_pool, decompression_pool};
use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::types::EngineError;

#[inline]
/// Summary: Compress everything read from `r` into `w` at the default level.
pub fn stream_compress<W: Write, R: Read>(w: W, r: R) -> io::Result<()> {
    stream_compress_level(w, r, DEFAULT_COMPRESSION_LEVEL)
}

/// Summary: Compress everything read from `r` into `w` at `level`.
/// - Out-of-range levels are clamped, as in the buffer API.
pub fn stream_compress_level<W: Write, R: Read>(w: W, r: R, level: i32) -> io::Result<()> {
    encode(w, r, Params::Level(clamp_level(level)))
}

/// Summary: Compress everything read from `r` into `w` using `dict`.
/// - Uses the level `dict` was prepared with.
pub fn stream_compress_dict<W: Write, R: Read>(
    w: W,
    r: R,
    dict: &CompressionDictionary,
) -> io::Result<()> {
    encode(w, r, Params::Dict(dict))
}

#[inline]
/// Summary: Decode every concatenated frame read from `r` into `w`.
pub fn stream_decompress<W: Write, R: Read>(w: W, r: R) -> io::Result<()> {
    decode(w, r, None)
}

/// Summary: Decode every concatenated frame read from `r` into `w` using `dict`.
pub fn stream_decompress_dict<W: Write, R: Read>(
    w: W,
    r: R,
    dict: &DecompressionDictionary,
) -> io::Result<()> {
    decode(w, r, Some(dict))
}

fn engine_io(e: EngineError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

fn encode<W: Write, R: Read>(w: W, r: R, params: Params<'_>) -> io::Result<()> {
    let mut cctx = compression_pool(params.has_dict()).acquire();
    params.bind(&mut cctx).map_err(engine_io)?;
    let result = copy_encode_with(w, r, &mut cctx.0);
    engine::unbind_cctx(&mut cctx.0);
    result
}

fn copy_encode_with<W: Write, R: Read>(w: W, mut r: R, cctx: &mut CCtx<'static>) -> io::Result<()> {
    let mut encoder = Encoder::with_context(w, cctx);
    io::copy(&mut r, &mut encoder)?;
    encoder.finish()?;
    Ok(())
}

fn decode<W: Write, R: Read>(
    mut w: W,
    r: R,
    dict: Option<&DecompressionDictionary>,
) -> io::Result<()> {
    let mut dctx = decompression_pool(dict.is_some()).acquire();
    engine::bind_ddict(&mut dctx.0, dict.map(|d| d.ddict())).map_err(engine_io)?;
    let result = copy_decode_with(&mut w, r, &mut dctx.0);
    engine::unbind_dctx(&mut dctx.0);
    result
}

fn copy_decode_with<W: Write, R: Read>(w: &mut W, r: R, dctx: &mut DCtx<'static>) -> io::Result<()> {
    let mut decoder = Decoder::with_context(BufReader::new(r), dctx);
    io::copy(&mut decoder, w)?;
    Ok(())
}
