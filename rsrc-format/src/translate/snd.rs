//! Sampled sound (`snd `) to WAV.
//!
//! Only the simplest resources are handled: format 1, a single sampled
//! sound data format, a single `bufferCmd` and a standard sound header with
//! 8-bit mono PCM samples. Layouts follow Inside Macintosh: Sound (1994).

use byteorder::{LittleEndian, WriteBytesExt};

use crate::cursor::Cursor;
use crate::{BoxError, Resource, TypeCode};

use super::{Compatibility, TranslateError, Translation, Translator};

const SND_TYPE: TypeCode = TypeCode::new(*b"snd ");

const SAMPLED_SYNTH: i16 = 0x0005;
const BUFFER_CMD: i16 = 0x8051u16 as i16;
const WAV_HEADER_LEN: usize = 44;

#[derive(Debug, Clone, Copy, Default)]
pub struct SndTranslator;

#[derive(Debug)]
struct SampledSound {
    sample_rate: u32,
    samples: Vec<u8>,
}

impl Translator for SndTranslator {
    fn name(&self) -> &'static str {
        "snd"
    }

    fn compatibility(&self, resource: &Resource) -> Compatibility {
        if resource.type_code == SND_TYPE {
            Compatibility::LikelyCompatible
        } else {
            Compatibility::NotCompatible
        }
    }

    fn translate(&self, resource: &Resource) -> Result<Translation, TranslateError> {
        read_sampled_sound(&resource.data)
            .and_then(|sound| wav(&sound))
            .map(|data| Translation {
                data,
                extension: "wav",
            })
            .map_err(|e| TranslateError::invalid("Failed to parse snd resource.").with_source(e))
    }
}

// A format 1 resource is:
// * Format (2)
// * Number of data formats (2), each:
//   * Data type (2)
//   * Initialization options (4)
// * Number of sound commands (2), each:
//   * Command (2)
//   * param1 (2)
//   * param2 (4), for bufferCmd the offset of the sound header
//
// The standard sound header is:
// * Sample data pointer, zero when samples follow the header (4)
// * Number of samples (4)
// * Sample rate, unsigned 16.16 fixed (4)
// * Loop start and end (8)
// * Encoding (1)
// * Base frequency (1)
// * Samples (Variable)
fn read_sampled_sound(data: &[u8]) -> Result<SampledSound, BoxError> {
    let mut reader = Cursor::new(data);

    let format = reader.read_i16()?;
    match format {
        1 => {}
        2 => {
            return Err(
                TranslateError::unsupported("Format 2 snd resources are not supported.").into(),
            )
        }
        format => {
            return Err(TranslateError::invalid(format!("Unknown snd format {}.", format)).into())
        }
    }

    match reader.read_i16()? {
        1 => {}
        n if n <= 0 => {
            return Err(TranslateError::unsupported(
                "The resource doesn't contain any data formats.",
            )
            .into())
        }
        _ => {
            return Err(TranslateError::unsupported(
                "Resources with more than one data format are not supported.",
            )
            .into())
        }
    }

    if reader.read_i16()? != SAMPLED_SYNTH {
        return Err(TranslateError::unsupported(
            "Only sampled sound data (type 0x0005) is supported.",
        )
        .into());
    }
    reader.skip(4)?; // Initialization options

    if reader.read_i16()? != 1 {
        return Err(TranslateError::unsupported(
            "Resources with more than one sound command are not supported.",
        )
        .into());
    }

    if reader.read_i16()? != BUFFER_CMD {
        return Err(TranslateError::unsupported("Only bufferCmd commands are supported.").into());
    }
    reader.skip(2)?; // param1
    let header_offset = reader.read_i32()?;

    reader.seek(header_offset)?;
    if reader.read_i32()? != 0 {
        return Err(TranslateError::unsupported(
            "Sample data pointers outside the resource are not supported.",
        )
        .into());
    }

    let sample_count = reader.read_i32()?;
    if sample_count <= 0 {
        return Err(TranslateError::invalid("Sample has a non-positive length.").into());
    }

    // Only the integer part of the rate is kept; WAV has no fractional rates.
    let sample_rate = (reader.read_i32()? as u32) >> 16;

    reader.skip(8)?; // Loop points

    if reader.read_i8()? != 0 {
        return Err(TranslateError::unsupported("Encoded samples are not supported.").into());
    }
    reader.skip(1)?; // Base frequency

    let samples = reader.read_bytes(sample_count)?;

    tracing::debug!(
        sample_rate,
        samples = samples.len(),
        header = format_args!("{:#x}", header_offset),
        "read sampled sound"
    );

    Ok(SampledSound {
        sample_rate,
        samples,
    })
}

fn wav(sound: &SampledSound) -> Result<Vec<u8>, BoxError> {
    let data_len = u32::try_from(sound.samples.len())?;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + sound.samples.len());

    // The RIFF chunk size excludes its own ID and size fields.
    out.extend_from_slice(b"RIFF");
    out.write_u32::<LittleEndian>(data_len + WAV_HEADER_LEN as u32 - 8)?;
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.write_u32::<LittleEndian>(16)?;
    out.write_u16::<LittleEndian>(1)?; // PCM
    out.write_u16::<LittleEndian>(1)?; // Channels
    out.write_u32::<LittleEndian>(sound.sample_rate)?;
    out.write_u32::<LittleEndian>(sound.sample_rate)?; // Bytes per second
    out.write_u16::<LittleEndian>(1)?; // Block align
    out.write_u16::<LittleEndian>(8)?; // Bits per sample

    out.extend_from_slice(b"data");
    out.write_u32::<LittleEndian>(data_len)?;
    out.extend_from_slice(&sound.samples);

    Ok(out)
}
