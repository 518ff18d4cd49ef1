//! Message buffer and envelope framing.
//!
//! Envelope layout (text, line break is the two-character `"\n\r"`):
//!
//! ```text
//! <msg>
//! {hex body, 40 characters per line}
//! </msg>
//! ```
//!
//! The hex body is the two-character encoding of every body byte in
//! writer order followed by one trailing CRC-8 byte. Each wire byte
//! passes through the [`ByteCipher`] keyed by its 0-based body offset;
//! the trailer travels at offset `len` but is never fed into the
//! checksum.

use crate::cipher::ByteCipher;
use crate::crc8::Crc8;
use crate::error::ProtocolError;
use crate::reader::FieldReader;
use crate::scanner::FrameScanner;
use crate::writer::FieldWriter;
use crate::{hex, BODY_CAPACITY, CRC_SEED, LINE_WRAP_BYTES, MESSAGE_FOOTER, MESSAGE_HEADER, NEW_LINE};

/// Fixed-capacity message body plus the envelope encode/decode
/// orchestrator.
///
/// A buffer is created empty, populated by exactly one encode or decode
/// pass, and reused via [`reset`](MessageBuffer::reset). It owns its byte
/// storage exclusively and is not safe for concurrent use without
/// external synchronization.
#[derive(Debug)]
pub struct MessageBuffer {
    body: Vec<u8>,
    capacity: usize,
}

impl MessageBuffer {
    /// Creates an empty buffer with the protocol-standard capacity of
    /// [`BODY_CAPACITY`] bytes.
    pub fn new() -> Self {
        Self::with_capacity(BODY_CAPACITY)
    }

    /// Creates an empty buffer with a non-standard capacity.
    ///
    /// The wire format is capacity-independent; peers must agree on the
    /// bound out of band. [`new`](MessageBuffer::new) is correct for the
    /// standard protocol.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            body: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Capacity in bytes, shared by the body and the checksum trailer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of body bytes currently held.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// The body bytes written so far (checksum trailer excluded).
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Clears the body for the next encode or decode pass.
    pub fn reset(&mut self) {
        self.body.clear();
    }

    /// Appends one byte, failing once the capacity is reached.
    pub(crate) fn push(&mut self, byte: u8) -> Result<(), ProtocolError> {
        if self.body.len() < self.capacity {
            self.body.push(byte);
            Ok(())
        } else {
            Err(ProtocolError::Overflow {
                capacity: self.capacity,
            })
        }
    }

    /// Starts a typed-field writing session, clearing the buffer first.
    pub fn writer(&mut self) -> FieldWriter<'_> {
        self.reset();
        FieldWriter::new(self)
    }

    /// Starts a typed-field reading session at the beginning of the body.
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(self)
    }

    /// Encodes the body into a complete textual envelope.
    ///
    /// The CRC-8 is computed over the body bytes with [`CRC_SEED`] and
    /// appended as the trailer. Fails only with
    /// [`ProtocolError::Overflow`] when the body already fills the whole
    /// capacity, leaving no slot for the trailer on the decode side.
    pub fn encode(&self, cipher: &dyn ByteCipher) -> Result<String, ProtocolError> {
        if self.body.len() >= self.capacity {
            return Err(ProtocolError::Overflow {
                capacity: self.capacity,
            });
        }

        let mut crc = Crc8::new(CRC_SEED);
        crc.update_slice(&self.body);

        let mut out = String::with_capacity(self.body.len() * 2 + 32);
        out.push_str(MESSAGE_HEADER);
        out.push_str(NEW_LINE);

        let mut line_bytes = 0;
        let wire = self.body.iter().copied().chain(std::iter::once(crc.value()));
        for (index, byte) in wire.enumerate() {
            let (high, low) = hex::encode_byte(cipher.encode(index, byte));
            out.push(high);
            out.push(low);
            line_bytes += 1;
            if line_bytes == LINE_WRAP_BYTES {
                out.push_str(NEW_LINE);
                line_bytes = 0;
            }
        }
        if line_bytes != 0 {
            out.push_str(NEW_LINE);
        }
        out.push_str(MESSAGE_FOOTER);

        tracing::trace!(body_len = self.body.len(), "encoded envelope");
        Ok(out)
    }

    /// Decodes a complete textual envelope into the buffer.
    ///
    /// On success the stored checksum trailer has been stripped and
    /// verified, and the return value reports whether any payload bytes
    /// remain beyond it. On failure the pass is aborted and the buffer
    /// contents are unspecified; callers reuse it only through
    /// [`reset`](MessageBuffer::reset) or another decode.
    pub fn decode(&mut self, cipher: &dyn ByteCipher, text: &str) -> Result<bool, ProtocolError> {
        self.reset();

        let mut scanner = FrameScanner::new(text);
        if !scanner.match_literal(MESSAGE_HEADER) {
            return Err(ProtocolError::MalformedEnvelope {
                reason: "missing <msg> header",
            });
        }

        let mut footer_found = false;
        while scanner.skip_whitespace() {
            if scanner.match_literal(MESSAGE_FOOTER) {
                footer_found = true;
                break;
            }
            let first = scanner.peek(0);
            let second = scanner.peek(1);
            scanner.advance(2);
            let (first, second) = match (first, second) {
                (Some(first), Some(second)) => (first, second),
                _ => {
                    return Err(ProtocolError::BodyFormat {
                        reason: "truncated hex pair",
                    })
                }
            };
            let wire_byte = hex::decode_byte(first, second)?;
            let byte = cipher.decode(self.body.len(), wire_byte);
            self.push(byte)?;
        }

        if !footer_found {
            return Err(ProtocolError::MalformedEnvelope {
                reason: "missing </msg> footer",
            });
        }

        let stored = self.body.pop().ok_or(ProtocolError::BodyFormat {
            reason: "no body bytes before footer",
        })?;

        let mut crc = Crc8::new(CRC_SEED);
        let computed = crc.update_slice(&self.body);
        if stored != computed {
            return Err(ProtocolError::IntegrityMismatch {
                expected: stored,
                actual: computed,
            });
        }

        tracing::trace!(payload_len = self.body.len(), "decoded envelope");
        Ok(!self.body.is_empty())
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}
