// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! WPILOG records and typed payload access.
//!
//! Three record types cover the two directions:
//! - [`Record`] - what the decoder emits: ids plus an `(offset, len)` span
//!   into the buffer that was decoded, so framing allocates nothing per
//!   payload
//! - [`RecordView`] - a record joined with its payload bytes; all typed
//!   accessors live here and copy out only what the caller asks for
//! - [`RecordBuf`] - an owned record built for the encoder
//!
//! Typed accessors return `None` when the payload size does not fit the
//! requested shape. Control record accessors return an error instead, since
//! calling them on the wrong kind of record is a caller mistake.

use std::borrow::Cow;
use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};

use super::constants::{
    CONTROL_ENTRY, CONTROL_FINISH, CONTROL_SET_METADATA, CONTROL_START, FINISH_PAYLOAD_LEN,
};
use super::cursor::ByteCursor;
use crate::core::{LogValue, TypeTag};
use crate::{CodecError, Result};

/// Minimum start payload: tag, entry id, and three empty prefixed strings.
const MIN_START_PAYLOAD_LEN: usize = 1 + 4 + 4 + 4 + 4;

/// Minimum set-metadata payload: tag, entry id, and an empty prefixed string.
const MIN_SET_METADATA_PAYLOAD_LEN: usize = 1 + 4 + 4;

/// Control record kind, taken from the first payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    Start,
    Finish,
    SetMetadata,
}

impl ControlType {
    /// Map a control tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            CONTROL_START => Some(ControlType::Start),
            CONTROL_FINISH => Some(ControlType::Finish),
            CONTROL_SET_METADATA => Some(ControlType::SetMetadata),
            _ => None,
        }
    }

    /// The tag byte for this kind.
    pub fn tag(&self) -> u8 {
        match self {
            ControlType::Start => CONTROL_START,
            ControlType::Finish => CONTROL_FINISH,
            ControlType::SetMetadata => CONTROL_SET_METADATA,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Start => "start",
            ControlType::Finish => "finish",
            ControlType::SetMetadata => "set-metadata",
        }
    }
}

/// Contents of a start control record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRecordData {
    /// Entry id being declared
    pub entry: u32,
    /// Entry name (e.g. "/drive/leftVelocity")
    pub name: String,
    /// Declared type string (e.g. "double", "int64[]")
    pub type_name: String,
    /// Free-form metadata string
    pub metadata: String,
}

impl StartRecordData {
    /// Create start record contents.
    pub fn new(
        entry: u32,
        name: impl Into<String>,
        type_name: impl Into<String>,
        metadata: impl Into<String>,
    ) -> Self {
        Self {
            entry,
            name: name.into(),
            type_name: type_name.into(),
            metadata: metadata.into(),
        }
    }

    /// Resolve the declared type string.
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::from_type_name(&self.type_name)
    }
}

/// Contents of a set-metadata control record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecordData {
    /// Entry id being updated
    pub entry: u32,
    /// Replacement metadata string
    pub metadata: String,
}

/// A framed record: header fields plus the location of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Entry id (0 for control records)
    pub entry: u32,
    /// Timestamp in microseconds
    pub timestamp: u64,
    /// Offset of the record's control byte in the source buffer
    pub offset: usize,
    /// Offset of the payload in the source buffer
    pub payload_offset: usize,
    /// Payload length in bytes
    pub payload_len: usize,
}

impl Record {
    /// Byte range of the payload within the source buffer.
    #[inline]
    pub fn payload_range(&self) -> Range<usize> {
        self.payload_offset..self.payload_offset + self.payload_len
    }

    /// Offset one past the last payload byte.
    #[inline]
    pub fn end_offset(&self) -> usize {
        self.payload_offset + self.payload_len
    }

    /// Check if this is a control record.
    #[inline]
    pub fn is_control(&self) -> bool {
        self.entry == CONTROL_ENTRY
    }

    /// Join this record with the buffer it was decoded from.
    ///
    /// A buffer that does not cover the payload span yields an empty payload.
    pub fn view<'a>(&self, data: &'a [u8]) -> RecordView<'a> {
        let payload = data.get(self.payload_range()).unwrap_or(&[]);
        RecordView::new(self.entry, self.timestamp, payload)
    }
}

/// A record with borrowed payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    entry: u32,
    timestamp: u64,
    payload: &'a [u8],
}

impl<'a> RecordView<'a> {
    /// Create a view.
    pub fn new(entry: u32, timestamp: u64, payload: &'a [u8]) -> Self {
        Self {
            entry,
            timestamp,
            payload,
        }
    }

    /// Entry id.
    #[inline]
    pub fn entry(&self) -> u32 {
        self.entry
    }

    /// Timestamp in microseconds.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Payload bytes.
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Payload length.
    #[inline]
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    // ========================================================================
    // Control records
    // ========================================================================

    /// Check if this is a control record.
    #[inline]
    pub fn is_control(&self) -> bool {
        self.entry == CONTROL_ENTRY
    }

    /// Control kind, if this is a control record with a known tag.
    pub fn control_type(&self) -> Option<ControlType> {
        if !self.is_control() {
            return None;
        }
        self.payload.first().copied().and_then(ControlType::from_tag)
    }

    /// Check if this is a start control record of plausible size.
    pub fn is_start(&self) -> bool {
        self.control_type() == Some(ControlType::Start) && self.size() >= MIN_START_PAYLOAD_LEN
    }

    /// Check if this is a finish control record.
    pub fn is_finish(&self) -> bool {
        self.control_type() == Some(ControlType::Finish) && self.size() == FINISH_PAYLOAD_LEN
    }

    /// Check if this is a set-metadata control record of plausible size.
    pub fn is_set_metadata(&self) -> bool {
        self.control_type() == Some(ControlType::SetMetadata)
            && self.size() >= MIN_SET_METADATA_PAYLOAD_LEN
    }

    fn expect_control(&self, kind: ControlType) -> Result<ByteCursor<'a>> {
        if !self.is_control() {
            return Err(CodecError::not_control(self.entry));
        }
        match self.control_type() {
            Some(found) if found == kind => Ok(ByteCursor::new(self.payload)),
            Some(found) => Err(CodecError::invalid_control(
                kind.as_str(),
                format!("record is a {} control record", found.as_str()),
            )),
            None => Err(CodecError::invalid_control(
                kind.as_str(),
                format!("unknown control tag {:?}", self.payload.first()),
            )),
        }
    }

    /// Parse a start control record.
    pub fn start_data(&self) -> Result<StartRecordData> {
        let cursor = self.expect_control(ControlType::Start)?;
        let malformed = |e: CodecError| CodecError::invalid_control("start", e.to_string());

        let entry = cursor.read_u32_le(1).map_err(malformed)?;
        let (name, pos) = cursor.read_prefixed_utf8(5).map_err(malformed)?;
        let (type_name, pos) = cursor.read_prefixed_utf8(pos).map_err(malformed)?;
        let (metadata, _) = cursor.read_prefixed_utf8(pos).map_err(malformed)?;

        Ok(StartRecordData {
            entry,
            name: name.into_owned(),
            type_name: type_name.into_owned(),
            metadata: metadata.into_owned(),
        })
    }

    /// Parse a finish control record, returning the retired entry id.
    pub fn finish_entry(&self) -> Result<u32> {
        let cursor = self.expect_control(ControlType::Finish)?;
        if self.size() != FINISH_PAYLOAD_LEN {
            return Err(CodecError::invalid_control(
                "finish",
                format!(
                    "payload length {} (expected {FINISH_PAYLOAD_LEN})",
                    self.size()
                ),
            ));
        }
        cursor
            .read_u32_le(1)
            .map_err(|e| CodecError::invalid_control("finish", e.to_string()))
    }

    /// Parse a set-metadata control record.
    pub fn set_metadata_data(&self) -> Result<MetadataRecordData> {
        let cursor = self.expect_control(ControlType::SetMetadata)?;
        let malformed = |e: CodecError| CodecError::invalid_control("set-metadata", e.to_string());

        let entry = cursor.read_u32_le(1).map_err(malformed)?;
        let (metadata, _) = cursor.read_prefixed_utf8(5).map_err(malformed)?;

        Ok(MetadataRecordData {
            entry,
            metadata: metadata.into_owned(),
        })
    }

    // ========================================================================
    // Typed data access
    // ========================================================================

    /// Payload as a boolean (exactly 1 byte).
    pub fn get_boolean(&self) -> Option<bool> {
        match self.payload {
            [b] => Some(*b != 0),
            _ => None,
        }
    }

    /// Payload as a signed 64-bit integer (exactly 8 bytes).
    pub fn get_integer(&self) -> Option<i64> {
        (self.size() == 8).then(|| LittleEndian::read_i64(self.payload))
    }

    /// Payload as a 32-bit float (exactly 4 bytes).
    pub fn get_float(&self) -> Option<f32> {
        (self.size() == 4).then(|| LittleEndian::read_f32(self.payload))
    }

    /// Payload as a 64-bit float (exactly 8 bytes).
    pub fn get_double(&self) -> Option<f64> {
        (self.size() == 8).then(|| LittleEndian::read_f64(self.payload))
    }

    /// Payload as UTF-8 text. Any length is valid.
    pub fn get_string(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.payload)
    }

    /// Payload as booleans, one byte each.
    pub fn get_boolean_array(&self) -> Vec<bool> {
        self.payload.iter().map(|b| *b != 0).collect()
    }

    /// Payload as signed 64-bit integers (length divisible by 8).
    pub fn get_integer_array(&self) -> Option<Vec<i64>> {
        (self.size() % 8 == 0).then(|| {
            self.payload
                .chunks_exact(8)
                .map(LittleEndian::read_i64)
                .collect()
        })
    }

    /// Payload as 32-bit floats (length divisible by 4).
    pub fn get_float_array(&self) -> Option<Vec<f32>> {
        (self.size() % 4 == 0).then(|| {
            self.payload
                .chunks_exact(4)
                .map(LittleEndian::read_f32)
                .collect()
        })
    }

    /// Payload as 64-bit floats (length divisible by 8).
    pub fn get_double_array(&self) -> Option<Vec<f64>> {
        (self.size() % 8 == 0).then(|| {
            self.payload
                .chunks_exact(8)
                .map(LittleEndian::read_f64)
                .collect()
        })
    }

    /// Payload as a counted list of length-prefixed strings.
    pub fn get_string_array(&self) -> Option<Vec<String>> {
        let cursor = ByteCursor::new(self.payload);
        let count = cursor.read_u32_le(0).ok()? as usize;
        // every element needs at least its 4-byte length prefix
        if count > cursor.remaining(4) / 4 {
            return None;
        }
        let mut values = Vec::with_capacity(count);
        let mut pos = 4;
        for _ in 0..count {
            let (text, next) = cursor.read_prefixed_utf8(pos).ok()?;
            values.push(text.into_owned());
            pos = next;
        }
        Some(values)
    }

    /// Copy of the payload bytes.
    pub fn get_raw(&self) -> Vec<u8> {
        self.payload.to_vec()
    }

    /// Interpret the payload according to a declared type.
    pub fn get_value(&self, tag: TypeTag) -> Option<LogValue> {
        match tag {
            TypeTag::Boolean => self.get_boolean().map(LogValue::Boolean),
            TypeTag::Int64 => self.get_integer().map(LogValue::Int),
            TypeTag::Float => self.get_float().map(LogValue::Float),
            TypeTag::Double => self.get_double().map(LogValue::Double),
            TypeTag::String => Some(LogValue::String(self.get_string().into_owned())),
            TypeTag::BooleanArray => Some(LogValue::BooleanArray(self.get_boolean_array())),
            TypeTag::Int64Array => self.get_integer_array().map(LogValue::IntArray),
            TypeTag::FloatArray => self.get_float_array().map(LogValue::FloatArray),
            TypeTag::DoubleArray => self.get_double_array().map(LogValue::DoubleArray),
            TypeTag::StringArray => self.get_string_array().map(LogValue::StringArray),
            TypeTag::Raw => Some(LogValue::Raw(self.get_raw())),
        }
    }
}

/// An owned record queued for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBuf {
    /// Entry id (0 for control records)
    pub entry: u32,
    /// Timestamp in microseconds
    pub timestamp: u64,
    /// Payload bytes
    pub payload: Vec<u8>,
}

impl RecordBuf {
    /// Create a record from raw parts.
    pub fn new(entry: u32, timestamp: u64, payload: Vec<u8>) -> Self {
        Self {
            entry,
            timestamp,
            payload,
        }
    }

    /// Borrow as a view.
    pub fn as_view(&self) -> RecordView<'_> {
        RecordView::new(self.entry, self.timestamp, &self.payload)
    }

    /// Start control record declaring `data.entry`.
    pub fn control_start(timestamp: u64, data: &StartRecordData) -> Self {
        let mut payload = Vec::with_capacity(
            MIN_START_PAYLOAD_LEN + data.name.len() + data.type_name.len() + data.metadata.len(),
        );
        payload.push(CONTROL_START);
        payload.extend_from_slice(&data.entry.to_le_bytes());
        put_prefixed_str(&mut payload, &data.name);
        put_prefixed_str(&mut payload, &data.type_name);
        put_prefixed_str(&mut payload, &data.metadata);
        Self::new(CONTROL_ENTRY, timestamp, payload)
    }

    /// Finish control record retiring `entry`.
    pub fn control_finish(timestamp: u64, entry: u32) -> Self {
        let mut payload = Vec::with_capacity(FINISH_PAYLOAD_LEN);
        payload.push(CONTROL_FINISH);
        payload.extend_from_slice(&entry.to_le_bytes());
        Self::new(CONTROL_ENTRY, timestamp, payload)
    }

    /// Set-metadata control record for `entry`.
    pub fn control_set_metadata(timestamp: u64, entry: u32, metadata: &str) -> Self {
        let mut payload = Vec::with_capacity(MIN_SET_METADATA_PAYLOAD_LEN + metadata.len());
        payload.push(CONTROL_SET_METADATA);
        payload.extend_from_slice(&entry.to_le_bytes());
        put_prefixed_str(&mut payload, metadata);
        Self::new(CONTROL_ENTRY, timestamp, payload)
    }

    pub fn boolean(entry: u32, timestamp: u64, value: bool) -> Self {
        Self::new(entry, timestamp, vec![u8::from(value)])
    }

    pub fn integer(entry: u32, timestamp: u64, value: i64) -> Self {
        Self::new(entry, timestamp, value.to_le_bytes().to_vec())
    }

    pub fn float(entry: u32, timestamp: u64, value: f32) -> Self {
        Self::new(entry, timestamp, value.to_le_bytes().to_vec())
    }

    pub fn double(entry: u32, timestamp: u64, value: f64) -> Self {
        Self::new(entry, timestamp, value.to_le_bytes().to_vec())
    }

    pub fn string(entry: u32, timestamp: u64, value: &str) -> Self {
        Self::new(entry, timestamp, value.as_bytes().to_vec())
    }

    pub fn boolean_array(entry: u32, timestamp: u64, values: &[bool]) -> Self {
        Self::new(
            entry,
            timestamp,
            values.iter().map(|v| u8::from(*v)).collect(),
        )
    }

    pub fn integer_array(entry: u32, timestamp: u64, values: &[i64]) -> Self {
        let mut payload = vec![0u8; values.len() * 8];
        LittleEndian::write_i64_into(values, &mut payload);
        Self::new(entry, timestamp, payload)
    }

    pub fn float_array(entry: u32, timestamp: u64, values: &[f32]) -> Self {
        let mut payload = vec![0u8; values.len() * 4];
        LittleEndian::write_f32_into(values, &mut payload);
        Self::new(entry, timestamp, payload)
    }

    pub fn double_array(entry: u32, timestamp: u64, values: &[f64]) -> Self {
        let mut payload = vec![0u8; values.len() * 8];
        LittleEndian::write_f64_into(values, &mut payload);
        Self::new(entry, timestamp, payload)
    }

    pub fn string_array<S: AsRef<str>>(entry: u32, timestamp: u64, values: &[S]) -> Self {
        let total: usize = values.iter().map(|s| 4 + s.as_ref().len()).sum();
        let mut payload = Vec::with_capacity(4 + total);
        payload.extend_from_slice(&(values.len() as u32).to_le_bytes());
        for value in values {
            put_prefixed_str(&mut payload, value.as_ref());
        }
        Self::new(entry, timestamp, payload)
    }

    pub fn raw(entry: u32, timestamp: u64, bytes: &[u8]) -> Self {
        Self::new(entry, timestamp, bytes.to_vec())
    }

    /// Data record carrying `value` in the payload shape of its type.
    pub fn from_value(entry: u32, timestamp: u64, value: &LogValue) -> Self {
        match value {
            LogValue::Boolean(v) => Self::boolean(entry, timestamp, *v),
            LogValue::Int(v) => Self::integer(entry, timestamp, *v),
            LogValue::Float(v) => Self::float(entry, timestamp, *v),
            LogValue::Double(v) => Self::double(entry, timestamp, *v),
            LogValue::String(v) => Self::string(entry, timestamp, v),
            LogValue::BooleanArray(v) => Self::boolean_array(entry, timestamp, v),
            LogValue::IntArray(v) => Self::integer_array(entry, timestamp, v),
            LogValue::FloatArray(v) => Self::float_array(entry, timestamp, v),
            LogValue::DoubleArray(v) => Self::double_array(entry, timestamp, v),
            LogValue::StringArray(v) => Self::string_array(entry, timestamp, v),
            LogValue::Raw(v) => Self::raw(entry, timestamp, v),
        }
    }
}

fn put_prefixed_str(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accessors() {
        assert_eq!(RecordBuf::boolean(1, 0, true).as_view().get_boolean(), Some(true));
        assert_eq!(RecordBuf::integer(1, 0, -42).as_view().get_integer(), Some(-42));
        assert_eq!(RecordBuf::float(1, 0, 1.25).as_view().get_float(), Some(1.25));
        assert_eq!(
            RecordBuf::double(1, 0, -3.5e100).as_view().get_double(),
            Some(-3.5e100)
        );
        assert_eq!(RecordBuf::string(1, 0, "héllo").as_view().get_string(), "héllo");
    }

    #[test]
    fn test_boolean_nonzero_is_true() {
        let view = RecordView::new(1, 0, &[0x02]);
        assert_eq!(view.get_boolean(), Some(true));
        let view = RecordView::new(1, 0, &[0x00]);
        assert_eq!(view.get_boolean(), Some(false));
    }

    #[test]
    fn test_size_mismatch_is_absent() {
        let two = RecordView::new(1, 0, &[1, 2]);
        assert_eq!(two.get_boolean(), None);
        assert_eq!(two.get_integer(), None);
        assert_eq!(two.get_float(), None);
        assert_eq!(two.get_double(), None);

        let twelve = [0u8; 12];
        let view = RecordView::new(1, 0, &twelve);
        assert_eq!(view.get_integer_array(), None);
        assert_eq!(view.get_double_array(), None);
        assert_eq!(view.get_float_array(), Some(vec![0.0; 3]));

        let empty = RecordView::new(1, 0, &[]);
        assert_eq!(empty.get_boolean(), None);
        assert_eq!(empty.get_integer_array(), Some(vec![]));
        assert_eq!(empty.get_string(), "");
        assert_eq!(empty.get_string_array(), None);
    }

    #[test]
    fn test_integer_array_payload_layout() {
        let record = RecordBuf::integer_array(3, 10, &[1, 2, 3]);
        assert_eq!(record.payload.len(), 24);
        assert_eq!(&record.payload[0..8], &1i64.to_le_bytes());
        assert_eq!(&record.payload[16..24], &3i64.to_le_bytes());
        assert_eq!(record.as_view().get_integer_array(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_array_accessors() {
        let bools = RecordBuf::boolean_array(1, 0, &[true, false, true]);
        assert_eq!(bools.payload, vec![1, 0, 1]);
        assert_eq!(bools.as_view().get_boolean_array(), vec![true, false, true]);

        let floats = RecordBuf::float_array(1, 0, &[0.5, -1.0]);
        assert_eq!(floats.as_view().get_float_array(), Some(vec![0.5, -1.0]));

        let doubles = RecordBuf::double_array(1, 0, &[f64::MAX, f64::MIN_POSITIVE]);
        assert_eq!(
            doubles.as_view().get_double_array(),
            Some(vec![f64::MAX, f64::MIN_POSITIVE])
        );
    }

    #[test]
    fn test_string_array() {
        let record = RecordBuf::string_array(1, 0, &["ab", "", "c"]);
        assert_eq!(
            record.payload,
            vec![3, 0, 0, 0, 2, 0, 0, 0, b'a', b'b', 0, 0, 0, 0, 1, 0, 0, 0, b'c']
        );
        assert_eq!(
            record.as_view().get_string_array(),
            Some(vec!["ab".to_string(), String::new(), "c".to_string()])
        );
    }

    #[test]
    fn test_string_array_malformed() {
        // count claims more elements than bytes can hold
        let view = RecordView::new(1, 0, &[200, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(view.get_string_array(), None);
        // element length runs past the end
        let view = RecordView::new(1, 0, &[1, 0, 0, 0, 9, 0, 0, 0, b'x']);
        assert_eq!(view.get_string_array(), None);
    }

    #[test]
    fn test_get_raw_copies() {
        let data = [9u8, 8, 7];
        let view = RecordView::new(4, 0, &data);
        let mut raw = view.get_raw();
        raw[0] = 0;
        assert_eq!(view.payload(), &[9, 8, 7]);
    }

    #[test]
    fn test_get_value_dispatch() {
        let record = RecordBuf::double(1, 0, 2.5);
        let view = record.as_view();
        assert_eq!(view.get_value(TypeTag::Double), Some(LogValue::Double(2.5)));
        assert_eq!(view.get_value(TypeTag::Int64), Some(LogValue::Int(2.5f64.to_bits() as i64)));
        assert_eq!(view.get_value(TypeTag::Boolean), None);
        assert_eq!(
            view.get_value(TypeTag::Raw),
            Some(LogValue::Raw(2.5f64.to_le_bytes().to_vec()))
        );
    }

    #[test]
    fn test_from_value_matches_type_tag() {
        let values = [
            LogValue::Boolean(false),
            LogValue::Int(i64::MIN),
            LogValue::Float(3.0),
            LogValue::Double(-0.0),
            LogValue::String("x".into()),
            LogValue::BooleanArray(vec![true]),
            LogValue::IntArray(vec![7, -7]),
            LogValue::FloatArray(vec![]),
            LogValue::DoubleArray(vec![1.0]),
            LogValue::StringArray(vec!["a".into(), "bc".into()]),
            LogValue::Raw(vec![1, 2, 3]),
        ];
        for value in values {
            let record = RecordBuf::from_value(5, 1, &value);
            let decoded = record.as_view().get_value(value.type_tag()).unwrap();
            assert!(decoded.bit_eq(&value), "{value:?} != {decoded:?}");
        }
    }

    #[test]
    fn test_control_start_round_trip() {
        let data = StartRecordData::new(7, "/drive/speed", "double", "{\"unit\":\"m/s\"}");
        let record = RecordBuf::control_start(100, &data);
        let view = record.as_view();
        assert!(view.is_control());
        assert!(view.is_start());
        assert!(!view.is_finish());
        assert_eq!(view.control_type(), Some(ControlType::Start));
        assert_eq!(view.start_data().unwrap(), data);
        assert_eq!(data.type_tag(), TypeTag::Double);
    }

    #[test]
    fn test_control_finish_and_metadata() {
        let finish = RecordBuf::control_finish(5, 9);
        assert_eq!(finish.payload.len(), 5);
        assert!(finish.as_view().is_finish());
        assert_eq!(finish.as_view().finish_entry().unwrap(), 9);

        let meta = RecordBuf::control_set_metadata(6, 9, "new");
        assert!(meta.as_view().is_set_metadata());
        assert_eq!(
            meta.as_view().set_metadata_data().unwrap(),
            MetadataRecordData {
                entry: 9,
                metadata: "new".into()
            }
        );
    }

    #[test]
    fn test_control_accessor_contract_errors() {
        let data = RecordBuf::integer(3, 0, 1);
        assert!(matches!(
            data.as_view().start_data(),
            Err(CodecError::NotAControlRecord { entry: 3 })
        ));

        let finish = RecordBuf::control_finish(0, 1);
        assert!(matches!(
            finish.as_view().start_data(),
            Err(CodecError::InvalidControlRecord { kind: "start", .. })
        ));

        // finish with trailing byte
        let long_finish = RecordView::new(0, 0, &[1, 1, 0, 0, 0, 0]);
        assert!(!long_finish.is_finish());
        assert!(long_finish.finish_entry().is_err());

        // start whose name length runs off the end
        let truncated = RecordView::new(0, 0, &[0, 1, 0, 0, 0, 50, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(truncated.is_start());
        assert!(truncated.start_data().is_err());

        let unknown = RecordView::new(0, 0, &[9]);
        assert_eq!(unknown.control_type(), None);
        assert!(unknown.set_metadata_data().is_err());
    }

    #[test]
    fn test_record_span_view() {
        let buffer = [0u8, 1, 2, 3, 4, 5];
        let record = Record {
            entry: 2,
            timestamp: 9,
            offset: 0,
            payload_offset: 2,
            payload_len: 3,
        };
        assert_eq!(record.payload_range(), 2..5);
        assert_eq!(record.end_offset(), 5);
        assert_eq!(record.view(&buffer).payload(), &[2, 3, 4]);
        assert_eq!(record.view(&buffer[..3]).payload(), &[] as &[u8]);
    }
}
