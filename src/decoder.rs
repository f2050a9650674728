//! Incremental decoding of the fixture array.
//!
//! The input is a single JSON array of records. [`RecordStream`] walks the
//! array one element at a time, so only the element being decoded is held in
//! memory; [`BatchStream`] groups those records into fixed-size batches and
//! observes cancellation between elements.

use std::io::{self, BufRead};

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::platform::CancellationToken;
use crate::record::Record;

/// Upper bound on the records reserved up front for a batch; larger batches
/// grow as records arrive.
const MAX_PREALLOCATED_RECORDS: usize = 4096;

/// A group of records handed to a worker as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub id: u64,
    pub records: Vec<Record>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    Start,
    FirstElement,
    NextElement,
    Done,
}

/// Lazy, non-restartable sequence of records read from a JSON array.
///
/// Any error ends the sequence: after yielding `Err`, the stream only
/// yields `None`.
pub struct RecordStream<R> {
    reader: R,
    state: ArrayState,
    decoded: usize,
}

impl<R: BufRead> RecordStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ArrayState::Start,
            decoded: 0,
        }
    }

    /// Number of records decoded so far.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let result = self.advance();
        if !matches!(result, Ok(Some(_))) {
            self.state = ArrayState::Done;
        }
        result
    }

    fn advance(&mut self) -> Result<Option<Record>> {
        if self.state == ArrayState::Start {
            self.open_array()?;
            self.state = ArrayState::FirstElement;
        }

        match self.state {
            ArrayState::Done => Ok(None),
            ArrayState::Start | ArrayState::FirstElement | ArrayState::NextElement => {
                let Some(next) = self.peek_significant()? else {
                    return Err(PipelineError::format(
                        self.decoded,
                        "unexpected end of input, expected ']'",
                    ));
                };
                match (self.state, next) {
                    (_, b']') => {
                        self.reader.consume(1);
                        Ok(None)
                    }
                    (ArrayState::NextElement, b',') => {
                        self.reader.consume(1);
                        self.decode_element().map(Some)
                    }
                    (ArrayState::NextElement, other) => Err(PipelineError::format(
                        self.decoded,
                        format!("expected ',' or ']' after record, found {:?}", other as char),
                    )),
                    _ => self.decode_element().map(Some),
                }
            }
        }
    }

    fn open_array(&mut self) -> Result<()> {
        match self.peek_significant()? {
            Some(b'[') => {
                self.reader.consume(1);
                Ok(())
            }
            Some(other) => Err(PipelineError::format(
                0,
                format!("expected '[' at start of input, found {:?}", other as char),
            )),
            None => Err(PipelineError::format(
                0,
                "empty input, expected '[' at start of input",
            )),
        }
    }

    fn decode_element(&mut self) -> Result<Record> {
        match self.peek_significant()? {
            Some(b'{') => {}
            Some(other) => {
                return Err(PipelineError::format(
                    self.decoded,
                    format!("expected '{{' at start of record, found {:?}", other as char),
                ))
            }
            None => {
                return Err(PipelineError::format(
                    self.decoded,
                    "unexpected end of input, expected a record",
                ))
            }
        }
        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        let record =
            Record::deserialize(&mut de).map_err(|e| PipelineError::from_json(self.decoded, e))?;
        self.decoded += 1;
        self.state = ArrayState::NextElement;
        Ok(record)
    }

    /// Skip JSON whitespace and peek at the next byte without consuming it.
    fn peek_significant(&mut self) -> Result<Option<u8>> {
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                return Ok(None);
            }
            let skip = buf
                .iter()
                .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
                .count();
            let next = buf.get(skip).copied();
            self.reader.consume(skip);
            if next.is_some() {
                return Ok(next);
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// How a [`BatchStream`] stopped producing batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The closing `]` was reached; every decoded record was emitted.
    Completed { records: usize, batches: u64 },
    /// Cancellation was observed; records of the unfinished batch were
    /// discarded and are not counted.
    Cancelled { records: usize, batches: u64 },
}

/// Groups a [`RecordStream`] into batches of `batch_size` records. The final
/// batch may be shorter but is always emitted.
pub struct BatchStream<R> {
    records: RecordStream<R>,
    batch_size: usize,
    cancel: CancellationToken,
    next_id: u64,
    emitted_records: usize,
    outcome: Option<DecodeOutcome>,
    failed: bool,
}

impl<R: BufRead> BatchStream<R> {
    pub fn new(reader: R, batch_size: usize, cancel: CancellationToken) -> Self {
        Self {
            records: RecordStream::new(reader),
            batch_size: batch_size.max(1),
            cancel,
            next_id: 0,
            emitted_records: 0,
            outcome: None,
            failed: false,
        }
    }

    /// Set once the stream is exhausted without error.
    pub fn outcome(&self) -> Option<DecodeOutcome> {
        self.outcome
    }

    fn finish(&mut self, cancelled: bool) {
        let (records, batches) = (self.emitted_records, self.next_id);
        self.outcome = Some(if cancelled {
            DecodeOutcome::Cancelled { records, batches }
        } else {
            DecodeOutcome::Completed { records, batches }
        });
    }

    fn emit(&mut self, records: Vec<Record>) -> Batch {
        let batch = Batch {
            id: self.next_id,
            records,
        };
        self.next_id += 1;
        self.emitted_records += batch.len();
        batch
    }
}

impl<R: BufRead> Iterator for BatchStream<R> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome.is_some() || self.failed {
            return None;
        }

        let mut records = Vec::with_capacity(self.batch_size.min(MAX_PREALLOCATED_RECORDS));
        loop {
            if self.cancel.is_cancelled() {
                self.finish(true);
                return None;
            }
            match self.records.next_record() {
                Ok(Some(record)) => {
                    records.push(record);
                    if records.len() == self.batch_size {
                        return Some(Ok(self.emit(records)));
                    }
                }
                Ok(None) => {
                    if records.is_empty() {
                        self.finish(false);
                        return None;
                    }
                    let batch = self.emit(records);
                    self.finish(false);
                    return Some(Ok(batch));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
