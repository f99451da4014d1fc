//! Activation records

use super::value::Value;
use crate::ast::{Location, SourceId, Span};

/// Local variable slots of one function activation.
///
/// Slot indices are assigned by the node builder; `None` marks a slot that
/// has not been written yet, which is distinct from holding `Null`.
#[derive(Debug)]
pub struct Frame {
    slots: Vec<Option<Value>>,
    source: SourceId,
}

impl Frame {
    pub fn new(size: usize, source: SourceId) -> Self {
        Frame {
            slots: vec![None; size],
            source,
        }
    }

    /// Frame with the first slots bound to the call arguments
    pub fn with_args(size: usize, source: SourceId, args: Vec<Value>) -> Self {
        let mut frame = Frame::new(size.max(args.len()), source);
        for (slot, arg) in frame.slots.iter_mut().zip(args) {
            *slot = Some(arg);
        }
        frame
    }

    pub fn read(&self, slot: usize) -> Option<&Value> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn write(&mut self, slot: usize, value: Value) {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(value);
    }

    /// Location of a node of the function this frame runs
    pub fn locate(&self, span: Span) -> Location {
        Location::new(self.source, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_slot_is_not_null() {
        let frame = Frame::new(2, SourceId(0));
        assert!(frame.read(0).is_none());
        assert!(frame.read(5).is_none());
    }

    #[test]
    fn test_write_then_read() {
        let mut frame = Frame::new(1, SourceId(0));
        frame.write(0, Value::Null);
        assert_eq!(frame.read(0), Some(&Value::Null));
        frame.write(0, Value::int(7));
        assert_eq!(frame.read(0), Some(&Value::int(7)));
    }

    #[test]
    fn test_args_prepopulate_leading_slots() {
        let frame = Frame::with_args(3, SourceId(0), vec![Value::int(1), Value::int(2)]);
        assert_eq!(frame.read(0), Some(&Value::int(1)));
        assert_eq!(frame.read(1), Some(&Value::int(2)));
        assert!(frame.read(2).is_none());
    }

    #[test]
    fn test_locate_uses_frame_source() {
        let frame = Frame::new(0, SourceId(3));
        let location = frame.locate(Span::new(4, 9));
        assert_eq!(location.source, SourceId(3));
        assert_eq!(location.span, Span::new(4, 9));
    }
}
