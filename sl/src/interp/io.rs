//! In-memory output sink

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Cloneable output buffer; every clone appends to the same bytes
#[derive(Debug, Clone, Default)]
pub struct SharedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let output = SharedOutput::new();
        let mut writer = output.clone();
        write!(writer, "a").unwrap();
        writeln!(writer, "b").unwrap();
        assert_eq!(output.contents(), "ab\n");
        assert_eq!(writer.contents(), output.contents());
    }
}
