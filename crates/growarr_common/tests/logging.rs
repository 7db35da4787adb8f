//! Installs the process-wide logger, so it lives in its own test binary.

use std::{
    io,
    sync::Arc,
};

use growarr_common::{collections::GrowableArray, growarr};
use growarr_logging::{set_logger, LogLevel, Logger};
use parking_lot::Mutex;

static LOGGER: Logger = Logger::new();

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn reallocations_and_failures_are_logged() {
    let buffer = SharedBuffer::default();
    LOGGER.set_log_to_console(false);
    LOGGER.set_always_flush(true);
    LOGGER.set_max_level(LogLevel::Debug);
    assert!(LOGGER.add_writer(Box::new(buffer.clone())).is_ok());
    set_logger(&LOGGER);

    let mut arr = GrowableArray::new();
    arr.push(1u32);
    arr.push(2);

    let mut big = growarr![1u64];
    assert!(big.try_reserve(usize::MAX).is_err());

    let out = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
    assert!(out.contains("[Collections(RawArray)]"));
    assert!(out.contains("Grew from 0 to 1 elements"));
    assert!(out.contains("Grew from 1 to 2 elements"));
    assert!(out.contains("Capacity overflow"));
}
