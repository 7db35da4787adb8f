use growarr_common::{
    collections::{reserve, GrowableArray, TryReserveError},
    growarr,
    mem::{set_thread_allocation_limit, thread_memory_stats},
};
use growarr_logging::{log_error, log_info, set_logger, LogCategory, LogLevel, Logger};

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

static LOGGER: Logger = Logger::new();

fn main() {
    set_logger(&LOGGER);
    LOGGER.set_max_level(LogLevel::Debug);

    actual_main();

    let stats = thread_memory_stats();
    log_info!(LOG_CAT, "Memory: {} live allocations ({} bytes), peak {} bytes, {} total, {} failed",
        stats.live_allocations, stats.live_bytes, stats.peak_bytes, stats.total_allocations, stats.failed_allocations);
    LOGGER.flush();
}

fn actual_main() {
    let mut squares = GrowableArray::new();
    for i in 0..10u64 {
        squares.push(i * i);
    }
    log_info!(LOG_CAT, "squares: {squares:?} (len {}, capacity {})", squares.len(), squares.capacity());

    let next = squares.insert(3, 1000);
    log_info!(LOG_CAT, "after insert at {next}: {squares:?}");
    let next = squares.erase(next);
    log_info!(LOG_CAT, "after erase, index {next} holds {:?}", squares.at(next));

    squares.resize(4);
    log_info!(LOG_CAT, "resized: {squares:?} (capacity {})", squares.capacity());

    let names: GrowableArray<&str> = reserve(8).into();
    log_info!(LOG_CAT, "reserved: len {}, capacity {}", names.len(), names.capacity());

    let a = growarr![1, 2, 3];
    let b = growarr![1, 2, 4];
    log_info!(LOG_CAT, "{a:?} < {b:?} = {}, {a:?} >= {b:?} = {}", a < b, a >= b);

    match a.at(3) {
        Ok(value) => log_info!(LOG_CAT, "a[3] = {value}"),
        Err(err) => log_error!(LOG_CAT, "{err}"),
    }

    // Show that a failed reallocation leaves the array untouched
    let mut full = growarr![1u32, 2, 3, 4];
    set_thread_allocation_limit(Some(thread_memory_stats().live_bytes));
    let result: Result<(), TryReserveError> = full.try_push(5);
    set_thread_allocation_limit(None);
    if let Err(err) = result {
        log_error!(LOG_CAT, "push failed: {err}, array is still {full:?}");
    }
}
