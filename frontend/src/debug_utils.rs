// Area-gated console logging
//
// In the browser everything goes through zoon's console printing. Host-side
// unit tests have no JS console, so the same macros fall back to std there.

pub const DEBUG_MAP_VIEW: bool = false;
pub const DEBUG_POSITION: bool = false;

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => { zoon::println!($($arg)*) };
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => { std::println!($($arg)*) };
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => { zoon::eprintln!($($arg)*) };
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => { std::eprintln!($($arg)*) };
}

/// Logs only when the area's `DEBUG_*` flag is on.
#[macro_export]
macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            $crate::console_log!($($arg)*);
        }
    };
}

/// Critical logging - always prints (errors and important state changes only)
pub fn debug_critical(message: &str) {
    console_error!("[CRITICAL] {}", message);
}
