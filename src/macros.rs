//! `format!`-style logging macros over the facade's formatted functions.

/// Formatted debug entry through the process-wide logger.
///
/// ```
/// logfacade::debugf!("cache warmed in {}ms", 12);
/// ```
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::debugf(::std::format_args!($($arg)+))
    };
}

/// Formatted info entry through the process-wide logger.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::infof(::std::format_args!($($arg)+))
    };
}

/// Formatted warn entry through the process-wide logger.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::warnf(::std::format_args!($($arg)+))
    };
}

/// Formatted error entry through the process-wide logger.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::errorf(::std::format_args!($($arg)+))
    };
}

/// Formatted Fatal entry. Ends the process after the entry is written; see
/// [`fatal`](crate::fatal).
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::fatalf(::std::format_args!($($arg)+))
    };
}
