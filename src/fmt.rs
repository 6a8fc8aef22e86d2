//! Logging macros.
//!
//! With the `defmt-03` feature the macros forward to `defmt`. Host test builds
//! print to stdout; every other build expands to nothing (the arguments are
//! still type-checked through `format_args!`).

#![allow(unused_macros)]

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-03")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt-03"), test))]
        ::std::println!("[INFO] {}", ::std::format!($($arg)*));

        #[cfg(not(any(feature = "defmt-03", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-03")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt-03"), test))]
        ::std::println!("[WARN] {}", ::std::format!($($arg)*));

        #[cfg(not(any(feature = "defmt-03", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt-03")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt-03"), test))]
        ::std::println!("[DEBUG] {}", ::std::format!($($arg)*));

        #[cfg(not(any(feature = "defmt-03", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
