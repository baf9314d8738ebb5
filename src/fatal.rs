//! Termination on contract violations.
//!
//! Unwrapping the wrong variant, dereferencing an empty [`Boxed`] or panicking
//! while a union's storage is vacant cannot be recovered from. With the `std`
//! feature the message is written to standard error and the process aborts.
//! Without it the violation panics from inside a drop guard, so an unwinding
//! runtime aborts on the nested panic instead of letting a caller catch it.
//!
//! [`Boxed`]: crate::Boxed

use core::{fmt, panic::Location};

#[cold]
#[inline(never)]
#[track_caller]
pub fn violation(args: fmt::Arguments<'_>) -> ! {
    violation_at(Location::caller(), args)
}

/// Reports a violation detected away from the call that caused it.
#[cold]
#[inline(never)]
pub fn violation_at(location: &Location<'_>, args: fmt::Arguments<'_>) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(%location, "{args}");

    terminate(args, location)
}

#[cfg(feature = "std")]
fn terminate(args: fmt::Arguments<'_>, location: &Location<'_>) -> ! {
    std::eprintln!("exl: {args} at {location}");
    std::process::abort()
}

#[cfg(not(feature = "std"))]
fn terminate(args: fmt::Arguments<'_>, location: &Location<'_>) -> ! {
    struct Abort;

    impl Drop for Abort {
        fn drop(&mut self) {
            panic!("exl: aborting after a contract violation")
        }
    }

    let _abort = Abort;
    panic!("exl: {args} at {location}")
}
