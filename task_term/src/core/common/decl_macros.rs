// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Wrap the given value (or unit when none is given) in `Ok`. Saves a little noise at
/// the end of functions that return a [`Result`].
///
/// ```
/// use task_term::ok;
///
/// fn unit() -> std::io::Result<()> { ok!() }
/// fn value() -> std::io::Result<u8> { ok!(7) }
///
/// assert!(unit().is_ok());
/// assert_eq!(value().unwrap(), 7);
/// ```
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}
