/// Conditionally print a formatted message to stdout.
///
/// Evaluates `$cond` at runtime; if `true`, calls [`println!`] with the
/// remaining arguments unchanged. With the `verbose` feature disabled the
/// crate's `VERBOSE` flag is a constant `false` and the optimizer drops the
/// call entirely.
///
/// # Example
///
/// ```rust
/// use speedup_report::print_if;
///
/// let path = "charts/speedup.png";
/// print_if!(true, "Saved speedup chart: {path}");
/// ```
#[macro_export]
macro_rules! print_if {
    ($cond:expr, $($arg:tt)*) => {
        if $cond {
            println!($($arg)*);
        }
    };
}
