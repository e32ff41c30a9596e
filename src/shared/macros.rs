/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result` or logs the error and exits. Startup-only: the
/// running simulation never terminates on a bad command.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                error!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    };
}
