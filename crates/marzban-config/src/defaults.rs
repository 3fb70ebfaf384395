//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `marzban_core::defaults`.

use marzban_core::defaults;

/// Generate default value functions that forward to marzban_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_panel_timeout_secs => DEFAULT_PANEL_TIMEOUT_SECS: u64,
    default_renewal_days       => DEFAULT_RENEWAL_DAYS: i64,
}

default_string_fns! {
    default_listen          => DEFAULT_LISTEN,
    default_inbound         => DEFAULT_INBOUND_TAG,
}
