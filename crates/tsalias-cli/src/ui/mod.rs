//! Terminal status output.
//!
//! Status lines go to stderr so stdout stays free for piping.
//!
//! # Examples
//!
//! ```no_run
//! use tsalias_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Updated tsconfig.json");
//! ui::warning("Manual update required for vite.config.ts");
//! ```

mod messages;

pub use messages::{info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal detection on stderr.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support for status messages.
///
/// `--no-color` wins over everything else. Call once, early in `main`.
pub fn init_colors(no_color: bool) {
    owo_colors::set_override(!no_color && should_use_color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_no_color_env_disables_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
        }
        assert!(!should_use_color());
        unsafe {
            std::env::remove_var("NO_COLOR");
        }
    }

    #[test]
    #[serial]
    fn test_force_color_enables_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_color());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }
}
