use super::hub::dispatch;
use crate::constants::PANIC_NAME;
use crate::report::FailureInput;
use serde_json::json;
use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo};
use std::sync::Once;

static INSTALL: Once = Once::new();

/// Chain a hook in front of the current panic hook. The previous hook runs
/// first, then the panic is dispatched to the hub. Installs at most once.
pub fn install() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            previous(info);
            dispatch(panic_record(info));
        }));
        tracing::debug!("Panic hook installed");
    });
}

pub fn is_installed() -> bool {
    INSTALL.is_completed()
}

fn panic_record(info: &PanicHookInfo<'_>) -> FailureInput {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Box<dyn Any>".to_string());

    let mut stack = String::new();
    if let Some(location) = info.location() {
        stack.push_str(&format!("at {}:{}:{}\n", location.file(), location.line(), location.column()));
    }
    stack.push_str(&Backtrace::force_capture().to_string());

    FailureInput::Structured(json!({
        "name": PANIC_NAME,
        "message": message,
        "stack": stack,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::on_unhandled_error;
    use serial_test::serial;
    use std::sync::{Arc, Mutex};

    #[test]
    #[serial]
    fn test_panic_is_dispatched_after_previous_hook() {
        install();
        assert!(is_installed());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let _subscription = on_unhandled_error(move |failure| {
            if let FailureInput::Structured(value) = failure {
                record.lock().unwrap().push(value.clone());
            }
        });

        let result = std::panic::catch_unwind(|| panic!("kaboom {}", 7));
        assert!(result.is_err());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["name"], "panic");
        assert_eq!(seen[0]["message"], "kaboom 7");
        assert!(seen[0]["stack"].as_str().unwrap().starts_with("at "));
    }

    #[test]
    #[serial]
    fn test_install_is_idempotent() {
        install();
        install();
        assert!(is_installed());
    }
}
