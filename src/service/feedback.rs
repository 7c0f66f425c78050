use inquire::Confirm;

/// Transient user-facing messages, the terminal's version of a toast.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Asks the user to confirm a destructive action.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        log::info!("event=notify kind=success message={message:?}");
        println!("✔ {}", message);
    }

    fn error(&self, message: &str) {
        log::info!("event=notify kind=error message={message:?}");
        eprintln!("✖ {}", message);
    }
}

pub struct InquireConfirmer;

impl Confirmer for InquireConfirmer {
    fn confirm(&self, message: &str) -> bool {
        match Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => answer,
            Err(err) => {
                // Esc and Ctrl-C both read as "no".
                log::debug!("event=confirm_aborted error={err}");
                false
            }
        }
    }
}

/// Used for `--yes`.
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
