//! Desktop notification delivery.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use super::Notification;

/// Errors from a notification backend. Always logged and swallowed by the caller.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No notification backend exists for this platform.
    #[error("desktop notifications are not supported on {platform}")]
    Unsupported {
        /// Target OS name.
        platform: &'static str,
    },

    /// The notification helper could not be started.
    #[error("could not run {program}: {source}")]
    Spawn {
        /// Helper program name.
        program: &'static str,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The notification helper exited with a failure status.
    #[error("{program} exited with {status}")]
    Failed {
        /// Helper program name.
        program: &'static str,
        /// Exit status as reported by the OS.
        status: String,
    },
}

/// A fire-and-forget notification display.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the notification could not be shown.
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Shows notifications through the platform's command-line helper
/// (`notify-send` on Linux/BSD, `osascript` on macOS).
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    /// Creates a notifier that labels notifications with `app_name` where supported.
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let (program, args) = helper_invocation(&self.app_name, notification)?;
        debug!(program, title = %notification.title, "showing notification");

        let status = crate::process::command(program)
            .args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|source| NotifyError::Spawn { program, source })?;

        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Failed {
                program,
                status: status.to_string(),
            })
        }
    }
}

#[cfg(target_os = "macos")]
fn helper_invocation(
    _app_name: &str,
    notification: &Notification,
) -> Result<(&'static str, Vec<String>), NotifyError> {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        applescript_escape(&notification.message),
        applescript_escape(&notification.title)
    );
    Ok(("osascript", vec!["-e".to_string(), script]))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn helper_invocation(
    app_name: &str,
    notification: &Notification,
) -> Result<(&'static str, Vec<String>), NotifyError> {
    Ok(("notify-send", notify_send_args(app_name, notification)))
}

#[cfg(not(unix))]
fn helper_invocation(
    _app_name: &str,
    _notification: &Notification,
) -> Result<(&'static str, Vec<String>), NotifyError> {
    Err(NotifyError::Unsupported {
        platform: std::env::consts::OS,
    })
}

#[cfg_attr(any(target_os = "macos", not(unix)), allow(dead_code))]
fn notify_send_args(app_name: &str, notification: &Notification) -> Vec<String> {
    vec![
        format!("--app-name={app_name}"),
        format!("--expire-time={}", notification.timeout.as_millis()),
        "--".to_string(),
        notification.title.clone(),
        notification.message.clone(),
    ]
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
