use std::io::{BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use super::{ActivationCallback, NotificationSink, NotifyError, Platform};
use crate::models::NotificationRequest;

const APP_NAME: &str = "A1 Tools";

/// Action key `notify-send --wait` prints when the notification body is clicked
const DEFAULT_ACTION: &str = "default";

/// Shows notifications through the desktop's own notifier:
/// `notify-send` on Linux, `osascript` on macOS, a PowerShell balloon tip on
/// Windows.
///
/// Each notifier process is watched on a short-lived thread that reaps it.
/// On Linux, when an activation callback is set, the notification carries a
/// default action and a click hands the routing payload to the callback.
/// The other platforms' notifiers report no activation.
pub struct DesktopSink {
    platform: Platform,
    on_activate: Option<ActivationCallback>,
}

impl DesktopSink {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            on_activate: None,
        }
    }

    pub fn with_activation(platform: Platform, on_activate: ActivationCallback) -> Self {
        Self {
            platform,
            on_activate: Some(on_activate),
        }
    }

    fn reports_activation(&self) -> bool {
        self.on_activate.is_some() && self.platform == Platform::Linux
    }

    /// Build the notifier command for a request, if the platform has one
    pub fn command_for(&self, request: &NotificationRequest) -> Option<Command> {
        let title = request.title.as_str();
        let body = request.body.as_str();

        match self.platform {
            Platform::Linux => {
                let mut cmd = Command::new("notify-send");
                cmd.arg("--app-name").arg(APP_NAME);
                if self.reports_activation() {
                    cmd.arg(format!("--action={}=Open", DEFAULT_ACTION))
                        .arg("--wait");
                }
                cmd.arg(title).arg(body);
                Some(cmd)
            }
            Platform::MacOs => {
                let script = format!(
                    "display notification \"{}\" with title \"{}\"",
                    applescript_escape(body),
                    applescript_escape(title)
                );
                let mut cmd = Command::new("osascript");
                cmd.arg("-e").arg(script);
                Some(cmd)
            }
            Platform::Windows => {
                let script = format!(
                    "[void][System.Reflection.Assembly]::LoadWithPartialName('System.Windows.Forms');\
                     $n=New-Object System.Windows.Forms.NotifyIcon;\
                     $n.Icon=[System.Drawing.SystemIcons]::Information;\
                     $n.Visible=$true;\
                     $n.ShowBalloonTip(5000,'{}','{}',[System.Windows.Forms.ToolTipIcon]::None)",
                    powershell_escape(title),
                    powershell_escape(body)
                );
                let mut cmd = Command::new("powershell");
                cmd.args(["-NoProfile", "-NonInteractive", "-Command"])
                    .arg(script);
                Some(cmd)
            }
            Platform::Android | Platform::Ios | Platform::Other => None,
        }
    }
}

impl NotificationSink for DesktopSink {
    fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let mut cmd = self
            .command_for(request)
            .ok_or(NotifyError::Unsupported(self.platform))?;

        let on_activate = if self.reports_activation() {
            self.on_activate.clone()
        } else {
            None
        };
        let stdout = if on_activate.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let program = cmd.get_program().to_string_lossy().to_string();
        let child = cmd
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| NotifyError::Spawn {
                program: program.clone(),
                source,
            })?;

        watch_notifier(child, request.payload(), on_activate)
            .map_err(|source| NotifyError::Spawn { program, source })?;
        Ok(())
    }
}

/// Wait for a notifier process on its own thread so it never lingers as a
/// zombie. With a callback, every `default` line on the child's stdout is an
/// activation of the notification identified by `payload`.
pub(crate) fn watch_notifier(
    mut child: Child,
    payload: String,
    on_activate: Option<ActivationCallback>,
) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    std::thread::Builder::new()
        .name("notifier-wait".to_string())
        .spawn(move || {
            if let (Some(callback), Some(stdout)) = (on_activate, child.stdout.take()) {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    if line.trim() == DEFAULT_ACTION {
                        tracing::debug!(payload = %payload, "desktop notification activated");
                        callback(&payload);
                    }
                }
            }
            match child.wait() {
                Ok(status) => Some(status),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to reap notifier process");
                    None
                }
            }
        })
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn powershell_escape(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationRoute;
    use std::sync::Arc;

    fn request(title: &str, body: &str) -> NotificationRequest {
        NotificationRequest {
            notification_id: 1,
            title: title.to_string(),
            body: body.to_string(),
            route: NotificationRoute::Direct {
                username: "dave".to_string(),
            },
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_linux_command() {
        let sink = DesktopSink::new(Platform::Linux);
        let cmd = sink.command_for(&request("New message from dave", "hi")).unwrap();
        assert_eq!(cmd.get_program(), "notify-send");
        assert_eq!(
            args(&cmd),
            vec!["--app-name", "A1 Tools", "New message from dave", "hi"]
        );
    }

    #[test]
    fn test_macos_command_escapes_quotes() {
        let sink = DesktopSink::new(Platform::MacOs);
        let cmd = sink.command_for(&request("Crew", "say \"hi\"")).unwrap();
        assert_eq!(cmd.get_program(), "osascript");
        assert_eq!(
            args(&cmd)[1],
            "display notification \"say \\\"hi\\\"\" with title \"Crew\""
        );
    }

    #[test]
    fn test_windows_command_escapes_single_quotes() {
        let sink = DesktopSink::new(Platform::Windows);
        let cmd = sink.command_for(&request("Dave's crew", "ok")).unwrap();
        assert_eq!(cmd.get_program(), "powershell");
        assert!(args(&cmd)[3].contains("'Dave''s crew'"));
    }

    #[test]
    fn test_linux_command_with_activation_waits_for_action() {
        let sink = DesktopSink::with_activation(Platform::Linux, Arc::new(|_: &str| {}));
        let cmd = sink.command_for(&request("Crew", "mia: done")).unwrap();
        assert_eq!(
            args(&cmd),
            vec!["--app-name", "A1 Tools", "--action=default=Open", "--wait", "Crew", "mia: done"]
        );

        // osascript cannot report clicks, so nothing extra is passed
        let sink = DesktopSink::with_activation(Platform::MacOs, Arc::new(|_: &str| {}));
        assert_eq!(args(&sink.command_for(&request("t", "b")).unwrap()).len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_notifier_is_reaped() {
        let child = Command::new("sh")
            .args(["-c", "exit 0"])
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let status = watch_notifier(child, "chat:dave".to_string(), None)
            .unwrap()
            .join()
            .unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[cfg(unix)]
    #[test]
    fn test_default_action_forwards_payload() {
        let clicked = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
        let sink_clicked = clicked.clone();
        let callback: ActivationCallback =
            Arc::new(move |payload: &str| sink_clicked.lock().push(payload.to_string()));

        // What `notify-send --wait` prints: the invoked action, if any
        let child = Command::new("sh")
            .args(["-c", "echo default"])
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let status = watch_notifier(child, "group:7".to_string(), Some(callback.clone()))
            .unwrap()
            .join()
            .unwrap();
        assert!(status.is_some());
        assert_eq!(*clicked.lock(), vec!["group:7".to_string()]);

        // Dismissed without a click
        let child = Command::new("sh")
            .args(["-c", "true"])
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        watch_notifier(child, "chat:dave".to_string(), Some(callback))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(clicked.lock().len(), 1);
    }

    #[test]
    fn test_mobile_platform_is_unsupported() {
        let sink = DesktopSink::new(Platform::Ios);
        assert!(sink.command_for(&request("t", "b")).is_none());
        assert!(matches!(
            sink.dispatch(&request("t", "b")),
            Err(NotifyError::Unsupported(Platform::Ios))
        ));
    }
}
