//! Access to the focused desktop window.
//!
//! Title lookup is platform specific: the Win32 API on Windows, AppleScript
//! on macOS and `xdotool` on other Unix desktops. Closing the window is a
//! simulated close-tab keystroke sent through `rdev`, which works for
//! browsers and most editors.

use anyhow::{anyhow, Result};
use rdev::{simulate, EventType, Key};
use std::thread;
use std::time::Duration;

/// Delay between simulated key events; some platforms drop events sent back to back.
const KEY_EVENT_GAP: Duration = Duration::from_millis(20);

#[cfg(target_os = "macos")]
const CLOSE_MODIFIER: Key = Key::MetaLeft;
#[cfg(not(target_os = "macos"))]
const CLOSE_MODIFIER: Key = Key::ControlLeft;

pub trait FocusSource: Send {
    /// Title of the focused window, trimmed. `None` when nothing is focused
    /// or the title is empty.
    fn active_title(&self) -> Result<Option<String>>;

    /// Best-effort close of the focused window or tab.
    fn close_active(&self) -> Result<()>;
}

pub struct SystemFocus;

impl SystemFocus {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusSource for SystemFocus {
    fn active_title(&self) -> Result<Option<String>> {
        Ok(platform::foreground_title()?.and_then(|title| clean_title(&title)))
    }

    fn close_active(&self) -> Result<()> {
        let sequence = [
            EventType::KeyPress(CLOSE_MODIFIER),
            EventType::KeyPress(Key::KeyW),
            EventType::KeyRelease(Key::KeyW),
            EventType::KeyRelease(CLOSE_MODIFIER),
        ];
        for event in &sequence {
            simulate(event).map_err(|e| anyhow!("could not simulate {:?}: {:?}", event, e))?;
            thread::sleep(KEY_EVENT_GAP);
        }
        Ok(())
    }
}

/// Trims a raw title; empty titles count as no window.
fn clean_title(raw: &str) -> Option<String> {
    let title = raw.trim();
    (!title.is_empty()).then(|| title.to_string())
}

#[cfg(windows)]
mod platform {
    use anyhow::Result;
    use winapi::um::winuser::{GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW};

    pub fn foreground_title() -> Result<Option<String>> {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_null() {
                return Ok(None);
            }
            let len = GetWindowTextLengthW(hwnd);
            if len <= 0 {
                return Ok(None);
            }
            let mut buf = vec![0u16; len as usize + 1];
            let copied = GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32);
            buf.truncate(copied.max(0) as usize);
            Ok(Some(String::from_utf16_lossy(&buf)))
        }
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use anyhow::{bail, Result};
    use std::process::Command;

    const SCRIPT: &str = r#"
        tell application "System Events"
            set frontProc to first application process whose frontmost is true
            try
                return name of first window of frontProc
            on error
                return ""
            end try
        end tell
    "#;

    pub fn foreground_title() -> Result<Option<String>> {
        let output = Command::new("osascript").arg("-e").arg(SCRIPT).output()?;
        if !output.status.success() {
            bail!("osascript exited with {}", output.status);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

#[cfg(not(any(windows, target_os = "macos")))]
mod platform {
    use anyhow::Result;
    use std::process::Command;

    pub fn foreground_title() -> Result<Option<String>> {
        let output = Command::new("xdotool").args(["getactivewindow", "getwindowname"]).output()?;
        if !output.status.success() {
            // xdotool exits non-zero when no window has focus
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_title_trims_and_drops_empty() {
        assert_eq!(clean_title("  Reddit - Dive into anything \n"), Some("Reddit - Dive into anything".to_string()));
        assert_eq!(clean_title("   "), None);
        assert_eq!(clean_title(""), None);
    }
}
