//! Key events, directional pad, buttons and package management

use super::dispatch::{sleep, Bridge, BridgeCommand, CommandOutput, CommandRunner};
use super::keycode;
use crate::config::TIMING_CONFIG;
use crate::error::Result;
use tracing::warn;

const DEFAULT_ACTION: &str = "android.intent.action.MAIN";
const DEFAULT_CATEGORY: &str = "android.intent.category.LAUNCHER";

/// Directional pad movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn keycode(self) -> u32 {
        match self {
            Self::Up => keycode::DPAD_UP,
            Self::Down => keycode::DPAD_DOWN,
            Self::Left => keycode::DPAD_LEFT,
            Self::Right => keycode::DPAD_RIGHT,
        }
    }
}

/// Post-action delay, falling back to the configured default
pub(crate) async fn settle(delay: Option<f64>) {
    sleep(delay.unwrap_or(TIMING_CONFIG.action.default_action_delay)).await;
}

impl<R: CommandRunner> Bridge<R> {
    pub(crate) async fn send_keyevent(&self, serial: &str, code: u32) -> Result<CommandOutput> {
        self.dispatch(
            &BridgeCommand::shell(["input", "keyevent"])
                .arg(code.to_string())
                .serial(Some(serial)),
        )
        .await
    }

    /// Send `num` key events; a failed event does not stop the rest
    pub(crate) async fn repeat_keyevent(&self, serial: &str, code: u32, num: u32) -> Result<()> {
        let mut first_error = None;
        for _ in 0..num {
            if let Err(e) = self.send_keyevent(serial, code).await {
                warn!(code, error = %e, "key event failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Send an Android KeyEvent by its integer code (e.g. 20 for DPAD_DOWN)
    pub async fn keyevent(
        &self,
        code: u32,
        serial: Option<&str>,
        delay: Option<f64>,
    ) -> Result<CommandOutput> {
        let serial = self.require_online(serial).await?;
        let output = self.send_keyevent(&serial, code).await?;
        settle(delay).await;
        Ok(output)
    }

    /// Move the directional pad `num` times
    pub async fn dpad(
        &self,
        direction: Direction,
        num: u32,
        serial: Option<&str>,
        delay: Option<f64>,
    ) -> Result<()> {
        let serial = self.require_online(serial).await?;
        let result = self.repeat_keyevent(&serial, direction.keycode(), num).await;
        settle(delay).await;
        result
    }

    pub async fn up(&self, num: u32, serial: Option<&str>, delay: Option<f64>) -> Result<()> {
        self.dpad(Direction::Up, num, serial, delay).await
    }

    pub async fn down(&self, num: u32, serial: Option<&str>, delay: Option<f64>) -> Result<()> {
        self.dpad(Direction::Down, num, serial, delay).await
    }

    pub async fn left(&self, num: u32, serial: Option<&str>, delay: Option<f64>) -> Result<()> {
        self.dpad(Direction::Left, num, serial, delay).await
    }

    pub async fn right(&self, num: u32, serial: Option<&str>, delay: Option<f64>) -> Result<()> {
        self.dpad(Direction::Right, num, serial, delay).await
    }

    /// Press the directional pad center, generally to activate a button
    pub async fn press(&self, serial: Option<&str>, delay: Option<f64>) -> Result<CommandOutput> {
        self.keyevent(keycode::DPAD_CENTER, serial, delay).await
    }

    pub async fn menu(&self, serial: Option<&str>, delay: Option<f64>) -> Result<CommandOutput> {
        self.keyevent(keycode::MENU, serial, delay).await
    }

    /// Press the back button `num` times
    pub async fn back(&self, num: u32, serial: Option<&str>, delay: Option<f64>) -> Result<()> {
        let serial = self.require_online(serial).await?;
        let result = self.repeat_keyevent(&serial, keycode::BACK, num).await;
        settle(delay).await;
        result
    }

    /// Move the cursor to the start of the focused field
    pub async fn move_home(&self, serial: Option<&str>, delay: Option<f64>) -> Result<CommandOutput> {
        self.keyevent(keycode::MOVE_HOME, serial, delay).await
    }

    /// Move the cursor to the end of the focused field
    pub async fn move_end(&self, serial: Option<&str>, delay: Option<f64>) -> Result<CommandOutput> {
        self.keyevent(keycode::MOVE_END, serial, delay).await
    }

    pub async fn page_down(&self, serial: Option<&str>, delay: Option<f64>) -> Result<CommandOutput> {
        self.keyevent(keycode::PAGE_DOWN, serial, delay).await
    }

    /// Install an APK from the host
    pub async fn install(&self, apk: &str, serial: Option<&str>) -> Result<CommandOutput> {
        let serial = self.require_online(serial).await?;
        self.dispatch(
            &BridgeCommand::new("install")
                .arg(apk)
                .serial(Some(&serial))
                .echo(true),
        )
        .await
    }

    /// Uninstall a package (e.g. com.google.contacts)
    pub async fn uninstall(&self, package: &str, serial: Option<&str>) -> Result<CommandOutput> {
        let serial = self.require_online(serial).await?;
        self.dispatch(
            &BridgeCommand::new("uninstall")
                .arg(package)
                .serial(Some(&serial))
                .echo(true),
        )
        .await
    }

    /// Uninstall `package`, then install `apk`; returns the install output
    pub async fn reinstall(
        &self,
        package: &str,
        apk: &str,
        serial: Option<&str>,
    ) -> Result<CommandOutput> {
        let serial = self.require_online(serial).await?;
        let removed = self.uninstall(package, Some(&serial)).await?;
        if !removed.stdout.contains("Success") {
            warn!(package, output = %removed.stdout, "uninstall did not report success");
        }
        self.install(apk, Some(&serial)).await
    }

    /// Start an activity by component name (`package/.Activity`)
    pub async fn activity(
        &self,
        component: &str,
        action: Option<&str>,
        category: Option<&str>,
        serial: Option<&str>,
    ) -> Result<CommandOutput> {
        let serial = self.require_online(serial).await?;
        self.dispatch(
            &BridgeCommand::shell(["am", "start", "-a"])
                .arg(action.unwrap_or(DEFAULT_ACTION))
                .arg("-c")
                .arg(category.unwrap_or(DEFAULT_CATEGORY))
                .arg("-n")
                .arg(component)
                .serial(Some(&serial))
                .echo(true),
        )
        .await
    }

    /// Remove a file on the device; directories need `recursive`
    pub async fn remove(
        &self,
        target: &str,
        recursive: bool,
        serial: Option<&str>,
    ) -> Result<CommandOutput> {
        let serial = self.require_online(serial).await?;
        let mut command = BridgeCommand::shell(["rm"]);
        if recursive {
            command = command.arg("-r");
        }
        self.dispatch(&command.arg(target).serial(Some(&serial)))
            .await
    }
}
