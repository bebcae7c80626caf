//! Text entry into the focused input field

use super::device::settle;
use super::dispatch::{Bridge, BridgeCommand, CommandRunner};
use super::keycode;
use crate::config::BRIDGE_CONFIG;
use crate::error::{MamlError, Result};
use crate::random::random_text;
use tracing::warn;

/// Quote a token for the device shell unless it is plainly safe
fn quote_device_arg(token: &str) -> String {
    let safe = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_-.,/:@+".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

fn keep_first(first_error: &mut Option<MamlError>, result: Result<impl Sized>) {
    if let Err(e) = result {
        warn!(error = %e, "input step failed");
        first_error.get_or_insert(e);
    }
}

impl<R: CommandRunner> Bridge<R> {
    async fn clear_field(&self, serial: &str, num: u32) -> Result<()> {
        let mut first_error = None;
        keep_first(
            &mut first_error,
            self.send_keyevent(serial, keycode::MOVE_END).await,
        );
        keep_first(
            &mut first_error,
            self.repeat_keyevent(serial, keycode::DEL, num).await,
        );
        first_error.map_or(Ok(()), Err)
    }

    /// Clear the focused field by moving to its end and deleting `num` times
    ///
    /// The field contents are never inspected, so `num` deletes are always sent.
    pub async fn clear(&self, num: Option<u32>, serial: Option<&str>, delay: Option<f64>) -> Result<()> {
        let serial = self.require_online(serial).await?;
        let result = self
            .clear_field(&serial, num.unwrap_or(BRIDGE_CONFIG.clear_count))
            .await;
        settle(delay).await;
        result
    }

    /// Type text into the focused field, appending unless `clear_first` is set
    ///
    /// The text is sent word by word with a space key event between words.
    pub async fn type_text(
        &self,
        text: &str,
        clear_first: bool,
        serial: Option<&str>,
        delay: Option<f64>,
    ) -> Result<()> {
        let serial = self.require_online(serial).await?;
        let mut first_error = None;

        if clear_first {
            keep_first(
                &mut first_error,
                self.clear_field(&serial, BRIDGE_CONFIG.clear_count).await,
            );
        }

        for (i, token) in text.split_whitespace().enumerate() {
            if i > 0 {
                keep_first(
                    &mut first_error,
                    self.send_keyevent(&serial, keycode::SPACE).await,
                );
            }
            let command = BridgeCommand::shell(["input", "text"])
                .arg(quote_device_arg(token))
                .serial(Some(&serial));
            keep_first(&mut first_error, self.dispatch(&command).await);
        }

        // a lone space has no words to carry it
        if text == " " {
            keep_first(
                &mut first_error,
                self.send_keyevent(&serial, keycode::SPACE).await,
            );
        }

        settle(delay).await;
        first_error.map_or(Ok(()), Err)
    }

    /// Type a random string and return it
    ///
    /// `types` uses the class codes of [`random_text`]; defaults come from the
    /// bridge configuration (15 characters of class `a`).
    pub async fn random_type(
        &self,
        length: Option<usize>,
        types: Option<&str>,
        clear_first: bool,
        serial: Option<&str>,
        delay: Option<f64>,
    ) -> Result<String> {
        let text = random_text(
            length.unwrap_or(BRIDGE_CONFIG.random_length),
            types.unwrap_or(&BRIDGE_CONFIG.random_types),
        )?;
        self.type_text(&text, clear_first, serial, delay).await?;
        Ok(text)
    }
}
