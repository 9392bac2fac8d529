use dialoguer::Confirm;
use eyre::{eyre, Context, Result};

pub fn user_confirm<S: Into<String>>(prompt: S) -> Result<bool> {
    let answer = Confirm::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact_opt()
        .wrap_err_with(|| eyre!("User confirmation cancelled"))?;

    answer.ok_or_else(|| eyre!("No answer given - cancelling operation"))
}
