use super::OutgoingEmail;

pub const PIN_RESET_SUBJECT: &str = "Reset your PIN";

pub fn render_pin_reset_html(deep_link: &str, web_link: &str, ttl_minutes: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Reset your PIN</h2>
    <p>A PIN reset was requested for your wallet. Open the link below on your phone to choose a new PIN:</p>
    <p><a href="{deep_link}" style="display: inline-block; padding: 10px 20px; background: #0070f3; color: white; text-decoration: none; border-radius: 4px;">Reset PIN</a></p>
    <p>If the button does not open the app, use this link instead:</p>
    <p><a href="{web_link}">{web_link}</a></p>
    <p style="color: #666; font-size: 14px;">This link expires in {ttl_minutes} minutes and can only be used once. If you didn't request this, you can ignore it.</p>
</body>
</html>"#
    )
}

pub fn render_pin_reset_text(deep_link: &str, web_link: &str, ttl_minutes: i64) -> String {
    format!(
        "A PIN reset was requested for your wallet.\n\n\
         Open this link on your phone to choose a new PIN:\n{deep_link}\n\n\
         If it does not open the app, use:\n{web_link}\n\n\
         This link expires in {ttl_minutes} minutes and can only be used once. \
         If you didn't request this, you can ignore it.\n"
    )
}

/// Both bodies plus the raw links, addressed to `to`.
pub fn pin_reset_email(to: &str, deep_link: &str, web_link: &str, ttl_minutes: i64) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: PIN_RESET_SUBJECT.to_string(),
        html_body: render_pin_reset_html(deep_link, web_link, ttl_minutes),
        text_body: render_pin_reset_text(deep_link, web_link, ttl_minutes),
        reset_link: web_link.to_string(),
        deep_link: deep_link.to_string(),
    }
}
