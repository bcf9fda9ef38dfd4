use tracing::warn;

pub fn send_expiry(duration_display: &str, looping: bool) {
    let summary = if looping { "Restarting countdown" } else { "Time's up!" };
    let mut notification = notify_rust::Notification::new();
    notification
        .summary(summary)
        .body(&format!("{duration_display} countdown finished"))
        .appname("countdown");

    if let Err(e) = notification.show() {
        warn!(error = %e, "failed to send desktop notification");
    }
}
