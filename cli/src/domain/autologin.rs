//! systemd override unit for console autologin.

/// Drop-in directory for the tty1 getty service.
pub const GETTY_OVERRIDE_DIR: &str = "/etc/systemd/system/getty@tty1.service.d";

/// Override file inside [`GETTY_OVERRIDE_DIR`].
pub const GETTY_OVERRIDE_FILE: &str = "override.conf";

/// Render the override unit that auto-logs `user` in on tty1.
///
/// The empty `ExecStart=` clears the start command inherited from the
/// packaged unit before the replacement is set.
#[must_use]
pub fn autologin_override(user: &str) -> String {
    format!(
        "[Service]\nExecStart=\nExecStart=-/sbin/agetty --autologin {user} --noclear %I $TERM\n"
    )
}
