//! Rendering commands into the final `.do` script text.

use crate::command::Command;

/// Renders commands into the output script: one command per line, with a
/// trailing newline.
pub fn render_script(commands: &[Command]) -> String {
    let mut out = String::new();
    for command in commands {
        out.push_str(&command.to_string());
        out.push('\n');
    }
    out
}
