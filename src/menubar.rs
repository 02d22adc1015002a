use std::io::Write;

use crossterm::{queue, style};

use crate::config::KeyBindings;

/// Menu entries for the top bar, built from the user's key bindings.
pub fn menu_items(bindings: &KeyBindings) -> Vec<String> {
    vec![
        "[click] play".to_string(),
        format!("[{}] music", bindings.toggle_music),
        format!("[{}] sound", bindings.toggle_sound),
        format!("[{}][{}] quit", bindings.quit, bindings.quit_alt),
    ]
}

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item<W: Write>(out: &mut W, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            print_dim(out, rest)?;
            break;
        };
        if open > 0 {
            print_dim(out, &rest[..open])?;
        }
        rest = &rest[open..];
        match rest.find(']') {
            Some(close) => {
                queue!(
                    out,
                    style::SetAttribute(style::Attribute::Bold),
                    style::Print(&rest[..=close]),
                    style::SetAttribute(style::Attribute::Reset),
                )?;
                rest = &rest[close + 1..];
            }
            None => {
                queue!(out, style::Print(rest))?;
                break;
            }
        }
    }
    Ok(())
}

fn print_dim<W: Write>(out: &mut W, text: &str) -> anyhow::Result<()> {
    queue!(
        out,
        style::SetAttribute(style::Attribute::Dim),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_follow_bindings() {
        let mut bindings = KeyBindings::default();
        bindings.toggle_music = "Ctrl-m".into();
        let items = menu_items(&bindings);
        assert_eq!(items[1], "[Ctrl-m] music");
        assert_eq!(items[3], "[q][Esc] quit");
    }

    #[test]
    fn brackets_keep_their_text() {
        let mut buf = Vec::new();
        print_menu_item(&mut buf, "[m] music [broken").unwrap();
        let printed = String::from_utf8(buf).unwrap();
        assert!(printed.contains("[m]"));
        assert!(printed.contains(" music "));
        assert!(printed.contains("[broken"));
    }
}
