use std::fmt::Write as _;

/// Console shortcut registry
///
/// Maps typed keys (one per line on the operator console) to player actions.
pub struct ShortcutMap {
    shortcuts: Vec<Shortcut>,
}

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    /// Name of the argument the action expects, shown in the help listing
    pub argument: Option<&'static str>,
    pub action: ShortcutAction,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Next,
    Previous,
    PlayPause,
    Slideshow,
    VolumeUp,
    VolumeDown,
    SetVolume,
    Mute,
    SelectVehicle,
    JumpToMedia,
    Share,
    Toggle360,
    Help,
    Quit,
}

impl ShortcutAction {
    fn category(self) -> &'static str {
        match self {
            ShortcutAction::Next
            | ShortcutAction::Previous
            | ShortcutAction::SelectVehicle
            | ShortcutAction::JumpToMedia => "Navigation",
            ShortcutAction::PlayPause
            | ShortcutAction::Slideshow
            | ShortcutAction::VolumeUp
            | ShortcutAction::VolumeDown
            | ShortcutAction::SetVolume
            | ShortcutAction::Mute => "Playback",
            ShortcutAction::Toggle360 | ShortcutAction::Share => "View",
            ShortcutAction::Help | ShortcutAction::Quit => "General",
        }
    }
}

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub action: ShortcutAction,
    /// Remainder of the line after the key, trimmed; empty when absent
    pub argument: &'a str,
}

impl ShortcutMap {
    pub fn new() -> Self {
        let mut map = Self {
            shortcuts: Vec::new(),
        };
        map.register_defaults();
        map
    }

    fn register_defaults(&mut self) {
        // Navigation
        self.register(Shortcut {
            key: "n",
            aliases: &["next", "right"],
            argument: None,
            action: ShortcutAction::Next,
            description: "Next media",
        });
        self.register(Shortcut {
            key: "p",
            aliases: &["prev", "previous", "left"],
            argument: None,
            action: ShortcutAction::Previous,
            description: "Previous media",
        });
        self.register(Shortcut {
            key: "v",
            aliases: &["vehicle"],
            argument: Some("<vehicle id>"),
            action: ShortcutAction::SelectVehicle,
            description: "Show a vehicle",
        });
        self.register(Shortcut {
            key: "m",
            aliases: &["media"],
            argument: Some("<media id>"),
            action: ShortcutAction::JumpToMedia,
            description: "Jump to media of the current vehicle",
        });

        // Playback
        self.register(Shortcut {
            key: "space",
            aliases: &["play", "pause", "k"],
            argument: None,
            action: ShortcutAction::PlayPause,
            description: "Play/Pause",
        });
        self.register(Shortcut {
            key: "s",
            aliases: &["slideshow"],
            argument: None,
            action: ShortcutAction::Slideshow,
            description: "Toggle slideshow",
        });
        self.register(Shortcut {
            key: "+",
            aliases: &["=", "up", "louder"],
            argument: None,
            action: ShortcutAction::VolumeUp,
            description: "Volume up",
        });
        self.register(Shortcut {
            key: "-",
            aliases: &["down", "quieter"],
            argument: None,
            action: ShortcutAction::VolumeDown,
            description: "Volume down",
        });
        self.register(Shortcut {
            key: "vol",
            aliases: &["volume"],
            argument: Some("<0-100>"),
            action: ShortcutAction::SetVolume,
            description: "Set volume",
        });
        self.register(Shortcut {
            key: "u",
            aliases: &["mute", "unmute"],
            argument: None,
            action: ShortcutAction::Mute,
            description: "Mute/Unmute",
        });

        // View
        self.register(Shortcut {
            key: "i",
            aliases: &["360"],
            argument: None,
            action: ShortcutAction::Toggle360,
            description: "Toggle immersive 360 view",
        });
        self.register(Shortcut {
            key: "l",
            aliases: &["share", "link"],
            argument: Some("[media ids]"),
            action: ShortcutAction::Share,
            description: "Print a customer share link",
        });

        // General
        self.register(Shortcut {
            key: "?",
            aliases: &["h", "help"],
            argument: None,
            action: ShortcutAction::Help,
            description: "Show shortcuts",
        });
        self.register(Shortcut {
            key: "q",
            aliases: &["quit", "exit"],
            argument: None,
            action: ShortcutAction::Quit,
            description: "Quit",
        });
    }

    fn register(&mut self, shortcut: Shortcut) {
        self.shortcuts.push(shortcut);
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Action bound to a single key, case-insensitive
    pub fn lookup(&self, key: &str) -> Option<ShortcutAction> {
        let key = key.trim();
        self.shortcuts
            .iter()
            .find(|s| {
                s.key.eq_ignore_ascii_case(key) || s.aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
            })
            .map(|s| s.action)
    }

    /// Parse a console line into an action and its argument
    ///
    /// An empty line means play/pause, matching the space bar.
    pub fn parse<'a>(&self, line: &'a str) -> Option<Invocation<'a>> {
        let line = line.trim();
        if line.is_empty() {
            return Some(Invocation {
                action: ShortcutAction::PlayPause,
                argument: "",
            });
        }

        let (key, argument) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        self.lookup(key).map(|action| Invocation {
            action,
            argument: argument.trim(),
        })
    }

    /// Help listing grouped by category
    pub fn help(&self) -> String {
        let mut out = String::new();
        let mut current_category = "";

        for shortcut in &self.shortcuts {
            let category = shortcut.action.category();
            if category != current_category {
                if !current_category.is_empty() {
                    out.push('\n');
                }
                let _ = writeln!(out, "{}", category);
                current_category = category;
            }

            let usage = match shortcut.argument {
                Some(arg) => format!("{} {}", shortcut.key, arg),
                None => shortcut.key.to_string(),
            };
            let _ = writeln!(out, "  {:18} - {}", usage, shortcut.description);
        }

        out
    }
}

impl Default for ShortcutMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_keys_and_aliases() {
        let map = ShortcutMap::new();
        assert_eq!(map.lookup("n"), Some(ShortcutAction::Next));
        assert_eq!(map.lookup("NEXT"), Some(ShortcutAction::Next));
        assert_eq!(map.lookup("360"), Some(ShortcutAction::Toggle360));
        assert_eq!(map.lookup("+"), Some(ShortcutAction::VolumeUp));
        assert_eq!(map.lookup("-"), Some(ShortcutAction::VolumeDown));
        assert_eq!(map.lookup("Mute"), Some(ShortcutAction::Mute));
        assert_eq!(map.lookup("x"), None);
    }

    #[test]
    fn test_parse_with_argument() {
        let map = ShortcutMap::new();
        assert_eq!(
            map.parse("  v   clx2b3c4d5e6f7g8h9i1j "),
            Some(Invocation {
                action: ShortcutAction::SelectVehicle,
                argument: "clx2b3c4d5e6f7g8h9i1j",
            })
        );
        assert_eq!(map.parse("share media1,media3").map(|i| i.argument), Some("media1,media3"));
        assert_eq!(map.parse("").map(|i| i.action), Some(ShortcutAction::PlayPause));
        assert_eq!(
            map.parse("vol 40"),
            Some(Invocation {
                action: ShortcutAction::SetVolume,
                argument: "40",
            })
        );
        assert_eq!(map.parse("bogus arg"), None);
    }

    #[test]
    fn test_help_lists_every_action() {
        let map = ShortcutMap::new();
        let help = map.help();
        for category in ["Navigation", "Playback", "View", "General"] {
            assert_eq!(help.matches(category).count(), 1, "{}", category);
        }
        assert!(help.contains("v <vehicle id>"));
        assert_eq!(help.lines().filter(|l| l.starts_with("  ")).count(), map.shortcuts().len());
    }
}
