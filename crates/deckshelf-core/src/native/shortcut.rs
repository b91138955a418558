//! The client's shortcut record and its binary map layout.

use crate::catalog::dedup_tags;
use crate::vdf::{Node, VdfMap};

/// A shortcut as the game client stores it.
///
/// Flags and `last_play_time` belong to the client: they are read from the
/// store and copied forward, never derived from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeShortcut {
    pub app_id: u32,
    pub app_name: String,
    pub start_dir: String,
    pub exe: String,
    pub launch_options: String,
    pub shortcut_path: String,
    pub icon: String,
    pub is_hidden: u32,
    pub allow_desktop_config: u32,
    pub allow_overlay: u32,
    pub open_vr: u32,
    pub devkit: u32,
    pub devkit_game_id: String,
    pub devkit_override_app_id: u32,
    pub last_play_time: u32,
    pub tags: Vec<String>,
}

impl NativeShortcut {
    /// Build a record from one entry of the `shortcuts` map.
    ///
    /// Fields that are absent (or of an unexpected type) take their zero value.
    pub fn from_vdf(map: &VdfMap) -> Self {
        let string = |key: &str| map.get_str(key).unwrap_or_default().to_string();
        let number = |key: &str| map.get_u32(key).unwrap_or_default();

        let tags = map
            .get_map("tags")
            .map(|tags| dedup_tags(tags.iter().filter_map(|(_, node)| node.as_str())))
            .unwrap_or_default();

        Self {
            app_id: number("appid"),
            app_name: string("AppName"),
            start_dir: string("StartDir"),
            exe: string("Exe"),
            launch_options: string("LaunchOptions"),
            shortcut_path: string("ShortcutPath"),
            icon: string("icon"),
            is_hidden: number("IsHidden"),
            allow_desktop_config: number("AllowDesktopConfig"),
            allow_overlay: number("AllowOverlay"),
            open_vr: number("OpenVR"),
            devkit: number("Devkit"),
            devkit_game_id: string("DevkitGameID"),
            devkit_override_app_id: number("DevkitOverrideAppID"),
            last_play_time: number("LastPlayTime"),
            tags,
        }
    }

    /// The record as a map, in the fixed field order the client writes.
    pub fn to_vdf(&self) -> VdfMap {
        let tags: VdfMap = self
            .tags
            .iter()
            .enumerate()
            .map(|(index, tag)| (index.to_string(), Node::from(tag.as_str())))
            .collect();

        VdfMap::new()
            .with("appid", self.app_id)
            .with("AppName", self.app_name.as_str())
            .with("StartDir", self.start_dir.as_str())
            .with("Exe", self.exe.as_str())
            .with("LaunchOptions", self.launch_options.as_str())
            .with("ShortcutPath", self.shortcut_path.as_str())
            .with("icon", self.icon.as_str())
            .with("IsHidden", self.is_hidden)
            .with("AllowDesktopConfig", self.allow_desktop_config)
            .with("AllowOverlay", self.allow_overlay)
            .with("OpenVR", self.open_vr)
            .with("Devkit", self.devkit)
            .with("DevkitGameID", self.devkit_game_id.as_str())
            .with("DevkitOverrideAppID", self.devkit_override_app_id)
            .with("LastPlayTime", self.last_play_time)
            .with("tags", tags)
    }

    /// Take the client-owned fields from the stored record.
    pub fn copy_client_fields(&mut self, existing: &NativeShortcut) {
        self.is_hidden = existing.is_hidden;
        self.allow_desktop_config = existing.allow_desktop_config;
        self.allow_overlay = existing.allow_overlay;
        self.open_vr = existing.open_vr;
        self.devkit = existing.devkit;
        self.devkit_game_id = existing.devkit_game_id.clone();
        self.devkit_override_app_id = existing.devkit_override_app_id;
        self.last_play_time = existing.last_play_time;
    }
}
